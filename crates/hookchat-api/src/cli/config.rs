//! `hkchat config`: show the resolved configuration.

use console::style;

use crate::state::AppState;

pub fn show_config(state: &AppState, json: bool) -> anyhow::Result<()> {
    let config = &state.config;

    if json {
        let mut value = serde_json::to_value(config)?;
        value["config_dir"] = serde_json::Value::String(state.config_dir.display().to_string());
        value["resolved_status_url"] = serde_json::json!(config.resolved_status_url());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let unset = || style("(not set)").dim().to_string();
    let config_path = state.config_dir.join("config.toml");

    println!();
    println!("  {}  {}", style("Config file:").bold(), style(config_path.display()).dim());
    println!();
    println!(
        "  {}   {}",
        style("submit_url").cyan(),
        config.submit_url.clone().unwrap_or_else(unset)
    );
    println!(
        "  {}   {}",
        style("status_url").cyan(),
        config.resolved_status_url().unwrap_or_else(unset)
    );
    println!("  {}   {}ms", style("poll every").cyan(), config.poll_interval_ms);
    println!("  {}  {}", style("poll retries").cyan(), config.max_poll_retries);
    println!("  {}      {}s", style("timeout").cyan(), config.request_timeout_secs);
    println!(
        "  {}     {}",
        style("greeting").cyan(),
        config.greeting().map(str::to_string).unwrap_or_else(unset)
    );
    println!();
    Ok(())
}
