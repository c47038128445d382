//! hookchat terminal client.
//!
//! Binary name: `hkchat`
//!
//! Parses CLI arguments, resolves configuration, then dispatches to the
//! interactive chat loop or a one-shot command.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,hookchat=debug",
        _ => "trace",
    };
    hookchat_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need configuration
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "hkchat", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(&cli).await?;

    let result = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Send { message } => {
            cli::send::send_message(&state, &message.join(" "), cli.json, cli.quiet).await
        }
        Commands::Config => cli::config::show_config(&state, cli.json),
        Commands::Completions { .. } => Ok(()),
    };

    hookchat_observe::tracing_setup::shutdown_tracing();
    result
}
