//! One-shot message submission: `hkchat send <text>`.

use console::style;
use serde_json::json;

use hookchat_core::chat::session::{ConversationSession, SubmitStatus};
use hookchat_core::relay::transport::RelayTransport;

use crate::state::AppState;

use super::chat::loop_runner::thinking_spinner;
use super::chat::renderer::ChatRenderer;

/// Submit `text` on a fresh session and wait for the conversation to settle.
///
/// Returns the text appended after the user's message: the relay's reply or
/// the apology/error text standing in for it.
pub async fn exchange<T: RelayTransport + 'static>(
    session: &ConversationSession<T>,
    text: &str,
) -> anyhow::Result<String> {
    match session.submit(text) {
        SubmitStatus::Accepted => {}
        SubmitStatus::Ignored => anyhow::bail!("message is empty"),
        SubmitStatus::Busy => anyhow::bail!("session is still waiting for a reply"),
        SubmitStatus::Closed => anyhow::bail!("session is closed"),
    }

    session.wait_idle().await;

    session
        .messages()
        .last()
        .filter(|message| !message.is_user())
        .map(|message| message.content().to_string())
        .ok_or_else(|| anyhow::anyhow!("session settled without a reply"))
}

pub async fn send_message(state: &AppState, text: &str, json: bool, quiet: bool) -> anyhow::Result<()> {
    let session = state.new_session()?;

    let spinner = if json || quiet {
        None
    } else {
        Some(thinking_spinner()?)
    };
    let reply = exchange(&session, text).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let reply = reply?;

    if json {
        let output = json!({
            "session_id": session.id(),
            "reply": reply,
            "messages": session.messages(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if quiet {
        println!("{reply}");
    } else {
        let renderer = ChatRenderer::new();
        println!();
        println!("  {} {}", style("Assistant >").cyan().bold(), renderer.render(&reply).trim());
        println!();
    }

    session.close();
    Ok(())
}
