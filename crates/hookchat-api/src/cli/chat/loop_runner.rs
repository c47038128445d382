//! Main chat loop orchestration.
//!
//! Reads lines, dispatches slash commands, submits everything else to the
//! session and waits for the session to go idle before prompting again.
//! Replies are picked up from the session's event stream.

use std::time::Instant;

use console::style;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{info, warn};

use hookchat_core::chat::session::SubmitStatus;
use hookchat_types::event::SessionEvent;

use crate::state::{AppState, HttpSession};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent, is_blank};
use super::renderer::ChatRenderer;

/// Spinner shown while the session is busy.
pub fn thinking_spinner() -> anyhow::Result<indicatif::ProgressBar> {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}")?,
    );
    spinner.set_message("waiting for reply...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    Ok(spinner)
}

/// Run the interactive chat loop against the configured relay.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let endpoints = state.endpoints()?;
    let session = state.new_session()?;
    let session_id = session.id().to_string();
    info!(session_id = %session_id, "chat session started");

    print_welcome_banner(endpoints.submit_url().as_str(), &session_id);

    let renderer = ChatRenderer::new();
    for message in session.messages() {
        renderer.print_message(&message);
    }
    println!();

    let mut events = session.subscribe();
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                if is_blank(&text) {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Clear => chat_input.clear(),
                        ChatCommand::History => commands::print_history(&session.messages()),
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::Unknown(name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(name).dim()
                            );
                        }
                    }
                    continue;
                }

                match session.submit(&text) {
                    SubmitStatus::Accepted => {}
                    SubmitStatus::Ignored => continue,
                    SubmitStatus::Busy => {
                        println!(
                            "\n  {} Still waiting for the previous reply.\n",
                            style("!").yellow().bold()
                        );
                        continue;
                    }
                    SubmitStatus::Closed => break,
                }

                await_reply(&session, &mut events, &renderer).await?;
            }
        }
    }

    session.close();
    info!(session_id = %session_id, messages = session.len(), "chat session closed");
    Ok(())
}

/// Block until the session is idle, then print the assistant messages that
/// were appended meanwhile.
async fn await_reply(
    session: &HttpSession,
    events: &mut broadcast::Receiver<SessionEvent>,
    renderer: &ChatRenderer,
) -> anyhow::Result<()> {
    let spinner = thinking_spinner()?;
    let started = Instant::now();
    session.wait_idle().await;
    spinner.finish_and_clear();

    loop {
        match events.try_recv() {
            Ok(SessionEvent::MessageAppended { message, .. }) if !message.is_user() => {
                renderer.print_message(&message);
            }
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "chat display fell behind session events");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    renderer.print_elapsed_footer(started.elapsed());
    Ok(())
}
