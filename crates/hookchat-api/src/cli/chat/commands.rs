//! Slash command parsing and execution for the chat loop.
//!
//! Commands start with `/` and never reach the relay.

use console::style;

use hookchat_types::chat::ChatMessage;

use super::renderer::{preview, role_label};

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Show the conversation so far.
    History,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/history" => Some(ChatCommand::History),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}    Show this help message", style("/help").cyan());
    println!("  {}   Clear the screen", style("/clear").cyan());
    println!("  {}    End the chat session", style("/exit").cyan());
    println!("  {} Show conversation history", style("/history").cyan());
    println!();
    println!(
        "  {}",
        style("Messages sent while a reply is pending are not delivered.").dim()
    );
    println!();
}

/// Print every message in the conversation, one preview line each.
pub fn print_history(messages: &[ChatMessage]) {
    println!();
    for message in messages {
        println!(
            "  {} {}",
            role_label(message.role()),
            preview(message.content(), 100)
        );
    }
    println!();
}
