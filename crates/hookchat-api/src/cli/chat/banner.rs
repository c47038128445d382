//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner shown when a chat session starts: the relay endpoint,
/// a short session id and a hint about slash commands.
pub fn print_welcome_banner(endpoint: &str, session_id: &str) {
    println!();
    println!("  {} {}", style("~").cyan(), style("hookchat").cyan().bold());
    println!();
    println!("  {}    {}", style("Relay:").bold(), style(endpoint).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(short_id(session_id)).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

fn short_id(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}
