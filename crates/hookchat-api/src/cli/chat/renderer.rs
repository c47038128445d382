//! Terminal rendering of conversation messages.
//!
//! Assistant replies are rendered as markdown through `termimad`; user
//! messages and history previews are printed as plain styled text.

use std::time::Duration;

use console::style;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use hookchat_types::chat::{ChatMessage, MessageRole};

pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render markdown to a string of terminal escape sequences.
    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print one message with its role label.
    pub fn print_message(&self, message: &ChatMessage) {
        let body = match message.role() {
            MessageRole::Assistant => self.render(message.content()),
            MessageRole::User => message.content().to_string(),
        };
        println!();
        println!("  {} {}", role_label(message.role()), body.trim());
    }

    /// Print the dimmed footer after a reply: how long the relay took.
    pub fn print_elapsed_footer(&self, elapsed: Duration) {
        println!(
            "\n  {} {}",
            style("|").dim(),
            style(format!("{:.1}s", elapsed.as_secs_f64())).dim()
        );
        println!();
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Styled label shown before a message.
pub fn role_label(role: MessageRole) -> String {
    match role {
        MessageRole::User => style("You >").green().bold().to_string(),
        MessageRole::Assistant => style("Assistant >").cyan().bold().to_string(),
    }
}

/// Single-line preview of `content`, cut to at most `max_chars` characters.
pub fn preview(content: &str, max_chars: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_content() {
        assert_eq!(preview("hello\nthere", 20), "hello there");
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "é".repeat(50);
        let cut = preview(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn render_keeps_text() {
        let renderer = ChatRenderer::new();
        let out = renderer.render("plain reply");
        assert!(out.contains("plain reply"));
    }
}
