//! Terminal capability detection and utilities

use owo_colors::{OwoColorize, Style};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| usize::from(w.0))
}

/// Shortens text to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Color a decision status by what it means for the decision
    fn status(&self) -> String;
}

fn paint(text: &str, style: Style) -> String {
    if supports_color() {
        text.style(style).to_string()
    } else {
        text.to_owned()
    }
}

impl Colorize for str {
    fn success(&self) -> String {
        paint(self, Style::new().green())
    }

    fn warning(&self) -> String {
        paint(self, Style::new().yellow())
    }

    fn info(&self) -> String {
        paint(self, Style::new().bright_blue())
    }

    fn dim(&self) -> String {
        paint(self, Style::new().dimmed())
    }

    fn status(&self) -> String {
        match self.to_ascii_lowercase().as_str() {
            "accepted" => self.success(),
            "proposed" => self.info(),
            "rejected" | "deprecated" => self.warning(),
            status if status.starts_with("superseded") => self.dim(),
            _ => self.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("short", 10, "short"; "fits")]
    #[test_case("exactly10!", 10, "exactly10!"; "exact fit")]
    #[test_case("a longer title", 6, "a lon…"; "cut")]
    #[test_case("äöü äöü", 4, "äöü…"; "counts characters")]
    fn truncation(text: &str, width: usize, expected: &str) {
        assert_eq!(truncate(text, width), expected);
    }
}
