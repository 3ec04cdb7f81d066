use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Paragraph, Widget, Wrap},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

/// The single message slot at the bottom of the screen.
///
/// A new message always replaces the previous one; there is no queue.
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    message: String,
    severity: Severity,
}

impl StatusLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message: String::new(),
            severity: Severity::Info,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.severity = Severity::Info;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.severity = Severity::Error;
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The message, if the slot currently holds an error
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        (self.severity == Severity::Error && !self.message.is_empty())
            .then_some(self.message.as_str())
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.severity = Severity::Info;
    }

    /// Clear the slot only if it holds an error
    pub fn clear_error(&mut self) {
        if self.severity == Severity::Error {
            self.clear();
        }
    }
}

impl Widget for &StatusLine {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 || self.message.is_empty() {
            return;
        }

        let style = match self.severity {
            Severity::Info => Style::default(),
            Severity::Error => Style::default().fg(Color::Red),
        };

        Paragraph::new(self.message.as_str())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_message_wins() {
        let mut status = StatusLine::new();
        status.set_error("Connection Failed");
        status.set_error("syntax error");
        assert_eq!(status.error(), Some("syntax error"));

        status.set_message("Exported 2 rows");
        assert_eq!(status.error(), None);
        status.clear_error();
        assert_eq!(status.message(), "Exported 2 rows");
    }
}
