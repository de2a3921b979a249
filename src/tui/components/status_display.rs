//! Status display component for showing messages

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::sync::{StatusMessage, StatusType};
use crate::tui::ui::Theme;

/// Status display component
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub message_history: Vec<StatusMessage>,
    pub max_history: usize,
    pub show_timestamp: bool,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 100,
            show_timestamp: false,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamp = true;
        self
    }

    /// Set current status message
    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn clear(&mut self) {
        self.archive_current();
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn get_history(&self) -> &[StatusMessage] {
        &self.message_history
    }

    /// Render the current message, or `idle` when there is none
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, idle: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => (self.format_message(message), message_style(message, theme)),
            None => (idle.to_string(), theme.inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.inactive_border());

        let paragraph = Paragraph::new(content).style(style).block(block);
        f.render_widget(paragraph, area);
    }

    /// Format message for display
    pub fn format_message(&self, message: &StatusMessage) -> String {
        let prefix = match message.status_type {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Warning => "⚠",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        };

        if self.show_timestamp {
            format!("{} [{}] {}", prefix, message.timestamp.format("%H:%M:%S"), message.message)
        } else {
            format!("{} {}", prefix, message.message)
        }
    }
}

/// Color for a message of the given type
pub fn message_style(message: &StatusMessage, theme: &Theme) -> Style {
    match message.status_type {
        StatusType::Info => theme.info(),
        StatusType::Success => theme.success(),
        StatusType::Warning | StatusType::Loading => theme.warning(),
        StatusType::Error => theme.error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut display = StatusDisplay::new().with_history(2);
        display.set_message(StatusMessage::info("one"));
        display.set_message(StatusMessage::info("two"));
        display.set_message(StatusMessage::info("three"));
        display.set_message(StatusMessage::error("four"));

        let history: Vec<_> = display.get_history().iter().map(|m| m.message.as_str()).collect();
        assert_eq!(history, vec!["two", "three"]);
        assert_eq!(display.get_current().unwrap().message, "four");

        display.clear();
        assert!(display.get_current().is_none());
        assert_eq!(display.get_history().len(), 2);
    }

    #[test]
    fn test_format_message() {
        let display = StatusDisplay::new();
        assert_eq!(
            display.format_message(&StatusMessage::success("Employee deleted")),
            "✓ Employee deleted"
        );
        let stamped = StatusDisplay::new().with_timestamps();
        assert!(stamped.format_message(&StatusMessage::error("x")).starts_with("✗ ["));
    }
}
