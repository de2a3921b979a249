//! Common UI styles and layout helpers for the deskboard TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dark" => Some(ThemeKind::Dark),
            "light" => Some(ThemeKind::Light),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }
}

/// Palette used by every widget; switching the kind restyles the whole UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
}

impl Theme {
    pub fn new(kind: ThemeKind) -> Self {
        Self { kind }
    }

    /// Theme named by configuration, falling back to dark
    pub fn from_name(name: &str) -> Self {
        Self::new(ThemeKind::parse(name).unwrap_or(ThemeKind::Dark))
    }

    fn foreground(&self) -> Color {
        match self.kind {
            ThemeKind::Dark => Color::White,
            ThemeKind::Light => Color::Black,
        }
    }

    fn accent(&self) -> Color {
        match self.kind {
            ThemeKind::Dark => Color::Yellow,
            ThemeKind::Light => Color::Blue,
        }
    }

    pub fn base(&self) -> Style {
        match self.kind {
            ThemeKind::Dark => Style::default().fg(Color::White),
            ThemeKind::Light => Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.foreground())
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn warning(&self) -> Style {
        match self.kind {
            ThemeKind::Dark => Style::default().fg(Color::Yellow),
            ThemeKind::Light => Style::default().fg(Color::Magenta),
        }
    }

    pub fn info(&self) -> Style {
        match self.kind {
            ThemeKind::Dark => Style::default().fg(Color::Cyan),
            ThemeKind::Light => Style::default().fg(Color::Blue),
        }
    }

    pub fn inactive(&self) -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_border(&self) -> Style {
        Style::default().fg(self.accent())
    }

    pub fn inactive_border(&self) -> Style {
        Style::default().fg(Color::Gray)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeKind::Dark)
    }
}

/// Center a rectangle within another rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Cut `text` to at most `width` terminal columns, marking the cut with '…'
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
