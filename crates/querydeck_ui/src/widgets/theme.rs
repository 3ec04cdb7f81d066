use std::fmt::Display;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Every style the widgets draw with, resolved for one [`ThemeMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub base: Style,
    pub border: Style,
    pub border_focused: Style,
    pub title: Style,
    pub muted: Style,
    pub error: Style,
    pub success: Style,
    pub selected_row: Style,
    pub selected_column: Style,
    pub selected_cell: Style,
    pub button: Style,
    pub button_selected: Style,
    pub input_focused: Style,
}

impl Theme {
    #[must_use]
    pub fn new(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                mode,
                base: Style::default().fg(Color::Black).bg(Color::White),
                border: Style::default().fg(Color::Gray),
                border_focused: Style::default().fg(Color::Blue),
                title: Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::DarkGray),
                error: Style::default().fg(Color::Red),
                success: Style::default().fg(Color::Green),
                selected_row: Style::default()
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD),
                selected_column: Style::default().fg(Color::Blue),
                selected_cell: Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .fg(Color::Magenta),
                button: Style::default().fg(Color::Black).bg(Color::Gray),
                button_selected: Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue),
                input_focused: Style::default().fg(Color::Blue),
            },
            ThemeMode::Dark => Self {
                mode,
                base: Style::default().fg(Color::White).bg(Color::Black),
                border: Style::default().fg(Color::DarkGray),
                border_focused: Style::default().fg(Color::Cyan),
                title: Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::Gray),
                error: Style::default().fg(Color::Red),
                success: Style::default().fg(Color::Green),
                selected_row: Style::default()
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD)
                    .fg(Color::Black)
                    .bg(Color::Yellow),
                selected_column: Style::default().fg(Color::Cyan),
                selected_cell: Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .fg(Color::Magenta),
                button: Style::default().fg(Color::White).bg(Color::DarkGray),
                button_selected: Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue),
                input_focused: Style::default().fg(Color::Yellow),
            },
        }
    }

    #[must_use]
    pub const fn border_for(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border
        }
    }

    #[must_use]
    pub fn toggled(&self) -> Self {
        Self::new(self.mode.toggled())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}
