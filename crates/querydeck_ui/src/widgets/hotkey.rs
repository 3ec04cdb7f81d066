use std::fmt::Display;

use crossterm::event::KeyCode;

#[derive(Debug, Clone)]
pub struct Hotkey<'a> {
    pub keycode: KeyCode,
    pub description: &'a str,
}

impl Display for Hotkey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.keycode {
            KeyCode::Char(ch) => write!(f, "{ch}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other}"),
        }
    }
}

pub const DISCONNECTED_HOTKEYS: [Hotkey; 3] = [
    Hotkey {
        keycode: KeyCode::Char('c'),
        description: "Connect",
    },
    Hotkey {
        keycode: KeyCode::Char('T'),
        description: "Theme",
    },
    Hotkey {
        keycode: KeyCode::Char('q'),
        description: "Quit",
    },
];

pub const TABLES_HOTKEYS: [Hotkey; 5] = [
    Hotkey {
        keycode: KeyCode::Enter,
        description: "Open Schema",
    },
    Hotkey {
        keycode: KeyCode::Char('/'),
        description: "Search",
    },
    Hotkey {
        keycode: KeyCode::Char('i'),
        description: "DB Info",
    },
    Hotkey {
        keycode: KeyCode::Char('c'),
        description: "Connection",
    },
    Hotkey {
        keycode: KeyCode::Tab,
        description: "Next Pane",
    },
];

pub const EDITOR_HOTKEYS: [Hotkey; 5] = [
    Hotkey {
        keycode: KeyCode::F(5),
        description: "Execute",
    },
    Hotkey {
        keycode: KeyCode::F(2),
        description: "Prompt / Query",
    },
    Hotkey {
        keycode: KeyCode::Enter,
        description: "Generate (prompt)",
    },
    Hotkey {
        keycode: KeyCode::Esc,
        description: "Leave Editor",
    },
    Hotkey {
        keycode: KeyCode::Tab,
        description: "Next Pane",
    },
];

pub const RESULTS_HOTKEYS: [Hotkey; 5] = [
    Hotkey {
        keycode: KeyCode::Char('s'),
        description: "Sort Column",
    },
    Hotkey {
        keycode: KeyCode::Char('/'),
        description: "Filter Column",
    },
    Hotkey {
        keycode: KeyCode::Char('x'),
        description: "Export CSV",
    },
    Hotkey {
        keycode: KeyCode::Enter,
        description: "View Cell",
    },
    Hotkey {
        keycode: KeyCode::Char('H'),
        description: "History",
    },
];

pub const HISTORY_HOTKEYS: [Hotkey; 3] = [
    Hotkey {
        keycode: KeyCode::Char('y'),
        description: "Copy Query",
    },
    Hotkey {
        keycode: KeyCode::Enter,
        description: "Load Query",
    },
    Hotkey {
        keycode: KeyCode::Esc,
        description: "Close",
    },
];

pub const FORM_HOTKEYS: [Hotkey; 3] = [
    Hotkey {
        keycode: KeyCode::Tab,
        description: "Next Field",
    },
    Hotkey {
        keycode: KeyCode::Enter,
        description: "Select",
    },
    Hotkey {
        keycode: KeyCode::Esc,
        description: "Cancel",
    },
];

pub const SCHEMA_HOTKEYS: [Hotkey; 3] = [
    Hotkey {
        keycode: KeyCode::Char('j'),
        description: "Down",
    },
    Hotkey {
        keycode: KeyCode::Char('k'),
        description: "Up",
    },
    Hotkey {
        keycode: KeyCode::Esc,
        description: "Close",
    },
];

pub const CELL_HOTKEYS: [Hotkey; 1] = [Hotkey {
    keycode: KeyCode::Esc,
    description: "Close",
}];

pub const SEARCH_HOTKEYS: [Hotkey; 2] = [
    Hotkey {
        keycode: KeyCode::Enter,
        description: "Done",
    },
    Hotkey {
        keycode: KeyCode::Esc,
        description: "Close",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_short_key_names() {
        assert_eq!(DISCONNECTED_HOTKEYS[0].to_string(), "c");
        assert_eq!(EDITOR_HOTKEYS[0].to_string(), "F5");
        assert_eq!(TABLES_HOTKEYS[0].to_string(), "Enter");
    }
}
