use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::widgets::text_input::TextInput;

/// What the search box is currently editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchTarget {
    /// The table / collection name list
    #[default]
    Tables,
    /// The per-column filter of the result table
    Column(String),
}

/// A single line search input that appears above the list it filters
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    input: TextInput,
    pub target: SearchTarget,
    pub is_active: bool,
}

impl SearchFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `target`, seeded with its current value
    pub fn activate(&mut self, target: SearchTarget, current: &str) {
        self.is_active = true;
        self.target = target;
        self.input.set_text(current);
    }

    pub const fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn add_char(&mut self, ch: char) {
        self.input.add_char(ch);
    }

    pub fn delete_char(&mut self) {
        self.input.delete_char();
    }

    pub const fn move_cursor_left(&mut self) {
        self.input.move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.input.move_cursor_right();
    }

    pub const fn move_cursor_to_start(&mut self) {
        self.input.move_cursor_to_start();
    }

    pub fn move_cursor_to_end(&mut self) {
        self.input.move_cursor_to_end();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.input.text()
    }

    fn title(&self) -> String {
        match &self.target {
            SearchTarget::Tables => " Search (ESC to clear) ".to_string(),
            SearchTarget::Column(column) => {
                format!(" Filter {column} (Enter/ESC to close) ")
            }
        }
    }
}

impl Widget for &SearchFilter {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if !self.is_active {
            return;
        }

        let block = Block::new().borders(Borders::ALL).title(self.title());
        let inner_area = block.inner(area);
        block.render(area, buf);

        let (before, after) = self.input.split_at_cursor();
        let line = Line::from(vec![
            Span::raw(before),
            Span::styled("█", Style::default().fg(Color::White)),
            Span::raw(after),
        ]);
        Paragraph::new(line).render(inner_area, buf);
    }
}
