use querydeck_api::{ConnectionConfig, DbKind};
use ratatui::{
    prelude::{Buffer, Constraint, Layout, Rect, Widget},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::widgets::{text_input::TextInput, theme::Theme};

/// Query buffer contents before anything is typed
pub const INITIAL_QUERY: &str = "{}";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorField {
    /// Natural language prompt for query generation
    Prompt,
    #[default]
    Query,
}

/// The AI prompt line plus the multi-line query buffer
#[derive(Debug, Clone)]
pub struct QueryEditor {
    prompt: TextInput,
    query: TextInput,
    pub field: EditorField,
}

impl Default for QueryEditor {
    fn default() -> Self {
        Self {
            prompt: TextInput::new(),
            query: TextInput::with_text(INITIAL_QUERY),
            field: EditorField::default(),
        }
    }
}

impl QueryEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Title of the query box for the current connection
    #[must_use]
    pub fn label(config: &ConnectionConfig) -> String {
        match config.kind {
            DbKind::Sql => "SQL Query".to_string(),
            DbKind::Document => format!("Filter for {}", config.collection),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.query.text()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.prompt.text()
    }

    /// Replace the query buffer, e.g. with a generated query
    pub fn set_query(&mut self, query: &str) {
        self.query.set_text(query);
    }

    pub const fn toggle_field(&mut self) {
        self.field = match self.field {
            EditorField::Prompt => EditorField::Query,
            EditorField::Query => EditorField::Prompt,
        };
    }

    pub const fn focused_input_mut(&mut self) -> &mut TextInput {
        match self.field {
            EditorField::Prompt => &mut self.prompt,
            EditorField::Query => &mut self.query,
        }
    }

    #[must_use]
    pub fn widget<'a>(
        &'a self,
        label: &'a str,
        theme: &'a Theme,
        focused: bool,
    ) -> QueryEditorView<'a> {
        QueryEditorView {
            editor: self,
            label,
            theme,
            focused,
            generating: false,
            executing: false,
        }
    }
}

/// Lines of `input` with a block cursor drawn at the cursor position
fn lines_with_cursor<'a>(
    input: &'a TextInput,
    show_cursor: bool,
    cursor_style: Style,
) -> Vec<Line<'a>> {
    if !show_cursor {
        return input.text().split('\n').map(Line::from).collect();
    }

    let (before, after) = input.split_at_cursor();
    let mut before_lines: Vec<&str> = before.split('\n').collect();
    let mut after_lines = after.split('\n');
    let cursor_line_head = before_lines.pop().unwrap_or_default();
    let cursor_line_tail = after_lines.next().unwrap_or_default();

    let mut lines: Vec<Line> = before_lines.into_iter().map(Line::from).collect();
    lines.push(Line::from(vec![
        Span::raw(cursor_line_head),
        Span::styled("█", cursor_style),
        Span::raw(cursor_line_tail),
    ]));
    lines.extend(after_lines.map(Line::from));
    lines
}

pub struct QueryEditorView<'a> {
    editor: &'a QueryEditor,
    label: &'a str,
    theme: &'a Theme,
    focused: bool,
    generating: bool,
    executing: bool,
}

impl QueryEditorView<'_> {
    /// Mark a pending generation or execution in the box titles
    #[must_use]
    pub const fn pending(mut self, generating: bool, executing: bool) -> Self {
        self.generating = generating;
        self.executing = executing;
        self
    }
}

impl Widget for QueryEditorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [prompt_area, query_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)])
                .areas(area);

        let prompt_focused =
            self.focused && self.editor.field == EditorField::Prompt;
        let query_focused =
            self.focused && self.editor.field == EditorField::Query;

        let prompt_title = if self.generating {
            " Ask AI to generate Query... (generating) "
        } else {
            " Ask AI to generate Query... (Enter) "
        };
        let prompt_block = Block::default()
            .title(prompt_title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_for(prompt_focused));
        Paragraph::new(lines_with_cursor(
            &self.editor.prompt,
            prompt_focused,
            self.theme.input_focused,
        ))
        .block(prompt_block)
        .render(prompt_area, buf);

        let query_title = if self.executing {
            format!(" {} (executing) ", self.label)
        } else {
            format!(" {} (F5 / Ctrl+R to execute) ", self.label)
        };
        let query_block = Block::default()
            .title(query_title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_for(query_focused));

        let visible_rows = usize::from(query_block.inner(query_area).height);
        let (cursor_line, _) = self.editor.query.cursor_line_col();
        let scroll = cursor_line.saturating_sub(visible_rows.saturating_sub(1));

        Paragraph::new(lines_with_cursor(
            &self.editor.query,
            query_focused,
            self.theme.input_focused,
        ))
        .block(query_block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .render(query_area, buf);
    }
}
