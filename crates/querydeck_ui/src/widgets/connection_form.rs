use querydeck_api::{ConnectionConfig, DbKind};
use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::widgets::{
    buttons::Buttons, centered_rect, text_input::TextInput, theme::Theme,
};

const FORM_WIDTH: u16 = 60;
const LABEL_WIDTH: usize = 15;

/// One focusable row of the connection form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormItem {
    Kind,
    Url,
    Username,
    Password,
    Database,
    Connect,
    Cancel,
}

const SQL_ITEMS: [FormItem; 6] = [
    FormItem::Kind,
    FormItem::Url,
    FormItem::Username,
    FormItem::Password,
    FormItem::Connect,
    FormItem::Cancel,
];

const DOCUMENT_ITEMS: [FormItem; 5] = [
    FormItem::Kind,
    FormItem::Url,
    FormItem::Database,
    FormItem::Connect,
    FormItem::Cancel,
];

impl FormItem {
    /// The rows shown for `kind`, in focus order
    #[must_use]
    pub const fn for_kind(kind: DbKind) -> &'static [Self] {
        match kind {
            DbKind::Sql => &SQL_ITEMS,
            DbKind::Document => &DOCUMENT_ITEMS,
        }
    }

    #[must_use]
    pub const fn label(self, kind: DbKind) -> &'static str {
        match (self, kind) {
            (Self::Kind, _) => "Database Type",
            (Self::Url, DbKind::Sql) => "Database URL",
            (Self::Url, DbKind::Document) => "MongoDB URI",
            (Self::Username, _) => "Username",
            (Self::Password, _) => "Password",
            (Self::Database, _) => "Database Name",
            (Self::Connect, _) => "Connect",
            (Self::Cancel, _) => "Cancel",
        }
    }

    #[must_use]
    pub const fn is_button(self) -> bool {
        matches!(self, Self::Connect | Self::Cancel)
    }
}

/// What a key press in the form asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    /// A field changed; the live config should be refreshed
    Changed,
    Connect,
    Cancel,
}

/// Popup for editing the connection parameters.
///
/// The form edits its own inputs and writes them back into the live
/// [`ConnectionConfig`] with [`ConnectionForm::apply_to`] after each change.
#[derive(Debug, Clone, Default)]
pub struct ConnectionForm {
    pub is_open: bool,
    kind: DbKind,
    focus: usize,
    url: TextInput,
    username: TextInput,
    password: TextInput,
    database: TextInput,
    reconnect: bool,
    pub validation_error: Option<String>,
}

impl ConnectionForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the form seeded from `config`.
    ///
    /// `reconnect` switches the submit label to "Reconnect".
    pub fn open(&mut self, config: &ConnectionConfig, reconnect: bool) {
        self.is_open = true;
        self.kind = config.kind;
        self.focus = 0;
        self.url.set_text(config.url.as_str());
        self.username.set_text(config.username.as_str());
        self.password.set_text(config.password.as_str());
        self.database.set_text(config.database.as_str());
        self.reconnect = reconnect;
        self.validation_error = None;
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    #[must_use]
    pub const fn kind(&self) -> DbKind {
        self.kind
    }

    #[must_use]
    pub const fn is_reconnect(&self) -> bool {
        self.reconnect
    }

    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.reconnect { "Reconnect" } else { "Connect" }
    }

    #[must_use]
    pub fn focused_item(&self) -> FormItem {
        FormItem::for_kind(self.kind)
            .get(self.focus)
            .copied()
            .unwrap_or(FormItem::Kind)
    }

    /// Move focus to `item` if it is shown for the current kind
    pub fn focus_item(&mut self, item: FormItem) {
        if let Some(idx) = FormItem::for_kind(self.kind)
            .iter()
            .position(|candidate| *candidate == item)
        {
            self.focus = idx;
        }
    }

    pub fn next_item(&mut self) {
        let last = FormItem::for_kind(self.kind).len().saturating_sub(1);
        self.focus = (self.focus + 1).min(last);
    }

    pub const fn prev_item(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    /// Switch between SQL and document fields, keeping focus on the selector
    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
        self.focus = 0;
        self.validation_error = None;
    }

    /// Text input behind the focused row, if it is a text field
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focused_item() {
            FormItem::Url => Some(&mut self.url),
            FormItem::Username => Some(&mut self.username),
            FormItem::Password => Some(&mut self.password),
            FormItem::Database => Some(&mut self.database),
            FormItem::Kind | FormItem::Connect | FormItem::Cancel => None,
        }
    }

    fn input(&self, item: FormItem) -> Option<&TextInput> {
        match item {
            FormItem::Url => Some(&self.url),
            FormItem::Username => Some(&self.username),
            FormItem::Password => Some(&self.password),
            FormItem::Database => Some(&self.database),
            FormItem::Kind | FormItem::Connect | FormItem::Cancel => None,
        }
    }

    /// Write the form into `config`, leaving the selected collection alone
    pub fn apply_to(&self, config: &mut ConnectionConfig) {
        config.kind = self.kind;
        config.url = self.url.text().to_string();
        config.username = self.username.text().to_string();
        config.password = self.password.text().to_string();
        config.database = self.database.text().to_string();
    }

    #[must_use]
    pub fn widget<'a>(&'a self, theme: &'a Theme) -> ConnectionFormView<'a> {
        ConnectionFormView { form: self, theme }
    }

    fn field_line(&self, item: FormItem, theme: &Theme) -> Line<'_> {
        let focused = self.focused_item() == item;
        let label = format!("{:<LABEL_WIDTH$}", item.label(self.kind));
        let label_style = if focused { theme.input_focused } else { theme.muted };

        if item == FormItem::Kind {
            let option = |kind: DbKind| {
                let text = format!(" {} ", kind.label());
                if kind == self.kind {
                    Span::styled(text, theme.button_selected)
                } else {
                    Span::styled(text, theme.button)
                }
            };
            return Line::from(vec![
                Span::styled(label, label_style),
                option(DbKind::Sql),
                Span::raw(" "),
                option(DbKind::Document),
            ]);
        }

        let Some(input) = self.input(item) else {
            return Line::default();
        };
        let mask = |text: &str| -> String {
            if item == FormItem::Password {
                "•".repeat(text.chars().count())
            } else {
                text.to_string()
            }
        };

        let mut spans = vec![Span::styled(label, label_style)];
        if focused {
            let (before, after) = input.split_at_cursor();
            spans.push(Span::raw(mask(before)));
            spans.push(Span::styled("█", theme.input_focused));
            spans.push(Span::raw(mask(after)));
        } else {
            spans.push(Span::raw(mask(input.text())));
        }
        Line::from(spans)
    }
}

/// Renders a [`ConnectionForm`] as a centered popup
pub struct ConnectionFormView<'a> {
    form: &'a ConnectionForm,
    theme: &'a Theme,
}

impl Widget for ConnectionFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.form.is_open {
            return;
        }

        let items = FormItem::for_kind(self.form.kind);
        let fields: Vec<FormItem> =
            items.iter().copied().filter(|item| !item.is_button()).collect();
        let field_rows = u16::try_from(fields.len()).unwrap_or(u16::MAX);

        // fields + error line + buttons + borders and padding
        let popup = centered_rect(area, FORM_WIDTH, field_rows + 6);

        let title = if self.form.reconnect {
            " Connection "
        } else {
            " Connect to Database "
        };
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .style(self.theme.base);
        Clear.render(popup, buf);
        block.render(popup, buf);

        let [fields_area, error_area, buttons_area] = Layout::vertical([
            Constraint::Length(field_rows),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .spacing(1)
        .margin(1)
        .areas(popup);

        let lines: Vec<Line> = fields
            .iter()
            .map(|item| self.form.field_line(*item, self.theme))
            .collect();
        Paragraph::new(lines).render(fields_area, buf);

        if let Some(error) = &self.form.validation_error {
            Paragraph::new(error.as_str())
                .style(self.theme.error)
                .alignment(Alignment::Center)
                .render(error_area, buf);
        }

        let selected = match self.form.focused_item() {
            FormItem::Connect => Some(0),
            FormItem::Cancel => Some(1),
            FormItem::Kind
            | FormItem::Url
            | FormItem::Username
            | FormItem::Password
            | FormItem::Database => None,
        };
        Buttons {
            buttons: &[self.form.submit_label(), "Cancel"],
            selected,
            theme: self.theme,
        }
        .render(buttons_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConnectionConfig {
        ConnectionConfig {
            kind: DbKind::Sql,
            url: "postgres://localhost/app".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            database: String::new(),
            collection: "users".to_string(),
        }
    }

    #[test]
    fn test_open_seeds_from_config() {
        let mut form = ConnectionForm::new();
        form.open(&config(), true);
        assert!(form.is_open);
        assert_eq!(form.submit_label(), "Reconnect");
        assert_eq!(form.focused_item(), FormItem::Kind);

        let mut copy = ConnectionConfig::default();
        form.apply_to(&mut copy);
        assert_eq!(copy.url, "postgres://localhost/app");
        assert_eq!(copy.password, "secret");
    }

    #[test]
    fn test_apply_keeps_collection() {
        let mut form = ConnectionForm::new();
        let mut live = config();
        form.open(&live, false);
        form.focus_item(FormItem::Url);
        if let Some(input) = form.focused_input_mut() {
            input.set_text("postgres://db/other");
        }
        form.apply_to(&mut live);
        assert_eq!(live.url, "postgres://db/other");
        assert_eq!(live.collection, "users");
    }

    #[test]
    fn test_fields_follow_kind() {
        let mut form = ConnectionForm::new();
        form.open(&config(), false);
        form.focus_item(FormItem::Database);
        assert_eq!(form.focused_item(), FormItem::Kind);

        form.toggle_kind();
        assert_eq!(form.kind(), DbKind::Document);
        form.focus_item(FormItem::Database);
        assert_eq!(form.focused_item(), FormItem::Database);
        assert_eq!(FormItem::Url.label(form.kind()), "MongoDB URI");

        for _ in 0..10 {
            form.next_item();
        }
        assert_eq!(form.focused_item(), FormItem::Cancel);
    }
}
