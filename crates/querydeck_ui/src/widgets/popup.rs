use querydeck_api::FieldDescriptor;
use ratatui::{
    prelude::{
        Alignment, Buffer, Constraint, Layout, Rect, StatefulWidget, Widget,
    },
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::widgets::{
    buttons::Buttons, centered_rect, table::DataTable, theme::Theme,
};

/// Field list of the selected table or collection
#[derive(Debug, Clone, Default)]
pub struct SchemaPopup {
    pub is_open: bool,
    pub collection: String,
    pub table: DataTable<FieldDescriptor>,
}

impl SchemaPopup {
    pub fn open(&mut self, collection: &str, fields: Vec<FieldDescriptor>) {
        self.collection = collection.to_string();
        self.table = DataTable::new(fields);
        self.is_open = true;
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Render into `area`; needs `&mut self` for the table selection
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.is_open {
            return;
        }

        let rows =
            u16::try_from(self.table.model.items.len()).unwrap_or(u16::MAX);
        let popup = centered_rect(
            area,
            area.width.saturating_mul(3) / 5,
            rows.saturating_add(4).max(6),
        );

        let block = Block::default()
            .title(format!(" Schema: {} ", self.collection))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme.border_focused)
            .style(theme.base);
        let inner = block.inner(popup);
        Clear.render(popup, buf);
        block.render(popup, buf);

        if self.table.model.items.is_empty() {
            Paragraph::new("No fields reported")
                .style(theme.muted)
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        }

        let table = &mut self.table;
        table
            .model
            .widget(theme, true)
            .render(inner, buf, &mut table.view);
    }
}

/// Full text of one result cell
#[derive(Default, Debug, Clone)]
pub struct CellValuePopup {
    pub is_open: bool,
    pub column_name: String,
    pub cell_value: String,
}

impl CellValuePopup {
    pub fn open(&mut self, column_name: &str, cell_value: &str) {
        self.column_name = column_name.to_string();
        self.cell_value = cell_value.to_string();
        self.is_open = true;
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    #[must_use]
    pub const fn widget<'a>(&'a self, theme: &'a Theme) -> CellValueView<'a> {
        CellValueView { popup: self, theme }
    }
}

pub struct CellValueView<'a> {
    popup: &'a CellValuePopup,
    theme: &'a Theme,
}

impl Widget for CellValueView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.popup.is_open {
            return;
        }

        let modal_width = area.width.saturating_mul(3) / 5;
        let content_width = usize::from(modal_width.saturating_sub(4).max(1));
        let value_lines: usize = self
            .popup
            .cell_value
            .lines()
            .map(|line| line.chars().count().div_ceil(content_width).max(1))
            .sum();
        let value_lines = u16::try_from(value_lines.max(1)).unwrap_or(u16::MAX);
        let modal_height = value_lines
            .saturating_add(4)
            .min(area.height.saturating_sub(4))
            .max(6);
        let popup = centered_rect(area, modal_width, modal_height);

        let block = Block::default()
            .title(format!(" {} ", self.popup.column_name))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .style(self.theme.base);
        Clear.render(popup, buf);
        block.render(popup, buf);

        let [value_area, button_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
                .margin(1)
                .areas(popup);

        Paragraph::new(self.popup.cell_value.as_str())
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .render(value_area, buf);

        Buttons {
            buttons: &["OK"],
            selected: Some(0),
            theme: self.theme,
        }
        .render(button_area, buf);
    }
}
