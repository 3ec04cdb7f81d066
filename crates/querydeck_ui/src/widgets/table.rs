use querydeck_api::TableData;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Text,
    widgets::{
        Cell, HighlightSpacing, Row, StatefulWidget, Table, TableState,
    },
};
use crate::widgets::{constraint_len_calculator, theme::Theme};

/// A row of a result table whose columns are only known at runtime
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTableRow {
    pub values: Vec<String>,
}

impl TableData for RawTableRow {
    fn title() -> &'static str {
        "Query Result"
    }

    fn ref_array(&self) -> Vec<String> {
        self.values.clone()
    }

    fn num_columns(&self) -> usize {
        self.values.len()
    }

    fn cols() -> Vec<&'static str> {
        // Header labels for raw rows live in `TableModel::dynamic_column_names`
        vec![]
    }
}

/// Model (data) for the table view
#[derive(Clone, Debug, Default)]
pub struct TableModel<T: TableData + Clone> {
    pub items: Vec<T>,
    pub longest_item_lens: Vec<u16>,
    pub dynamic_column_names: Option<Vec<String>>,
}

impl<T: TableData + Clone> TableModel<T> {
    /// Borrow the model as a renderable widget
    #[must_use]
    pub const fn widget<'a>(
        &'a self,
        theme: &'a Theme,
        focused: bool,
    ) -> TableWidget<'a, T> {
        TableWidget {
            model: self,
            theme,
            focused,
        }
    }
}

/// View state for the table (UI state like selection, scrolling)
#[derive(Clone, Debug, Default)]
pub struct TableViewState {
    pub state: TableState,
    pub column_offset: usize,
}

/// Table widget wrapper that holds the model and state
#[derive(Clone, Debug, Default)]
pub struct DataTable<T: TableData + Clone> {
    pub model: TableModel<T>,
    pub view: TableViewState,
}

impl DataTable<RawTableRow> {
    /// Build a table from string cells with a runtime header
    #[must_use]
    pub fn from_raw_data(rows: Vec<Vec<String>>, header: Vec<String>) -> Self {
        let mut table = Self::default();
        table.reset(rows, header);
        table
    }

    /// Swap in new rows and header, keeping the selection where possible
    pub fn reset(&mut self, rows: Vec<Vec<String>>, header: Vec<String>) {
        let items: Vec<RawTableRow> = rows
            .into_iter()
            .map(|values| RawTableRow { values })
            .collect();
        let labels: Vec<&str> = header.iter().map(String::as_str).collect();
        self.model.longest_item_lens = constraint_len_calculator(&labels, &items);
        self.model.items = items;
        self.model.dynamic_column_names = Some(header);
        self.clamp_selection();
    }
}

impl<T: TableData + Clone> DataTable<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let longest_item_lens = constraint_len_calculator(&T::cols(), &items);
        Self {
            model: TableModel {
                items,
                longest_item_lens,
                dynamic_column_names: None,
            },
            view: TableViewState {
                state: TableState::default().with_selected(0),
                column_offset: 0,
            },
        }
    }

    /// Replace the rows, keeping the selection where possible
    pub fn set_items(&mut self, items: Vec<T>) {
        self.model.longest_item_lens = constraint_len_calculator(&T::cols(), &items);
        self.model.items = items;
        self.clamp_selection();
    }

    /// Items with any column containing `query`, ignoring case
    #[must_use]
    pub fn filter(items: &[T], query: &str) -> Vec<T> {
        if query.is_empty() {
            return items.to_vec();
        }

        let query_lower = query.to_lowercase();
        items
            .iter()
            .filter(|item| {
                item.ref_array()
                    .iter()
                    .any(|value| value.to_lowercase().contains(&query_lower))
            })
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.model.longest_item_lens.len()
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&T> {
        self.view
            .state
            .selected()
            .and_then(|idx| self.model.items.get(idx))
    }

    #[must_use]
    pub fn selected_column(&self) -> Option<usize> {
        self.view.state.selected_column()
    }

    /// Keep row and column selection inside the current data
    pub fn clamp_selection(&mut self) {
        let rows = self.model.items.len();
        match self.view.state.selected() {
            _ if rows == 0 => self.view.state.select(None),
            None => self.view.state.select(Some(0)),
            Some(selected) if selected >= rows => {
                self.view.state.select(Some(rows - 1));
            }
            Some(_) => {}
        }

        let columns = self.num_columns();
        if let Some(selected_col) = self.view.state.selected_column()
            && selected_col >= columns
        {
            self.view.state.select_column(columns.checked_sub(1));
        }
        if self.view.column_offset >= columns {
            self.view.column_offset = columns.saturating_sub(1);
        }
    }

    /// Adjusts `column_offset` to ensure the selected column is visible
    pub fn adjust_offset_for_selected_column(
        &mut self,
        selected_col: usize,
        area_width: u16,
    ) {
        if self.model.longest_item_lens.is_empty() {
            return;
        }

        let visible_end = visible_end(
            &self.model.longest_item_lens,
            self.view.column_offset,
            area_width,
        );
        if selected_col < self.view.column_offset || selected_col >= visible_end
        {
            self.view.column_offset = selected_col;
        }

        if self.view.column_offset >= self.model.longest_item_lens.len() {
            self.view.column_offset =
                self.model.longest_item_lens.len().saturating_sub(1);
        }
    }
}

/// Index one past the last column that fits when starting at `offset`
fn visible_end(
    longest_item_lens: &[u16],
    offset: usize,
    area_width: u16,
) -> usize {
    let mut cumulative_width = 0u16;
    let mut end = offset;
    for (idx, &len) in longest_item_lens.iter().enumerate().skip(offset) {
        let col_width = len.saturating_add(1);
        if cumulative_width.saturating_add(col_width) > area_width {
            break;
        }
        cumulative_width += col_width;
        end = idx + 1;
    }
    end
}

/// Columns to draw and the selected column's position among them
fn calculate_visible_columns(
    longest_item_lens: &[u16],
    column_offset: usize,
    selected_col: Option<usize>,
    area_width: u16,
) -> (Vec<usize>, Option<usize>) {
    let last = longest_item_lens.len().saturating_sub(1);
    let mut offset = column_offset.min(last);
    if let Some(selected) = selected_col
        && (selected < offset
            || selected >= visible_end(longest_item_lens, offset, area_width))
    {
        offset = selected.min(last);
    }

    let end =
        visible_end(longest_item_lens, offset, area_width).max(offset + 1);
    let visible: Vec<usize> =
        (offset..end.min(longest_item_lens.len())).collect();
    let relative = selected_col
        .and_then(|selected| visible.iter().position(|&idx| idx == selected));
    (visible, relative)
}

/// Renders a [`TableModel`] into a [`TableViewState`]
pub struct TableWidget<'a, T: TableData + Clone> {
    model: &'a TableModel<T>,
    theme: &'a Theme,
    focused: bool,
}

impl<T: TableData + Clone> StatefulWidget for TableWidget<'_, T> {
    type State = TableViewState;

    fn render(
        self,
        area: Rect,
        buf: &mut ratatui::buffer::Buffer,
        state: &mut Self::State,
    ) {
        if self.model.longest_item_lens.is_empty() {
            return;
        }

        let original_col = state.state.selected_column();
        let (visible_cols, relative_selected_col) = calculate_visible_columns(
            &self.model.longest_item_lens,
            state.column_offset,
            original_col,
            area.width,
        );
        state.state.select_column(relative_selected_col);

        let header_labels: Vec<String> = match &self.model.dynamic_column_names
        {
            Some(names) => names.clone(),
            None => T::cols().into_iter().map(str::to_string).collect(),
        };
        let header = visible_cols
            .iter()
            .map(|&idx| {
                Cell::from(header_labels.get(idx).cloned().unwrap_or_default())
            })
            .collect::<Row>()
            .style(Style::default().add_modifier(Modifier::BOLD))
            .height(1);

        let rows = self.model.items.iter().map(|item| {
            let values = item.ref_array();
            visible_cols
                .iter()
                .map(|&idx| {
                    Cell::from(values.get(idx).cloned().unwrap_or_default())
                })
                .collect::<Row>()
                .height(1)
        });

        let constraints = visible_cols.iter().map(|&idx| {
            let width =
                self.model.longest_item_lens.get(idx).copied().unwrap_or(1);
            Constraint::Length(width.saturating_add(1))
        });

        let (row_style, column_style, cell_style) = if self.focused {
            (
                self.theme.selected_row,
                self.theme.selected_column,
                self.theme.selected_cell,
            )
        } else {
            (
                Style::default().add_modifier(Modifier::BOLD),
                Style::default(),
                Style::default().add_modifier(Modifier::BOLD),
            )
        };

        let bar: &'static str = " █ ";
        let table = Table::new(rows, constraints)
            .header(header)
            .row_highlight_style(row_style)
            .column_highlight_style(column_style)
            .cell_highlight_style(cell_style)
            .highlight_symbol(Text::from(bar))
            .highlight_spacing(HighlightSpacing::Always);

        StatefulWidget::render(table, area, buf, &mut state.state);
        state.state.select_column(original_col);
    }
}

#[cfg(test)]
mod tests {
    use querydeck_api::TableName;

    use super::*;

    fn names(values: &[&str]) -> Vec<TableName> {
        values.iter().map(|v| TableName((*v).to_string())).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let items = names(&["Users", "orders", "user_roles", "audit"]);
        let filtered = DataTable::filter(&items, "USER");
        assert_eq!(filtered, names(&["Users", "user_roles"]));
        assert_eq!(DataTable::filter(&items, "").len(), 4);
    }

    #[test]
    fn test_raw_table_widths_include_header() {
        let table = DataTable::from_raw_data(
            vec![vec!["1".to_string(), "a long value".to_string()]],
            vec!["identifier".to_string(), "v".to_string()],
        );
        assert_eq!(table.model.longest_item_lens, vec![10, 12]);
        assert_eq!(table.view.state.selected(), Some(0));
    }

    #[test]
    fn test_reset_clamps_selection() {
        let mut table = DataTable::from_raw_data(
            vec![vec!["a".to_string()]; 5],
            vec!["c".to_string()],
        );
        table.view.state.select(Some(4));
        table.reset(vec![vec!["a".to_string()]; 2], vec!["c".to_string()]);
        assert_eq!(table.view.state.selected(), Some(1));

        table.reset(Vec::new(), Vec::new());
        assert_eq!(table.view.state.selected(), None);
        assert!(table.selected_item().is_none());
    }

    #[test]
    fn test_visible_columns_follow_selection() {
        let lens = [9, 9, 9, 9];
        let (visible, relative) =
            calculate_visible_columns(&lens, 0, Some(3), 20);
        assert_eq!(visible, vec![3]);
        assert_eq!(relative, Some(0));

        let (visible, relative) =
            calculate_visible_columns(&lens, 0, None, 20);
        assert_eq!(visible, vec![0, 1]);
        assert_eq!(relative, None);
    }
}
