use crossterm::event::KeyCode;
use querydeck_api::TableData;

use crate::widgets::table::DataTable;

/// Width assumed when scrolling columns outside of a render pass
pub const DEFAULT_TERMINAL_WIDTH: u16 = 80;

/// Helper for table navigation operations
pub struct TableNavigationHandler;

impl TableNavigationHandler {
    /// Vim style and arrow key movement over rows and columns.
    ///
    /// Returns `false` if `key` is not a navigation key.
    pub fn navigate_table<T: TableData + Clone>(
        table: &mut DataTable<T>,
        key: KeyCode,
    ) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                table.view.state.select_next();
                table.clamp_selection();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                table.view.state.select_previous();
                table.clamp_selection();
            }
            KeyCode::Char('h' | 'b') | KeyCode::Left => {
                // With no column selected, start from the last one
                if table.view.state.selected_column().is_none() {
                    let num_cols = table.num_columns();
                    if num_cols > 0 {
                        table
                            .view
                            .state
                            .select_column(Some(num_cols.saturating_sub(1)));
                    }
                } else {
                    table.view.state.select_previous_column();
                }
                Self::follow_selected_column(table);
            }
            KeyCode::Char('l' | 'w') | KeyCode::Right => {
                if table.view.state.selected_column().is_none() {
                    table.view.state.select_column(Some(0));
                } else {
                    table.view.state.select_next_column();
                }
                Self::follow_selected_column(table);
            }
            KeyCode::Char('0') => {
                table.view.state.select_column(Some(0));
                table.view.column_offset = 0;
                table.clamp_selection();
            }
            KeyCode::Char('$') => {
                let last_col = table.num_columns().saturating_sub(1);
                table.view.state.select_column(Some(last_col));
                Self::follow_selected_column(table);
            }
            KeyCode::Char('g') | KeyCode::Home => {
                table.view.state.select(Some(0));
                table.clamp_selection();
            }
            KeyCode::Char('G') | KeyCode::End => {
                let len = table.model.items.len();
                table.view.state.select(len.checked_sub(1));
            }
            KeyCode::PageDown => {
                table.view.state.scroll_down_by(10);
                table.clamp_selection();
            }
            KeyCode::PageUp => {
                table.view.state.scroll_up_by(10);
                table.clamp_selection();
            }
            _ => return false,
        }
        true
    }

    fn follow_selected_column<T: TableData + Clone>(table: &mut DataTable<T>) {
        table.clamp_selection();
        if let Some(selected_col) = table.view.state.selected_column() {
            table.adjust_offset_for_selected_column(
                selected_col,
                DEFAULT_TERMINAL_WIDTH,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable<crate::widgets::table::RawTableRow> {
        DataTable::from_raw_data(
            vec![
                vec!["1".to_string(), "a".to_string()],
                vec!["2".to_string(), "b".to_string()],
                vec!["3".to_string(), "c".to_string()],
            ],
            vec!["id".to_string(), "name".to_string()],
        )
    }

    #[test]
    fn test_row_navigation_is_clamped() {
        let mut table = table();
        for _ in 0..5 {
            TableNavigationHandler::navigate_table(&mut table, KeyCode::Down);
        }
        assert_eq!(table.view.state.selected(), Some(2));
        TableNavigationHandler::navigate_table(&mut table, KeyCode::Char('g'));
        assert_eq!(table.view.state.selected(), Some(0));
        TableNavigationHandler::navigate_table(&mut table, KeyCode::Char('G'));
        assert_eq!(table.view.state.selected(), Some(2));
    }

    #[test]
    fn test_column_navigation() {
        let mut table = table();
        TableNavigationHandler::navigate_table(&mut table, KeyCode::Right);
        assert_eq!(table.selected_column(), Some(0));
        for _ in 0..3 {
            TableNavigationHandler::navigate_table(&mut table, KeyCode::Right);
        }
        assert_eq!(table.selected_column(), Some(1));
        TableNavigationHandler::navigate_table(&mut table, KeyCode::Char('0'));
        assert_eq!(table.selected_column(), Some(0));
    }

    #[test]
    fn test_unknown_key_is_not_consumed() {
        let mut table = table();
        assert!(!TableNavigationHandler::navigate_table(
            &mut table,
            KeyCode::Char('x')
        ));
    }
}
