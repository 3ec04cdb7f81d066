pub mod buttons;
pub mod connection_form;
pub mod history_panel;
pub mod hotkey;
pub mod hotkey_view;
pub mod info_panel;
pub mod popup;
pub mod query_editor;
pub mod search_filter;
pub mod status_line;
pub mod table;
pub mod text_input;
pub mod theme;
pub mod top_bar_view;

use querydeck_api::TableData;
use ratatui::layout::Rect;
pub use status_line::StatusLine;
use unicode_width::UnicodeWidthStr;

/// Display width of each column: the widest of its header label and every
/// line of every value
pub fn constraint_len_calculator<T: TableData>(
    header: &[&str],
    items: &[T],
) -> Vec<u16> {
    let num_columns = items
        .first()
        .map_or(0, TableData::num_columns)
        .max(header.len());

    let mut result: Vec<usize> = (0..num_columns)
        .map(|idx| header.get(idx).map_or(0, |name| name.width()))
        .collect();

    for data in items {
        for (max_width, value) in result.iter_mut().zip(data.ref_array()) {
            for line in value.lines() {
                *max_width = (*max_width).max(UnicodeWidthStr::width(line));
            }
        }
    }

    result
        .into_iter()
        .map(|width| u16::try_from(width).unwrap_or(u16::MAX).max(1))
        .collect()
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
#[must_use]
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use querydeck_api::TableName;

    use super::*;

    #[test]
    fn test_constraint_len_uses_widest_line() {
        let items = vec![
            TableName("orders".to_string()),
            TableName("a\nvery_long_name".to_string()),
        ];
        assert_eq!(constraint_len_calculator(&["Name"], &items), vec![14]);
        assert!(constraint_len_calculator::<TableName>(&[], &[]).is_empty());
    }

    #[test]
    fn test_constraint_len_counts_display_width() {
        let items = vec![TableName("顧客".to_string())];
        assert_eq!(constraint_len_calculator(&["Name"], &items), vec![4]);

        let items = vec![TableName("顧客テーブル".to_string())];
        assert_eq!(constraint_len_calculator(&["Name"], &items), vec![12]);
    }

    #[test]
    fn test_centered_rect_is_clipped() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(area, 40, 40), area);
    }
}
