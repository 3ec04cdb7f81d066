use querydeck_api::{HistoryEntry, QueryHistory, TableData};
use ratatui::{
    prelude::{Alignment, Buffer, Rect, StatefulWidget, Widget},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::widgets::{centered_rect, table::DataTable, theme::Theme};

/// Popup listing executed queries, newest first
#[derive(Debug, Clone)]
pub struct HistoryPanel {
    pub is_open: bool,
    pub table: DataTable<HistoryEntry>,
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self {
            is_open: false,
            table: DataTable::new(Vec::new()),
        }
    }
}

impl HistoryPanel {
    /// Open on a snapshot of `history` with the newest entry selected
    pub fn open(&mut self, history: &QueryHistory) {
        self.table = DataTable::new(history.entries().to_vec());
        self.is_open = true;
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&HistoryEntry> {
        self.table.selected_item()
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.is_open {
            return;
        }

        let popup = centered_rect(
            area,
            area.width.saturating_mul(4) / 5,
            area.height.saturating_mul(3) / 5,
        );
        let block = Block::default()
            .title(format!(" {} ", HistoryEntry::title()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme.border_focused)
            .style(theme.base);
        let inner = block.inner(popup);
        Clear.render(popup, buf);
        block.render(popup, buf);

        if self.table.model.items.is_empty() {
            Paragraph::new("No queries executed yet")
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

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use querydeck_api::ConnectionConfig;

    use super::*;

    #[test]
    fn test_default_is_closed_and_empty() {
        let panel = HistoryPanel::default();
        assert!(!panel.is_open);
        assert!(panel.table.model.items.is_empty());
        assert!(panel.selected().is_none());
    }

    #[test]
    fn test_open_selects_newest() {
        let mut history = QueryHistory::default();
        let config = ConnectionConfig::default();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        history.record("SELECT 1", &config, ts);
        history.record("SELECT 2", &config, ts);

        let mut panel = HistoryPanel::default();
        panel.open(&history);
        assert!(panel.is_open);
        assert_eq!(
            panel.selected().map(|entry| entry.query.as_str()),
            Some("SELECT 2")
        );
    }
}
