use querydeck_api::DbInfo;
use ratatui::{
    prelude::{Buffer, Constraint, Layout, Rect, Widget},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::widgets::theme::Theme;

const CARD_HEIGHT: u16 = 4;
const CARD_MIN_WIDTH: u16 = 22;

/// Database facts drawn as a grid of label/value cards
pub struct InfoPanel<'a> {
    pub info: &'a DbInfo,
    pub theme: &'a Theme,
    pub focused: bool,
}

impl InfoPanel<'_> {
    /// Cards that fit side by side in `width`
    #[must_use]
    pub fn cards_per_row(width: u16) -> usize {
        usize::from((width / CARD_MIN_WIDTH).max(1))
    }
}

impl Widget for InfoPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Database Info ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_for(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let entries = self.info.entries();
        if entries.is_empty() {
            Paragraph::new("No database info")
                .style(self.theme.muted)
                .render(inner, buf);
            return;
        }

        let per_row = Self::cards_per_row(inner.width);
        let rows = entries.chunks(per_row);
        let row_areas = Layout::vertical(
            rows.clone().map(|_| Constraint::Length(CARD_HEIGHT)),
        )
        .split(inner);

        for (row, row_area) in rows.zip(row_areas.iter()) {
            let card_areas = Layout::horizontal(
                (0..per_row).map(|_| Constraint::Fill(1)),
            )
            .spacing(1)
            .split(*row_area);

            for ((label, value), card_area) in row.iter().zip(card_areas.iter())
            {
                let card = Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border);
                let card_inner = card.inner(*card_area);
                card.render(*card_area, buf);

                Paragraph::new(vec![
                    Line::from(Span::styled(label.as_str(), self.theme.muted)),
                    Line::from(Span::styled(value.as_str(), self.theme.title)),
                ])
                .render(card_inner, buf);
            }
        }
    }
}
