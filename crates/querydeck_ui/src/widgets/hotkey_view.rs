use ratatui::{
    prelude::{Buffer, Rect, Widget},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::{hotkey::Hotkey, theme::Theme};

/// Hotkeys laid out top to bottom, spilling into further columns
pub struct HotkeyView<'a> {
    pub hotkeys: &'a [Hotkey<'a>],
    pub theme: &'a Theme,
}

impl Widget for HotkeyView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let column_width = self
            .hotkeys
            .iter()
            .map(|hotkey| {
                hotkey.to_string().width() + hotkey.description.width() + 4
            })
            .max()
            .map_or(0, |width| u16::try_from(width).unwrap_or(u16::MAX));

        let max_y = area.y + area.height;
        let max_x = area.x + area.width;
        let mut y = area.y;
        let mut x = area.x;

        for hotkey in self.hotkeys {
            if y >= max_y {
                x = x.saturating_add(column_width);
                y = area.y;
            }
            if x >= max_x {
                break;
            }

            let width = column_width.min(max_x - x);
            let line = Line::from(vec![
                Span::styled(format!("<{hotkey}>"), self.theme.title),
                Span::styled(format!(" {}", hotkey.description), self.theme.muted),
            ]);
            Paragraph::new(line).render(Rect::new(x, y, width, 1), buf);

            y += 1;
        }
    }
}
