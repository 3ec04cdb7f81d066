use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{hotkey::Hotkey, hotkey_view::HotkeyView, theme::Theme};

/// Header with the connection summary, the hotkeys of the focused pane and
/// the app name
pub struct TopBarView<'a> {
    pub connection_summary: &'a str,
    pub connection_style: Style,
    pub hotkeys: &'a [Hotkey<'a>],
    pub app_name: &'a str,
    pub theme: &'a Theme,
}

impl Widget for TopBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [connection, hotkeys, name] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .spacing(1)
        .areas(area);

        let lines: Vec<Line> = self
            .connection_summary
            .lines()
            .map(|line| Line::from(Span::styled(line, self.connection_style)))
            .collect();
        Paragraph::new(lines).render(connection, buf);

        HotkeyView {
            hotkeys: self.hotkeys,
            theme: self.theme,
        }
        .render(hotkeys, buf);

        Paragraph::new(self.app_name.trim_start_matches('\n'))
            .style(self.theme.title)
            .alignment(Alignment::Right)
            .render(name, buf);
    }
}
