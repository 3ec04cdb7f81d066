use ratatui::{
    prelude::{Buffer, Rect, Widget},
    text::{Line, Span},
};

use crate::widgets::theme::Theme;

/// A centered row of buttons with one highlighted.
///
/// `selected` may point past the last button when focus is elsewhere.
pub struct Buttons<'a> {
    pub buttons: &'a [&'a str],
    pub selected: Option<usize>,
    pub theme: &'a Theme,
}

impl Widget for Buttons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut button_spans = vec![];
        for (i, button) in self.buttons.iter().enumerate() {
            let style = if self.selected == Some(i) {
                self.theme.button_selected
            } else {
                self.theme.button
            };
            button_spans.push(Span::styled(format!(" {button} "), style));
            button_spans.push(Span::raw(" "));
        }
        Line::from(button_spans).centered().render(area, buf);
    }
}
