use querydeck_api::{TableData, TableName};
use querydeck_ui::widgets::{
    hotkey::{
        CELL_HOTKEYS, DISCONNECTED_HOTKEYS, EDITOR_HOTKEYS, FORM_HOTKEYS,
        HISTORY_HOTKEYS, Hotkey, RESULTS_HOTKEYS, SCHEMA_HOTKEYS,
        SEARCH_HOTKEYS, TABLES_HOTKEYS,
    },
    info_panel::InfoPanel,
    query_editor::QueryEditor,
    search_filter::SearchTarget,
    top_bar_view::TopBarView,
};
use ratatui::{
    Frame,
    layout::Flex,
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    app::{APP_NAME, App},
    app_state::{Activity, ConnectionState, Focus},
    requests::Action,
};

/// Rows taken by the header; fits the app name art
pub const TOPBAR_HEIGHT: u16 = 6;
const SEARCH_HEIGHT: u16 = 3;
const INFO_HEIGHT: u16 = 10;
const EDITOR_HEIGHT: u16 = 10;

const DISCONNECTED_MESSAGE: &str =
    "Please connect to a database to begin using the query tools.";

impl App {
    /// Renders the user interface.
    pub fn render(&mut self, frame: &mut Frame) {
        let mut main_layout = vec![
            Constraint::Length(TOPBAR_HEIGHT),
            Constraint::Min(0),
        ];
        if !self.status_line.message().is_empty() {
            main_layout.push(Constraint::Length(1));
        }

        let layout = Layout::vertical(main_layout).split(frame.area());
        let top_area = layout.first().copied().unwrap_or_default();
        let body_area = layout.get(1).copied().unwrap_or_else(|| frame.area());

        let summary = self.connection_summary();
        let connection_style = match self.state {
            ConnectionState::Connected(_) => self.theme.success,
            ConnectionState::Connecting { .. } => self.theme.muted,
            ConnectionState::Disconnected => self.theme.error,
        };
        frame.render_widget(
            TopBarView {
                connection_summary: &summary,
                connection_style,
                hotkeys: self.hotkeys(),
                app_name: APP_NAME,
                theme: &self.theme,
            },
            top_area,
        );

        if self.state.is_connected() {
            self.render_workspace(frame, body_area);
        } else {
            self.render_disconnected(frame, body_area);
        }

        if let Some(status_area) = layout.get(2) {
            frame.render_widget(&self.status_line, *status_area);
        }

        self.render_popups(frame);
    }

    fn connection_summary(&self) -> String {
        match self.state {
            ConnectionState::Disconnected => "Not connected".to_string(),
            ConnectionState::Connecting { .. } => {
                format!("Connecting...\n{}", self.config)
            }
            ConnectionState::Connected(_) => self.config.to_string(),
        }
    }

    /// Hotkeys for whatever currently receives key presses, checked in the
    /// same order as [`App::on_key_event`]
    fn hotkeys(&self) -> &'static [Hotkey<'static>] {
        if self.connection_form.is_open {
            &FORM_HOTKEYS
        } else if self.cell_popup.is_open {
            &CELL_HOTKEYS
        } else if self.schema_popup.is_open {
            &SCHEMA_HOTKEYS
        } else if self.history_panel.is_open {
            &HISTORY_HOTKEYS
        } else if self.search_filter.is_active {
            &SEARCH_HOTKEYS
        } else if !self.state.is_connected() {
            &DISCONNECTED_HOTKEYS
        } else {
            match self.focus {
                Focus::Tables => &TABLES_HOTKEYS,
                Focus::Editor => &EDITOR_HOTKEYS,
                Focus::Results => &RESULTS_HOTKEYS,
            }
        }
    }

    fn render_disconnected(&self, frame: &mut Frame, area: Rect) {
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .style(self.theme.base);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [message_area] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(inner);
        frame.render_widget(
            Paragraph::new(DISCONNECTED_MESSAGE)
                .style(self.theme.muted)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            message_area,
        );
    }

    /// Table list on the left; info, editor and results on the right
    fn render_workspace(&mut self, frame: &mut Frame, area: Rect) {
        let [left, right] = Layout::horizontal([
            Constraint::Percentage(25),
            Constraint::Percentage(75),
        ])
        .areas(area);

        self.render_table_list(frame, left);

        let mut constraints = Vec::with_capacity(3);
        if self.show_db_info {
            constraints.push(Constraint::Length(INFO_HEIGHT));
        }
        constraints.push(Constraint::Length(EDITOR_HEIGHT));
        constraints.push(Constraint::Min(0));
        let panes = Layout::vertical(constraints).split(right);
        let mut panes = panes.iter().copied();

        if self.show_db_info
            && let Some(info_area) = panes.next()
        {
            frame.render_widget(
                InfoPanel {
                    info: &self.db_info,
                    theme: &self.theme,
                    focused: false,
                },
                info_area,
            );
        }
        if let Some(editor_area) = panes.next() {
            self.render_editor(frame, editor_area);
        }
        if let Some(results_area) = panes.next() {
            self.render_results(frame, results_area);
        }
    }

    fn render_table_list(&mut self, frame: &mut Frame, area: Rect) {
        let area = self.render_search_box(frame, area, false);
        let focused = self.focus == Focus::Tables;

        let title = if self.table_query.is_empty() {
            format!(" {} ", TableName::title())
        } else {
            format!(" {} [{}] ", TableName::title(), self.table_query)
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.theme.border_for(focused))
            .style(self.theme.base);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.table_list.model.items.is_empty() {
            let message = if self.requests.is_pending(Action::Tables) {
                "Loading..."
            } else {
                "No tables"
            };
            frame.render_widget(
                Paragraph::new(message).style(self.theme.muted),
                inner,
            );
            return;
        }

        let table = &mut self.table_list;
        frame.render_stateful_widget(
            table.model.widget(&self.theme, focused),
            inner,
            &mut table.view,
        );
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let label = QueryEditor::label(&self.config);
        let executing =
            self.state == ConnectionState::Connected(Activity::Querying);
        frame.render_widget(
            self.editor
                .widget(&label, &self.theme, self.focus == Focus::Editor)
                .pending(self.requests.is_pending(Action::Generate), executing),
            area,
        );
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let area = self.render_search_box(frame, area, true);
        let focused = self.focus == Focus::Results;

        let visible = self.results_table.model.items.len();
        let total = self.result_view.result_set().len();
        let title = if visible == total {
            format!(" Results ({total} rows) ")
        } else {
            format!(" Results ({visible} of {total} rows) ")
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.theme.border_for(focused))
            .style(self.theme.base);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.result_view.columns().is_empty() {
            frame.render_widget(
                Paragraph::new("Run a query to see results")
                    .style(self.theme.muted),
                inner,
            );
            return;
        }

        let table = &mut self.results_table;
        frame.render_stateful_widget(
            table.model.widget(&self.theme, focused),
            inner,
            &mut table.view,
        );
    }

    /// Draw the search box above `area` when it edits this pane, returning
    /// what is left for the pane
    fn render_search_box(
        &self,
        frame: &mut Frame,
        area: Rect,
        results_pane: bool,
    ) -> Rect {
        let editing_here = self.search_filter.is_active
            && match self.search_filter.target {
                SearchTarget::Tables => !results_pane,
                SearchTarget::Column(_) => results_pane,
            };
        if !editing_here {
            return area;
        }
        let [search, rest] = Layout::vertical([
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(0),
        ])
        .areas(area);
        frame.render_widget(&self.search_filter, search);
        rest
    }

    /// Popups draw last, over everything else
    fn render_popups(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let buf = frame.buffer_mut();

        self.schema_popup.render(area, buf, &self.theme);
        self.history_panel.render(area, buf, &self.theme);
        if self.cell_popup.is_open {
            self.cell_popup.widget(&self.theme).render(area, buf);
        }
        if self.connection_form.is_open {
            self.connection_form.widget(&self.theme).render(area, buf);
        }
    }
}
