use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use querydeck_ui::{
    TableNavigationHandler, handle_connection_form_input,
    handle_query_editor_input, handle_search_filter_input,
    widgets::{
        connection_form::FormAction, query_editor::EditorField,
        search_filter::SearchTarget,
    },
};

use crate::{app::App, app_state::Focus};

impl App {
    /// Reads the crossterm events and updates the state of [`App`].
    ///
    /// Waits at most `timeout` so API responses are picked up between key
    /// presses.
    pub fn handle_crossterm_events(&mut self, timeout: Duration) -> Result<()> {
        if !event::poll(timeout)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.on_key_event(key);
            }
            Event::Key(_)
            | Event::FocusGained
            | Event::FocusLost
            | Event::Mouse(_)
            | Event::Paste(_)
            | Event::Resize(_, _) => {}
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn on_key_event(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.quit();
            return;
        }

        if self.connection_form.is_open {
            self.on_connection_form_key(key);
        } else if self.cell_popup.is_open {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.cell_popup.close();
            }
        } else if self.schema_popup.is_open {
            self.on_schema_popup_key(key);
        } else if self.history_panel.is_open {
            self.on_history_key(key);
        } else if self.search_filter.is_active {
            self.on_search_key(key);
        } else if !self.state.is_connected() {
            self.on_disconnected_key(key);
        } else if self.focus == Focus::Editor {
            self.on_editor_key(key);
        } else if !self.on_global_key(key) {
            match self.focus {
                Focus::Tables => self.on_tables_key(key),
                Focus::Results => self.on_results_key(key),
                Focus::Editor => {}
            }
        }
    }

    fn on_connection_form_key(&mut self, key: KeyEvent) {
        match handle_connection_form_input(
            key,
            &mut self.connection_form,
            &mut self.config,
        ) {
            FormAction::Connect => self.connect(),
            FormAction::Cancel | FormAction::Changed | FormAction::None => {}
        }
    }

    fn on_schema_popup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.schema_popup.close(),
            code => {
                TableNavigationHandler::navigate_table(
                    &mut self.schema_popup.table,
                    code,
                );
            }
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | 'H') => {
                self.history_panel.close();
            }
            KeyCode::Char('y') => self.copy_history_entry(),
            KeyCode::Enter => self.load_history_entry(),
            code => {
                TableNavigationHandler::navigate_table(
                    &mut self.history_panel.table,
                    code,
                );
            }
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        let target = self.search_filter.target.clone();
        let mut changed = None;
        let handled = handle_search_filter_input(
            key,
            &mut self.search_filter,
            &mut |query: &str| changed = Some(query.to_string()),
        );
        if !handled {
            return;
        }

        match target {
            SearchTarget::Tables => {
                if key.code == KeyCode::Esc {
                    self.search_filter.clear();
                    self.set_table_query("");
                } else if let Some(query) = changed {
                    self.set_table_query(&query);
                }
            }
            SearchTarget::Column(column) => {
                if let Some(query) = changed {
                    self.set_column_filter(&column, &query);
                }
            }
        }
    }

    fn on_disconnected_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('c') => {
                self.connection_form.open(&self.config, false);
            }
            KeyCode::Char('T') => self.toggle_theme(),
            _ => {}
        }
    }

    fn on_editor_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Tab) => self.focus = self.focus.next(),
            (_, KeyCode::BackTab) => self.focus = self.focus.previous(),
            (_, KeyCode::Esc) => self.focus = Focus::Tables,
            (_, KeyCode::F(5)) | (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
                self.execute_query();
            }
            (_, KeyCode::F(2)) => self.editor.toggle_field(),
            (_, KeyCode::Enter) if self.editor.field == EditorField::Prompt => {
                self.generate_query();
            }
            _ => {
                handle_query_editor_input(key, &mut self.editor);
            }
        }
    }

    /// Keys shared by the table list and results panes
    fn on_global_key(&mut self, key: KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('q')) => self.quit(),
            (_, KeyCode::Tab) => self.focus = self.focus.next(),
            (_, KeyCode::BackTab) => self.focus = self.focus.previous(),
            (_, KeyCode::Char('e')) => self.focus = Focus::Editor,
            (_, KeyCode::Char('c')) => {
                self.connection_form.open(&self.config, true);
            }
            (_, KeyCode::Char('T')) => self.toggle_theme(),
            (_, KeyCode::Char('i')) => self.show_db_info = !self.show_db_info,
            (_, KeyCode::Char('H')) => self.history_panel.open(&self.history),
            (_, KeyCode::F(5)) | (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
                self.execute_query();
            }
            _ => return false,
        }
        true
    }

    fn on_tables_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') => {
                let current = self.table_query.clone();
                self.search_filter.activate(SearchTarget::Tables, &current);
            }
            KeyCode::Enter => {
                if let Some(name) =
                    self.table_list.selected_item().map(|table| table.0.clone())
                {
                    self.select_table(&name);
                }
            }
            code => {
                TableNavigationHandler::navigate_table(
                    &mut self.table_list,
                    code,
                );
            }
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => self.sort_selected_column(),
            KeyCode::Char('/') => {
                if let Some(column) = self.selected_result_column() {
                    let current = self.result_view.filter(&column).to_string();
                    self.search_filter
                        .activate(SearchTarget::Column(column), &current);
                }
            }
            KeyCode::Char('x') => self.export_results(),
            KeyCode::Enter => self.open_selected_cell(),
            code => {
                TableNavigationHandler::navigate_table(
                    &mut self.results_table,
                    code,
                );
            }
        }
    }

    fn open_selected_cell(&mut self) {
        let column = self.results_table.selected_column().unwrap_or(0);
        let Some(row) = self.results_table.selected_item() else {
            return;
        };
        let value = row.values.get(column).cloned().unwrap_or_default();
        let name = self
            .result_view
            .columns()
            .get(column)
            .cloned()
            .unwrap_or_default();
        self.cell_popup.open(&name, &value);
    }
}
