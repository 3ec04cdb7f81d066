use std::{sync::Arc, time::Duration};

use chrono::Utc;
use color_eyre::Result;
use querydeck_api::{
    ConnectionConfig, DatabaseApi, DbInfo, LocalStore, QueryHistory,
    ResultRow, ResultSet, TableName,
};
use querydeck_ui::{
    ResultView, StatusLine,
    widgets::{
        connection_form::ConnectionForm,
        history_panel::HistoryPanel,
        popup::{CellValuePopup, SchemaPopup},
        query_editor::QueryEditor,
        search_filter::SearchFilter,
        table::{DataTable, RawTableRow},
        theme::Theme,
    },
};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    actions::{ApiEvent, Dispatcher},
    app_state::{Activity, ConnectionState, Focus},
    export::{self, Clipboard},
    requests::{Action, RequestTracker},
    settings::Settings,
};

pub const APP_NAME: &str = r"
  __ _ _  _ ___ _ _ _  _ ___  ___ ___ _  __
 / _` | || / -_) '_| || / _ \/ -_) _| |/ /
 \__, |\_,_\___|_|  \_, \___/\___\__|_|\_\
    |_|             |__/
";

/// How long the loop waits for input before checking for API responses
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    pub running: bool,
    pub settings: Settings,
    pub store: LocalStore,
    pub dispatcher: Dispatcher,
    pub events: UnboundedReceiver<ApiEvent>,
    pub requests: RequestTracker,
    pub clipboard: Box<dyn Clipboard>,
    /// The single live connection config, edited by the connection form
    pub config: ConnectionConfig,
    pub state: ConnectionState,
    pub focus: Focus,
    /// Every name from the last tables fetch
    pub tables: Vec<TableName>,
    /// Search text applied to `tables`
    pub table_query: String,
    /// `tables` narrowed by `table_query`
    pub table_list: DataTable<TableName>,
    pub db_info: DbInfo,
    pub show_db_info: bool,
    pub result_view: ResultView,
    pub results_table: DataTable<RawTableRow>,
    pub history: QueryHistory,
    pub editor: QueryEditor,
    pub search_filter: SearchFilter,
    pub connection_form: ConnectionForm,
    pub schema_popup: SchemaPopup,
    pub cell_popup: CellValuePopup,
    pub history_panel: HistoryPanel,
    pub status_line: StatusLine,
    pub theme: Theme,
}

impl App {
    /// Build the app around `api`, restoring the saved config and history
    pub fn new(
        settings: Settings,
        store: LocalStore,
        api: Arc<dyn DatabaseApi>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let config = store.load_config().unwrap_or_default();
        let history =
            QueryHistory::new(store.load_history(), settings.history_limit);
        let theme = Theme::new(settings.theme);

        let mut connection_form = ConnectionForm::new();
        connection_form.open(&config, false);

        tracing::info!(
            api = %settings.api_base_url,
            history = history.len(),
            "Starting querydeck"
        );

        Self {
            running: false,
            settings,
            store,
            dispatcher: Dispatcher::new(api, tx),
            events,
            requests: RequestTracker::new(),
            clipboard,
            config,
            state: ConnectionState::Disconnected,
            focus: Focus::Tables,
            tables: Vec::new(),
            table_query: String::new(),
            table_list: DataTable::new(Vec::new()),
            db_info: DbInfo::default(),
            show_db_info: true,
            result_view: ResultView::new(),
            results_table: DataTable::default(),
            history,
            editor: QueryEditor::new(),
            search_filter: SearchFilter::new(),
            connection_form,
            schema_popup: SchemaPopup::default(),
            cell_popup: CellValuePopup::default(),
            history_panel: HistoryPanel::default(),
            status_line: StatusLine::new(),
            theme,
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.drain_events();
            self.handle_crossterm_events(POLL_INTERVAL)?;
            tokio::task::yield_now().await;
        }
        tracing::info!("Shutting down");
        Ok(())
    }

    pub const fn quit(&mut self) {
        self.running = false;
    }

    /// Apply every API response that has arrived, without waiting
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    /// Wait for the next API response and apply it
    #[cfg(test)]
    pub async fn process_next_event(&mut self) {
        if let Some(event) = self.events.recv().await {
            self.apply_event(event);
        }
    }

    /// Connect with the live config
    pub fn connect(&mut self) {
        let ticket = self.requests.issue(Action::Connect);
        self.state = ConnectionState::Connecting {
            was_connected: self.state.is_connected(),
        };
        self.status_line.set_message("Connecting...");
        self.dispatcher.connect(ticket, self.config.clone());
    }

    /// Make `name` the active collection and fetch its schema
    pub fn select_table(&mut self, name: &str) {
        self.config.collection = name.to_string();
        let ticket = self.requests.issue(Action::Schema);
        self.dispatcher.schema(ticket, self.config.clone());
    }

    /// Run the query buffer against the live config
    pub fn execute_query(&mut self) {
        if !self.state.is_connected() {
            self.status_line.set_error("Connect to a database first");
            return;
        }
        let ticket = self.requests.issue(Action::Query);
        if let ConnectionState::Connected(_) = self.state {
            self.state = ConnectionState::Connected(Activity::Querying);
        }
        self.dispatcher.query(
            ticket,
            self.config.clone(),
            self.editor.query().to_string(),
        );
    }

    /// Ask the API to turn the prompt into a query
    pub fn generate_query(&mut self) {
        let ticket = self.requests.issue(Action::Generate);
        self.status_line.set_message("Generating query...");
        self.dispatcher
            .generate(ticket, self.editor.prompt().to_string());
    }

    /// Fold one API response into the application state
    pub fn apply_event(&mut self, event: ApiEvent) {
        if !self.requests.settle(event.ticket()) {
            return;
        }

        match event {
            ApiEvent::Connected {
                ticket,
                config,
                result,
            } => match result {
                Ok(()) => {
                    self.requests.begin_session(&ticket);
                    self.on_connected(config);
                }
                Err(e) => {
                    self.state = match self.state {
                        ConnectionState::Connecting {
                            was_connected: true,
                        } => ConnectionState::Connected(Activity::Browsing),
                        ConnectionState::Connecting {
                            was_connected: false,
                        }
                        | ConnectionState::Disconnected => {
                            ConnectionState::Disconnected
                        }
                        ConnectionState::Connected(activity) => {
                            ConnectionState::Connected(activity)
                        }
                    };
                    tracing::warn!(error = %e, "Connect failed");
                    self.status_line.set_error(e.to_string());
                }
            },
            ApiEvent::Tables { result, .. } => match result {
                Ok(names) => {
                    self.tables = names.into_iter().map(TableName).collect();
                    self.apply_table_search();
                }
                Err(e) => self.status_line.set_error(e.to_string()),
            },
            ApiEvent::DbInfo { result, .. } => match result {
                Ok(info) => self.db_info = info,
                Err(e) => self.status_line.set_error(e.to_string()),
            },
            ApiEvent::Schema {
                collection, result, ..
            } => match result {
                Ok(fields) => self.schema_popup.open(&collection, fields),
                Err(e) => self.status_line.set_error(e.to_string()),
            },
            ApiEvent::Query {
                query,
                config,
                result,
                ..
            } => {
                if let ConnectionState::Connected(_) = self.state {
                    self.state = ConnectionState::Connected(Activity::Browsing);
                }
                match result {
                    Ok(rows) => self.on_query_success(&query, &config, rows),
                    Err(e) => {
                        tracing::warn!(error = %e, "Query failed");
                        self.status_line.set_error(e.to_string());
                    }
                }
            }
            ApiEvent::Generated { result, .. } => match result {
                Ok(query) => {
                    self.editor.set_query(&query);
                    self.status_line.set_message("Query generated");
                }
                Err(e) => self.status_line.set_error(e.to_string()),
            },
        }
    }

    fn on_connected(&mut self, config: ConnectionConfig) {
        self.state = ConnectionState::Connected(Activity::Browsing);
        self.connection_form.close();
        self.status_line.set_message("Connected");

        if let Err(e) = self.store.save_config(&config) {
            tracing::warn!(error = %e, "Failed to save connection config");
        }

        self.tables.clear();
        self.apply_table_search();
        self.db_info = DbInfo::default();

        let tables = self.requests.issue(Action::Tables);
        self.dispatcher.tables(tables, config.clone());
        let db_info = self.requests.issue(Action::DbInfo);
        self.dispatcher.db_info(db_info, config);
    }

    fn on_query_success(
        &mut self,
        query: &str,
        config: &ConnectionConfig,
        rows: Vec<ResultRow>,
    ) {
        let count = rows.len();
        self.result_view.set_result_set(ResultSet::new(rows));
        self.refresh_results_table();
        self.status_line.set_message(format!("{count} rows"));

        self.history.record(query, config, Utc::now());
        if let Err(e) = self.store.save_history(self.history.entries()) {
            tracing::warn!(error = %e, "Failed to save query history");
        }
    }

    /// Narrow the table list to names matching `query`
    pub fn set_table_query(&mut self, query: &str) {
        query.clone_into(&mut self.table_query);
        self.apply_table_search();
    }

    fn apply_table_search(&mut self) {
        let filtered = DataTable::filter(&self.tables, &self.table_query);
        self.table_list.set_items(filtered);
    }

    /// Column of the result set under the table cursor
    #[must_use]
    pub fn selected_result_column(&self) -> Option<String> {
        let idx = self.results_table.selected_column().unwrap_or(0);
        self.result_view.columns().get(idx).cloned()
    }

    pub fn set_column_filter(&mut self, column: &str, substring: &str) {
        self.result_view.set_filter(column, substring);
        self.refresh_results_table();
    }

    pub fn sort_selected_column(&mut self) {
        if let Some(column) = self.selected_result_column() {
            self.result_view.set_sort(&column);
            self.refresh_results_table();
        }
    }

    /// Rebuild the visible result table from the result view
    pub fn refresh_results_table(&mut self) {
        let sort = self.result_view.sort();
        let header = self
            .result_view
            .columns()
            .iter()
            .map(|column| {
                let mut label = column.clone();
                if self.result_view.is_filtered(column) {
                    label.push('*');
                }
                if let Some(sort) = sort.filter(|sort| &sort.column == column)
                {
                    label.push(' ');
                    label.push_str(sort.direction.arrow());
                }
                label
            })
            .collect();
        let rows = self.result_view.derive_cells();
        self.results_table.reset(rows, header);
    }

    /// Write the visible rows to the export file
    pub fn export_results(&mut self) {
        let Some(csv) = self.result_view.export_csv() else {
            self.status_line.set_error("Nothing to export");
            return;
        };
        let path = self.settings.export_path();
        match export::write_csv(&path, &csv) {
            Ok(()) => self.status_line.set_message(format!(
                "Exported {} rows to {}",
                self.result_view.derive().len(),
                path.display()
            )),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    "Export failed"
                );
                self.status_line.set_error(format!("Export failed: {e}"));
            }
        }
    }

    /// Copy the query of the selected history entry to the clipboard
    pub fn copy_history_entry(&mut self) {
        let Some(query) =
            self.history_panel.selected().map(|entry| entry.query.clone())
        else {
            return;
        };
        match self.clipboard.copy(&query) {
            Ok(()) => self.status_line.set_message("Query copied to clipboard"),
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard write failed");
                self.status_line.set_error("Failed to copy to clipboard");
            }
        }
    }

    /// Put the selected history entry back into the query buffer
    pub fn load_history_entry(&mut self) {
        if let Some(query) =
            self.history_panel.selected().map(|entry| entry.query.clone())
        {
            self.editor.set_query(&query);
            self.history_panel.close();
            self.focus = Focus::Editor;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = %self.theme.mode, "Theme toggled");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use querydeck_api::{
        ApiError, DbKind, FieldDescriptor, ResultRow, error::FetchTarget,
    };
    use serde_json::json;

    use super::*;

    /// Scripted API: every call answers from the fields below
    #[derive(Default)]
    struct FakeApi {
        connect: Mutex<Vec<Result<(), ApiError>>>,
        tables: Vec<String>,
        queries: Mutex<Vec<Result<Vec<ResultRow>, ApiError>>>,
        schema_error: bool,
    }

    #[async_trait]
    impl DatabaseApi for FakeApi {
        async fn connect(
            &self,
            _config: &ConnectionConfig,
        ) -> Result<(), ApiError> {
            self.connect.lock().unwrap().pop().unwrap_or(Ok(()))
        }

        async fn tables(
            &self,
            _config: &ConnectionConfig,
        ) -> Result<Vec<String>, ApiError> {
            Ok(self.tables.clone())
        }

        async fn db_info(
            &self,
            _config: &ConnectionConfig,
        ) -> Result<DbInfo, ApiError> {
            Ok(serde_json::from_value(json!({"Version": "1.0"})).unwrap())
        }

        async fn schema(
            &self,
            config: &ConnectionConfig,
        ) -> Result<Vec<FieldDescriptor>, ApiError> {
            if self.schema_error {
                return Err(ApiError::Fetch {
                    target: FetchTarget::Schema,
                    message: FetchTarget::Schema.fallback().to_string(),
                });
            }
            Ok(vec![FieldDescriptor {
                name: format!("{}_id", config.collection),
                data_type: "int".to_string(),
            }])
        }

        async fn query(
            &self,
            _config: &ConnectionConfig,
            _query: &str,
        ) -> Result<Vec<ResultRow>, ApiError> {
            self.queries.lock().unwrap().pop().unwrap_or(Ok(Vec::new()))
        }

        async fn generate_query(
            &self,
            prompt: &str,
        ) -> Result<String, ApiError> {
            Ok(format!("SELECT '{prompt}'"))
        }
    }

    #[derive(Default)]
    struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

    impl Clipboard for RecordingClipboard {
        fn copy(&mut self, text: &str) -> std::io::Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn rows(value: serde_json::Value) -> Vec<ResultRow> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row.as_object().unwrap().clone())
            .collect()
    }

    fn app_with(api: FakeApi) -> App {
        let mut app = App::new(
            Settings::default(),
            LocalStore::open_in_memory().unwrap(),
            Arc::new(api),
            Box::new(RecordingClipboard::default()),
        );
        app.config = ConnectionConfig {
            kind: DbKind::Sql,
            url: "postgres://db".to_string(),
            ..ConnectionConfig::default()
        };
        app
    }

    async fn connected(api: FakeApi) -> App {
        let mut app = app_with(api);
        app.connect();
        app.process_next_event().await;
        // tables + db-info
        app.process_next_event().await;
        app.process_next_event().await;
        app
    }

    #[tokio::test]
    async fn test_connect_fetches_tables_and_saves_config() {
        let api = FakeApi {
            tables: vec!["users".to_string(), "orders".to_string()],
            ..FakeApi::default()
        };
        let app = connected(api).await;

        assert_eq!(
            app.state,
            ConnectionState::Connected(Activity::Browsing)
        );
        assert!(!app.connection_form.is_open);
        assert_eq!(app.table_list.model.items.len(), 2);
        assert!(!app.db_info.is_empty());
        assert_eq!(app.store.load_config(), Some(app.config.clone()));
    }

    #[tokio::test]
    async fn test_failed_connect_returns_to_disconnected() {
        let api = FakeApi {
            connect: Mutex::new(vec![Err(ApiError::Connection(
                "bad credentials".to_string(),
            ))]),
            ..FakeApi::default()
        };
        let mut app = app_with(api);
        app.connect();
        app.process_next_event().await;

        assert_eq!(app.state, ConnectionState::Disconnected);
        assert_eq!(app.status_line.error(), Some("bad credentials"));
        assert!(app.connection_form.is_open);
        assert_eq!(app.store.load_config(), None);
    }

    #[tokio::test]
    async fn test_failed_reconnect_stays_connected() {
        let api = FakeApi {
            connect: Mutex::new(vec![
                Err(ApiError::Connection(
                    ApiError::CONNECTION_FALLBACK.to_string(),
                )),
                Ok(()),
            ]),
            ..FakeApi::default()
        };
        let mut app = connected(api).await;
        app.connect();
        app.process_next_event().await;

        assert_eq!(
            app.state,
            ConnectionState::Connected(Activity::Browsing)
        );
        assert_eq!(app.status_line.error(), Some("Connection Failed"));
    }

    #[tokio::test]
    async fn test_query_success_replaces_results_and_records_history() {
        let api = FakeApi {
            queries: Mutex::new(vec![Ok(rows(json!([
                {"id": "2", "name": "b"},
                {"id": "10", "name": "a"},
            ])))]),
            ..FakeApi::default()
        };
        let mut app = connected(api).await;
        app.status_line.set_error("stale error");
        app.editor.set_query("SELECT * FROM users");
        app.execute_query();
        assert_eq!(app.state, ConnectionState::Connected(Activity::Querying));
        app.process_next_event().await;

        assert_eq!(app.state, ConnectionState::Connected(Activity::Browsing));
        assert_eq!(app.status_line.error(), None);
        assert_eq!(app.result_view.result_set().len(), 2);
        assert_eq!(app.results_table.model.items.len(), 2);
        assert_eq!(app.history.len(), 1);
        assert_eq!(
            app.history.get(0).map(|entry| entry.query.as_str()),
            Some("SELECT * FROM users")
        );
        assert_eq!(app.store.load_history().len(), 1);
    }

    #[tokio::test]
    async fn test_query_failure_keeps_previous_results() {
        let api = FakeApi {
            queries: Mutex::new(vec![
                Err(ApiError::QueryExecution("syntax error".to_string())),
                Ok(rows(json!([{"a": 1}]))),
            ]),
            ..FakeApi::default()
        };
        let mut app = connected(api).await;
        app.execute_query();
        app.process_next_event().await;
        let before = app.result_view.result_set().clone();

        app.execute_query();
        app.process_next_event().await;

        assert_eq!(app.status_line.error(), Some("syntax error"));
        assert_eq!(app.result_view.result_set(), &before);
        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_query_response_is_discarded() {
        let api = FakeApi {
            queries: Mutex::new(vec![
                Ok(rows(json!([{"v": "new"}]))),
                Ok(rows(json!([{"v": "old"}]))),
            ]),
            ..FakeApi::default()
        };
        let mut app = connected(api).await;
        app.execute_query();
        app.execute_query();

        let mut received = Vec::new();
        for _ in 0..2 {
            if let Some(event) = app.events.recv().await {
                received.push(event);
            }
        }
        // Apply in reverse issue order so the older response lands last
        received.sort_by_key(|event| {
            std::cmp::Reverse(event.ticket().generation)
        });
        for event in received {
            app.apply_event(event);
        }

        assert_eq!(app.history.len(), 1);
        let rows = app.result_view.result_set().rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().and_then(|row| row.get("v")), Some(&json!("new")));
    }

    #[tokio::test]
    async fn test_tables_from_previous_session_are_ignored() {
        let api = FakeApi {
            tables: vec!["old_table".to_string()],
            ..FakeApi::default()
        };
        let mut app = app_with(api);
        app.connect();
        app.process_next_event().await;

        // Reconnect before the first session's tables arrive
        let mut pending = Vec::new();
        for _ in 0..2 {
            if let Some(event) = app.events.recv().await {
                pending.push(event);
            }
        }
        app.connect();
        app.process_next_event().await;
        for event in pending {
            app.apply_event(event);
        }
        assert!(app.tables.is_empty());

        app.process_next_event().await;
        app.process_next_event().await;
        assert_eq!(app.tables.len(), 1);
    }

    #[tokio::test]
    async fn test_table_search_narrows_list() {
        let api = FakeApi {
            tables: vec![
                "users".to_string(),
                "orders".to_string(),
                "user_roles".to_string(),
            ],
            ..FakeApi::default()
        };
        let mut app = connected(api).await;

        app.set_table_query("USER");
        assert_eq!(app.table_list.model.items.len(), 2);
        app.set_table_query("");
        assert_eq!(app.table_list.model.items.len(), 3);
    }

    #[tokio::test]
    async fn test_select_table_sets_collection_and_opens_schema() {
        let mut app = connected(FakeApi::default()).await;
        app.select_table("users");
        assert_eq!(app.config.collection, "users");
        app.process_next_event().await;

        assert!(app.schema_popup.is_open);
        assert_eq!(app.schema_popup.collection, "users");
        assert_eq!(app.schema_popup.table.model.items.len(), 1);
    }

    #[tokio::test]
    async fn test_schema_failure_sets_error() {
        let api = FakeApi {
            schema_error: true,
            ..FakeApi::default()
        };
        let mut app = connected(api).await;
        app.select_table("users");
        app.process_next_event().await;
        assert!(!app.schema_popup.is_open);
        assert_eq!(app.status_line.error(), Some("Failed to fetch schema"));
    }

    #[tokio::test]
    async fn test_generate_replaces_query_buffer() {
        let mut app = connected(FakeApi::default()).await;
        app.editor.toggle_field();
        app.editor.focused_input_mut().set_text("all users");
        app.generate_query();
        app.process_next_event().await;
        assert_eq!(app.editor.query(), "SELECT 'all users'");
    }

    #[tokio::test]
    async fn test_export_writes_visible_rows() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi {
            queries: Mutex::new(vec![Ok(rows(json!([
                {"a": 1, "b": 2},
                {"a": 3, "b": 4},
            ])))]),
            ..FakeApi::default()
        };
        let mut app = connected(api).await;
        app.settings.export_dir = dir.path().to_path_buf();
        app.execute_query();
        app.process_next_event().await;
        app.export_results();

        let written =
            std::fs::read_to_string(dir.path().join("query_result.csv"))
                .unwrap();
        assert_eq!(written, "a,b\n1,2\n3,4");
        assert_eq!(app.status_line.error(), None);
    }

    #[tokio::test]
    async fn test_export_of_empty_results_is_refused() {
        let mut app = connected(FakeApi::default()).await;
        app.export_results();
        assert_eq!(app.status_line.error(), Some("Nothing to export"));
    }

    #[tokio::test]
    async fn test_copy_history_entry() {
        let copied = Arc::new(Mutex::new(Vec::new()));
        let mut app = connected(FakeApi::default()).await;
        app.clipboard = Box::new(RecordingClipboard(Arc::clone(&copied)));
        app.editor.set_query("SELECT 42");
        app.execute_query();
        app.process_next_event().await;

        app.history_panel.open(&app.history);
        app.copy_history_entry();
        assert_eq!(copied.lock().unwrap().as_slice(), ["SELECT 42"]);
    }

    #[tokio::test]
    async fn test_sort_and_filter_update_table_header() {
        let api = FakeApi {
            queries: Mutex::new(vec![Ok(rows(json!([
                {"id": "2", "name": "b"},
                {"id": "10", "name": "a"},
            ])))]),
            ..FakeApi::default()
        };
        let mut app = connected(api).await;
        app.execute_query();
        app.process_next_event().await;

        app.sort_selected_column();
        app.set_column_filter("name", "A");
        assert_eq!(
            app.results_table.model.dynamic_column_names,
            Some(vec!["id ▲".to_string(), "name*".to_string()])
        );
        assert_eq!(
            app.results_table.model.items,
            vec![RawTableRow {
                values: vec!["10".to_string(), "a".to_string()],
            }]
        );
    }
}
