use std::sync::Arc;

use querydeck_api::{
    ApiError, ConnectionConfig, DatabaseApi, DbInfo, FieldDescriptor,
    ResultRow,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::requests::Ticket;

/// Outcome of one API call, delivered back to the UI loop
#[derive(Debug)]
pub enum ApiEvent {
    Connected {
        ticket: Ticket,
        config: ConnectionConfig,
        result: Result<(), ApiError>,
    },
    Tables {
        ticket: Ticket,
        result: Result<Vec<String>, ApiError>,
    },
    DbInfo {
        ticket: Ticket,
        result: Result<DbInfo, ApiError>,
    },
    Schema {
        ticket: Ticket,
        collection: String,
        result: Result<Vec<FieldDescriptor>, ApiError>,
    },
    Query {
        ticket: Ticket,
        query: String,
        config: ConnectionConfig,
        result: Result<Vec<ResultRow>, ApiError>,
    },
    Generated {
        ticket: Ticket,
        result: Result<String, ApiError>,
    },
}

impl ApiEvent {
    #[must_use]
    pub const fn ticket(&self) -> &Ticket {
        match self {
            Self::Connected { ticket, .. }
            | Self::Tables { ticket, .. }
            | Self::DbInfo { ticket, .. }
            | Self::Schema { ticket, .. }
            | Self::Query { ticket, .. }
            | Self::Generated { ticket, .. } => ticket,
        }
    }
}

/// Runs API calls on tokio tasks and posts their results to the UI loop.
///
/// Every call works on its own copy of the config, so later form edits do not
/// change a request already in flight.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn DatabaseApi>,
    tx: UnboundedSender<ApiEvent>,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn DatabaseApi>,
        tx: UnboundedSender<ApiEvent>,
    ) -> Self {
        Self { api, tx }
    }

    fn spawn<F>(&self, ticket: Ticket, call: F)
    where
        F: Future<Output = ApiEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        tracing::debug!(
            action = ?ticket.action,
            generation = ticket.generation,
            "Dispatching request"
        );
        tokio::spawn(async move {
            let event = call.await;
            if tx.send(event).is_err() {
                tracing::debug!(
                    action = ?ticket.action,
                    "UI loop gone, dropping response"
                );
            }
        });
    }

    pub fn connect(&self, ticket: Ticket, config: ConnectionConfig) {
        let api = Arc::clone(&self.api);
        self.spawn(ticket, async move {
            let result = api.connect(&config).await;
            ApiEvent::Connected {
                ticket,
                config,
                result,
            }
        });
    }

    pub fn tables(&self, ticket: Ticket, config: ConnectionConfig) {
        let api = Arc::clone(&self.api);
        self.spawn(ticket, async move {
            let result = api.tables(&config).await;
            ApiEvent::Tables { ticket, result }
        });
    }

    pub fn db_info(&self, ticket: Ticket, config: ConnectionConfig) {
        let api = Arc::clone(&self.api);
        self.spawn(ticket, async move {
            let result = api.db_info(&config).await;
            ApiEvent::DbInfo { ticket, result }
        });
    }

    pub fn schema(&self, ticket: Ticket, config: ConnectionConfig) {
        let api = Arc::clone(&self.api);
        self.spawn(ticket, async move {
            let result = api.schema(&config).await;
            ApiEvent::Schema {
                ticket,
                collection: config.collection,
                result,
            }
        });
    }

    pub fn query(
        &self,
        ticket: Ticket,
        config: ConnectionConfig,
        query: String,
    ) {
        let api = Arc::clone(&self.api);
        self.spawn(ticket, async move {
            let result = api.query(&config, &query).await;
            ApiEvent::Query {
                ticket,
                query,
                config,
                result,
            }
        });
    }

    pub fn generate(&self, ticket: Ticket, prompt: String) {
        let api = Arc::clone(&self.api);
        self.spawn(ticket, async move {
            let result = api.generate_query(&prompt).await;
            ApiEvent::Generated { ticket, result }
        });
    }
}
