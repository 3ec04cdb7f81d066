pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod result;
pub mod store;
pub mod wire;

pub use client::{ApiClient, DatabaseApi};
pub use config::{ConnectionConfig, DbKind};
pub use error::ApiError;
pub use history::{HistoryEntry, QueryHistory};
pub use result::{ResultRow, ResultSet};
pub use store::LocalStore;
pub use wire::{DbInfo, FieldDescriptor};

/// Something that can be shown as a row of a fixed-column table
pub trait TableData {
    fn title() -> &'static str;
    fn ref_array(&self) -> Vec<String>;
    fn num_columns(&self) -> usize;
    fn cols() -> Vec<&'static str>;

    fn col(&self, column: usize) -> String {
        self.ref_array().get(column).cloned().unwrap_or_default()
    }
}

/// A table or collection name as returned by the tables call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableName(pub String);

impl TableData for TableName {
    fn title() -> &'static str {
        "Tables / Collections"
    }

    fn ref_array(&self) -> Vec<String> {
        vec![self.0.clone()]
    }

    fn num_columns(&self) -> usize {
        1
    }

    fn cols() -> Vec<&'static str> {
        vec!["Name"]
    }
}
