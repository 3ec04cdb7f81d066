use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    TableData,
    config::{ConnectionConfig, DbKind},
    result::coerce,
};

/// Separator between collection name and filter in document queries
pub const DOCUMENT_QUERY_SEPARATOR: &str = ":::";

/// Body of `/api/query`, shaped differently per connection kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryPayload {
    Document {
        #[serde(rename = "type")]
        kind: DbKind,
        url: String,
        database: String,
        query: String,
    },
    Sql {
        #[serde(rename = "type")]
        kind: DbKind,
        url: String,
        username: String,
        password: String,
        query: String,
    },
}

impl QueryPayload {
    #[must_use]
    pub fn new(config: &ConnectionConfig, query: &str) -> Self {
        match config.kind {
            DbKind::Document => Self::Document {
                kind: DbKind::Document,
                url: config.url.clone(),
                database: config.database.clone(),
                query: format!(
                    "{}{DOCUMENT_QUERY_SEPARATOR}{}",
                    config.collection,
                    query.trim()
                ),
            },
            DbKind::Sql => Self::Sql {
                kind: DbKind::Sql,
                url: config.url.clone(),
                username: config.username.clone(),
                password: config.password.clone(),
                query: query.to_string(),
            },
        }
    }
}

/// Failure body sent by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The server message, if it sent a non-empty one
    #[must_use]
    pub fn message(self) -> Option<String> {
        self.error.filter(|msg| !msg.is_empty())
    }
}

/// Response of `/api/ai-sql`
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedQuery {
    pub query: String,
}

/// A field of a table or collection as described by `/api/schema`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: String,
}

impl TableData for FieldDescriptor {
    fn title() -> &'static str {
        "Schema"
    }

    fn ref_array(&self) -> Vec<String> {
        vec![self.name.clone(), self.data_type.clone()]
    }

    fn num_columns(&self) -> usize {
        2
    }

    fn cols() -> Vec<&'static str> {
        vec!["Field", "Type"]
    }
}

/// Server-reported facts about the connected database, label to value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DbInfo(pub Map<String, Value>);

impl DbInfo {
    pub const MISSING: &'static str = "N/A";

    /// Label/value pairs in server order, empty values shown as `N/A`
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(label, value)| {
                let text = match value {
                    Value::Null => String::new(),
                    other => coerce(Some(other)),
                };
                let text = if text.is_empty() {
                    Self::MISSING.to_string()
                } else {
                    text
                };
                (label.clone(), text)
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config(kind: DbKind) -> ConnectionConfig {
        ConnectionConfig {
            kind,
            url: "db://host".to_string(),
            username: "root".to_string(),
            password: "secret".to_string(),
            database: "shop".to_string(),
            collection: "orders".to_string(),
        }
    }

    #[test]
    fn test_document_payload_joins_collection_and_filter() {
        let payload =
            QueryPayload::new(&config(DbKind::Document), "  {\"a\": 1}\n");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "type": "mongo",
                "url": "db://host",
                "database": "shop",
                "query": "orders:::{\"a\": 1}",
            })
        );
    }

    #[test]
    fn test_sql_payload_sends_raw_text_and_credentials() {
        let payload =
            QueryPayload::new(&config(DbKind::Sql), " SELECT 1 ");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "type": "sql",
                "url": "db://host",
                "username": "root",
                "password": "secret",
                "query": " SELECT 1 ",
            })
        );
    }

    #[test]
    fn test_error_body_ignores_empty_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":""}"#).unwrap();
        assert_eq!(body.message(), None);
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(body.message(), Some("boom".to_string()));
    }

    #[test]
    fn test_db_info_entries_keep_order_and_fill_missing() {
        let info: DbInfo = serde_json::from_value(json!({
            "version": "16.1",
            "tables": 12,
            "owner": null,
            "host": "",
        }))
        .unwrap();
        assert_eq!(
            info.entries(),
            vec![
                ("version".to_string(), "16.1".to_string()),
                ("tables".to_string(), "12".to_string()),
                ("owner".to_string(), "N/A".to_string()),
                ("host".to_string(), "N/A".to_string()),
            ]
        );
    }
}
