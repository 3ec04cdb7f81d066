use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Which branch of the API a connection targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DbKind {
    #[default]
    #[serde(rename = "sql")]
    Sql,
    #[serde(rename = "mongo")]
    Document,
}

impl DbKind {
    /// Label used in history entries and the connect form
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sql => "SQL DB",
            Self::Document => "MongoDB",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Sql => Self::Document,
            Self::Document => Self::Sql,
        }
    }
}

impl Display for DbKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sql => write!(f, "sql"),
            Self::Document => write!(f, "mongo"),
        }
    }
}

/// Connection parameters sent with every API call.
///
/// Serialized with the field names the API expects, and stored verbatim in
/// the local store after a successful connect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    #[serde(rename = "type")]
    pub kind: DbKind,
    pub url: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub collection: String,
}

impl ConnectionConfig {
    /// Copy of this config targeting another table or collection
    #[must_use]
    pub fn with_collection(&self, collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            ..self.clone()
        }
    }

    /// Check the fields required before a connect is attempted
    ///
    /// # Errors
    ///
    /// Returns a message naming the first missing field.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err(match self.kind {
                DbKind::Sql => "Database URL is required".to_string(),
                DbKind::Document => "MongoDB URI is required".to_string(),
            });
        }
        if self.kind == DbKind::Document && self.database.trim().is_empty() {
            return Err("Database Name is required".to_string());
        }
        Ok(())
    }
}

impl Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let empty = |s: &str| if s.is_empty() { "-" } else { s }.to_string();
        match self.kind {
            DbKind::Sql => write!(
                f,
                " Kind: {}\n URL: {}\n User: {}\n Table: {}",
                self.kind.label(),
                empty(&self.url),
                empty(&self.username),
                empty(&self.collection),
            ),
            DbKind::Document => write!(
                f,
                " Kind: {}\n URI: {}\n Database: {}\n Collection: {}",
                self.kind.label(),
                empty(&self.url),
                empty(&self.database),
                empty(&self.collection),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_wire_names() {
        let config = ConnectionConfig {
            kind: DbKind::Document,
            url: "mongodb://localhost".to_string(),
            database: "shop".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["type"], "mongo");
        assert_eq!(value["url"], "mongodb://localhost");
        assert_eq!(value["collection"], "");
    }

    #[test]
    fn test_deserializes_partial_blob() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"type":"sql","url":"jdbc:x"}"#).unwrap();
        assert_eq!(config.kind, DbKind::Sql);
        assert_eq!(config.url, "jdbc:x");
        assert!(config.password.is_empty());
    }

    #[test]
    fn test_validate() {
        let mut config = ConnectionConfig::default();
        assert!(config.validate().is_err());
        config.url = "postgres://db".to_string();
        assert!(config.validate().is_ok());
        config.kind = DbKind::Document;
        assert_eq!(
            config.validate(),
            Err("Database Name is required".to_string())
        );
    }

    #[test]
    fn test_with_collection_keeps_credentials() {
        let config = ConnectionConfig {
            username: "admin".to_string(),
            ..Default::default()
        };
        let other = config.with_collection("users");
        assert_eq!(other.collection, "users");
        assert_eq!(other.username, "admin");
    }
}
