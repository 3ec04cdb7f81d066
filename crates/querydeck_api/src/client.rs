use reqwest::{RequestBuilder, Response, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    config::ConnectionConfig,
    error::{ApiError, FetchTarget},
    result::ResultRow,
    wire::{DbInfo, ErrorBody, FieldDescriptor, GeneratedQuery, QueryPayload},
};

/// Default location of the query API
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// The operations the UI needs from the query API
#[async_trait::async_trait]
pub trait DatabaseApi: Send + Sync {
    /// Open (or re-open) a connection with the given parameters
    async fn connect(&self, config: &ConnectionConfig) -> Result<(), ApiError>;

    /// Names of the tables or collections reachable with `config`
    async fn tables(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Vec<String>, ApiError>;

    async fn db_info(&self, config: &ConnectionConfig)
    -> Result<DbInfo, ApiError>;

    /// Fields of `config.collection`
    async fn schema(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Vec<FieldDescriptor>, ApiError>;

    async fn query(
        &self,
        config: &ConnectionConfig,
        query: &str,
    ) -> Result<Vec<ResultRow>, ApiError>;

    /// Turn a natural language prompt into query text
    async fn generate_query(&self, prompt: &str) -> Result<String, ApiError>;
}

/// `reqwest` client for the query API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        tracing::debug!(base_url, "Creating API client");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    /// Send a request and split off failures.
    ///
    /// `Err(Some(_))` carries the server's `error` message, `Err(None)` means
    /// no usable message came back.
    async fn send(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response, Option<String>> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(path, "Request failed: {e}");
            None
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        tracing::warn!(path, %status, error = ?body.error, "API returned an error");
        Err(body.message())
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: Response,
    ) -> Result<T, Option<String>> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!(path, "Failed to parse response: {e}");
            None
        })
    }

    async fn post_config<T: DeserializeOwned>(
        &self,
        path: &str,
        config: &ConnectionConfig,
    ) -> Result<T, Option<String>> {
        let request = self.client.post(self.endpoint(path)).json(config);
        let response = self.send(path, request).await?;
        Self::decode(path, response).await
    }
}

fn fetch_error(target: FetchTarget, message: Option<String>) -> ApiError {
    ApiError::Fetch {
        target,
        message: message.unwrap_or_else(|| target.fallback().to_string()),
    }
}

#[async_trait::async_trait]
impl DatabaseApi for ApiClient {
    #[instrument(skip_all, fields(kind = %config.kind, url = %config.url))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<(), ApiError> {
        let request = self.client.post(self.endpoint("connect")).json(config);
        self.send("connect", request).await.map_err(|msg| {
            ApiError::Connection(msg.unwrap_or_else(|| {
                ApiError::CONNECTION_FALLBACK.to_string()
            }))
        })?;
        tracing::info!("Connected");
        Ok(())
    }

    #[instrument(skip_all, fields(kind = %config.kind))]
    async fn tables(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Vec<String>, ApiError> {
        let tables: Vec<String> = self
            .post_config("tables", config)
            .await
            .map_err(|_| fetch_error(FetchTarget::Tables, None))?;
        tracing::debug!(count = tables.len(), "Fetched tables");
        Ok(tables)
    }

    #[instrument(skip_all, fields(kind = %config.kind))]
    async fn db_info(
        &self,
        config: &ConnectionConfig,
    ) -> Result<DbInfo, ApiError> {
        self.post_config("db-info", config)
            .await
            .map_err(|msg| fetch_error(FetchTarget::DbInfo, msg))
    }

    #[instrument(skip_all, fields(kind = %config.kind, collection = %config.collection))]
    async fn schema(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Vec<FieldDescriptor>, ApiError> {
        self.post_config("schema", config)
            .await
            .map_err(|msg| fetch_error(FetchTarget::Schema, msg))
    }

    #[instrument(skip_all, fields(kind = %config.kind))]
    async fn query(
        &self,
        config: &ConnectionConfig,
        query: &str,
    ) -> Result<Vec<ResultRow>, ApiError> {
        let payload = QueryPayload::new(config, query);
        let request = self.client.post(self.endpoint("query")).json(&payload);
        let to_error = |msg: Option<String>| {
            ApiError::QueryExecution(
                msg.unwrap_or_else(|| ApiError::QUERY_FALLBACK.to_string()),
            )
        };

        let response = self.send("query", request).await.map_err(to_error)?;
        let rows: Vec<ResultRow> =
            Self::decode("query", response).await.map_err(to_error)?;
        tracing::info!(rows = rows.len(), "Query executed");
        Ok(rows)
    }

    #[instrument(skip_all)]
    async fn generate_query(&self, prompt: &str) -> Result<String, ApiError> {
        let request = self
            .client
            .post(self.endpoint("ai-sql"))
            .header(CONTENT_TYPE, "text/plain")
            .body(prompt.to_string());
        let to_error = |_: Option<String>| {
            ApiError::AiGeneration(ApiError::AI_FALLBACK.to_string())
        };

        let response = self.send("ai-sql", request).await.map_err(to_error)?;
        let generated: GeneratedQuery =
            Self::decode("ai-sql", response).await.map_err(to_error)?;
        Ok(generated.query)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::config::DbKind;

    fn sql_config() -> ConnectionConfig {
        ConnectionConfig {
            kind: DbKind::Sql,
            url: "postgres://db".to_string(),
            username: "root".to_string(),
            password: "pw".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_connect_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/connect")
            .match_body(Matcher::PartialJson(json!({
                "type": "sql",
                "url": "postgres://db",
            })))
            .with_status(200)
            .with_body("Connected")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url());
        assert_eq!(client.connect(&sql_config()).await, Ok(()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connect_failure_uses_server_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/connect")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"bad credentials"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url());
        assert_eq!(
            client.connect(&sql_config()).await,
            Err(ApiError::Connection("bad credentials".to_string()))
        );
    }

    #[tokio::test]
    async fn test_connect_failure_without_body_falls_back() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/connect")
            .with_status(502)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url());
        let err = client.connect(&sql_config()).await.unwrap_err();
        assert_eq!(err.to_string(), "Connection Failed");
    }

    #[tokio::test]
    async fn test_tables_error_is_always_generic() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/tables")
            .with_status(500)
            .with_body(r#"{"error":"permission denied"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url());
        let err = client.tables(&sql_config()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch tables");
    }

    #[tokio::test]
    async fn test_tables_and_schema() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/tables")
            .with_status(200)
            .with_body(r#"["users","orders"]"#)
            .create_async()
            .await;
        server
            .mock("POST", "/api/schema")
            .match_body(Matcher::PartialJson(json!({"collection": "users"})))
            .with_status(200)
            .with_body(r#"[{"name":"id","type":"integer"},{"name":"email","type":"text"}]"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url());
        let config = sql_config();
        assert_eq!(
            client.tables(&config).await.unwrap(),
            vec!["users".to_string(), "orders".to_string()]
        );

        let fields = client
            .schema(&config.with_collection("users"))
            .await
            .unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name, "email");
        assert_eq!(fields[1].data_type, "text");
    }

    #[tokio::test]
    async fn test_query_document_payload_and_rows() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/query")
            .match_body(Matcher::Json(json!({
                "type": "mongo",
                "url": "mongodb://x",
                "database": "shop",
                "query": "orders:::{}",
            })))
            .with_status(200)
            .with_body(r#"[{"id":"2","name":"b"},{"id":"10","name":"a"}]"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url());
        let config = ConnectionConfig {
            kind: DbKind::Document,
            url: "mongodb://x".to_string(),
            database: "shop".to_string(),
            collection: "orders".to_string(),
            ..Default::default()
        };
        let rows = client.query(&config, " {} ").await.unwrap();
        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), ["id", "name"]);
    }

    #[tokio::test]
    async fn test_query_failure_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/query")
            .with_status(400)
            .with_body(r#"{"error":"syntax error"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url());
        assert_eq!(
            client.query(&sql_config(), "SELEC").await,
            Err(ApiError::QueryExecution("syntax error".to_string()))
        );
    }

    #[tokio::test]
    async fn test_generate_query_sends_plain_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ai-sql")
            .match_header("content-type", "text/plain")
            .match_body("all users older than 30")
            .with_status(200)
            .with_body(r#"{"query":"SELECT * FROM users WHERE age > 30"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&format!("{}/", server.url()));
        let query = client
            .generate_query("all users older than 30")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(query, "SELECT * FROM users WHERE age > 30");
    }

    #[tokio::test]
    async fn test_unreachable_server_uses_fallback() {
        let client = ApiClient::new("http://127.0.0.1:1");
        assert_eq!(
            client.generate_query("anything").await,
            Err(ApiError::AiGeneration("Failed to generate query".to_string()))
        );
    }
}
