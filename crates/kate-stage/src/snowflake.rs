//! Snowflake implementation of the stage store.
//!
//! Uses Snowflake's session REST interface: one login request per store
//! instance, then SQL statements against the stage's directory table and
//! `GET_PRESIGNED_URL` for downloads. Downloads themselves go straight to
//! the presigned cloud-storage URL.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use kate_core::{Error, Result, StageCredentials};

use crate::store::StageStore;

/// Timeout for Snowflake requests and presigned downloads (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Snowflake-backed stage store.
pub struct SnowflakeStage {
    client: Client,
    credentials: StageCredentials,
    base_url: String,
    token: Mutex<Option<String>>,
}

impl SnowflakeStage {
    /// Create a store for the given account. Credentials must be complete.
    pub fn new(credentials: StageCredentials) -> Result<Self> {
        if !credentials.is_complete() {
            return Err(Error::InvalidInput(
                "stage credentials are incomplete".to_string(),
            ));
        }
        let base_url = format!("https://{}.snowflakecomputing.com", credentials.account);
        Ok(Self::with_base_url(credentials, base_url))
    }

    /// Create a store against an explicit endpoint.
    pub fn with_base_url(credentials: StageCredentials, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        }
    }

    /// Fully qualified stage reference for SQL statements.
    fn stage_ref(&self) -> String {
        format!(
            "@{}.{}.{}",
            self.credentials.database, self.credentials.schema, self.credentials.stage
        )
    }

    async fn login(&self) -> Result<String> {
        info!(
            account = %self.credentials.account,
            database = %self.credentials.database,
            stage = %self.credentials.stage,
            "opening Snowflake session"
        );
        let resp = self
            .client
            .post(format!("{}/session/v1/login-request", self.base_url))
            .query(&[
                ("warehouse", self.credentials.warehouse.as_str()),
                ("roleName", self.credentials.role.as_str()),
                ("databaseName", self.credentials.database.as_str()),
                ("schemaName", self.credentials.schema.as_str()),
            ])
            .json(&serde_json::json!({
                "data": {
                    "LOGIN_NAME": self.credentials.user,
                    "PASSWORD": self.credentials.password,
                    "ACCOUNT_NAME": self.credentials.account,
                }
            }))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("login request failed: {e}")))?;
        let login: ApiResponse<LoginData> = resp
            .json()
            .await
            .map_err(|e| Error::Storage(format!("malformed login response: {e}")))?;
        Ok(login.into_result("login")?.token)
    }

    /// Session token, logging in on first use.
    async fn token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let token = self.login().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Run one SQL statement and return its row set.
    async fn execute(&self, sql: String) -> Result<Vec<Vec<serde_json::Value>>> {
        let token = self.token().await?;
        let resp = self
            .client
            .post(format!("{}/queries/v1/query-request", self.base_url))
            .query(&[("requestId", Uuid::new_v4().to_string())])
            .header("Authorization", format!("Snowflake Token=\"{token}\""))
            .json(&serde_json::json!({ "sqlText": sql }))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("query request failed: {e}")))?;
        let query: ApiResponse<QueryData> = resp
            .json()
            .await
            .map_err(|e| Error::Storage(format!("malformed query response: {e}")))?;
        Ok(query.into_result("query")?.rowset)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, op: &str) -> Result<T> {
        if !self.success {
            let message = self.message.unwrap_or_else(|| "unknown error".to_string());
            return Err(Error::Storage(format!("{op} rejected: {message}")));
        }
        self.data
            .ok_or_else(|| Error::Storage(format!("{op} returned no data")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    token: String,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    rowset: Vec<Vec<serde_json::Value>>,
}

#[async_trait]
impl StageStore for SnowflakeStage {
    async fn list_file_names(&self, limit: usize) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT RELATIVE_PATH FROM DIRECTORY({}) ORDER BY RELATIVE_PATH LIMIT {limit}",
            self.stage_ref()
        );
        let rows = self.execute(sql).await?;
        let names: Vec<String> = rows
            .into_iter()
            .filter_map(|row| row.first().and_then(|v| v.as_str().map(str::to_string)))
            .collect();
        debug!(file_count = names.len(), "stage directory listed");
        Ok(names)
    }

    async fn fetch_document(&self, path: &str) -> Result<Bytes> {
        let escaped = path.replace('\'', "''");
        let sql = format!(
            "SELECT GET_PRESIGNED_URL({}, '{escaped}')",
            self.stage_ref()
        );
        let rows = self.execute(sql).await?;
        let url = rows
            .first()
            .and_then(|row| row.first())
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Storage(format!("no presigned URL for {path}")))?
            .to_string();

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("download of {path} failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(Error::Storage(format!(
                "download of {path} failed: HTTP {}",
                resp.status()
            )));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Storage(format!("download of {path} failed: {e}")))?;
        debug!(document = %path, byte_count = bytes.len(), "stage file downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> StageCredentials {
        StageCredentials {
            account: "acct".into(),
            user: "user".into(),
            password: "pw".into(),
            role: "role".into(),
            warehouse: "wh".into(),
            database: "db".into(),
            schema: "public".into(),
            stage: "docs".into(),
        }
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/session/v1/login-request"))
            .and(query_param("warehouse", "wh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"token": "session-token"}
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn incomplete_credentials_are_rejected() {
        let mut creds = credentials();
        creds.password.clear();
        match SnowflakeStage::new(creds) {
            Err(Error::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn listing_logs_in_once_and_reads_the_directory_table() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/queries/v1/query-request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"rowset": [["a.pdf"], ["b.txt"]]}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let stage = SnowflakeStage::with_base_url(credentials(), server.uri());
        let names = stage.list_file_names(100).await.unwrap();
        assert_eq!(names, vec!["a.pdf", "b.txt"]);

        // Second call reuses the session token; the login mock expects 1.
        stage.list_file_names(100).await.unwrap();
    }

    #[tokio::test]
    async fn fetch_follows_the_presigned_url() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/queries/v1/query-request"))
            .and(body_partial_json(serde_json::json!({
                "sqlText": "SELECT GET_PRESIGNED_URL(@db.public.docs, 'dir/a.pdf')"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"rowset": [[format!("{}/presigned/a.pdf", server.uri())]]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/presigned/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
            .mount(&server)
            .await;

        let stage = SnowflakeStage::with_base_url(credentials(), server.uri());
        let bytes = stage.fetch_document("dir/a.pdf").await.unwrap();
        assert_eq!(bytes.as_ref(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn rejected_login_is_a_storage_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session/v1/login-request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "message": "Incorrect username or password"
            })))
            .mount(&server)
            .await;

        let stage = SnowflakeStage::with_base_url(credentials(), server.uri());
        match stage.list_file_names(10).await {
            Err(Error::Storage(msg)) => assert!(msg.contains("Incorrect username")),
            other => panic!("expected Storage error, got {other:?}"),
        }
    }
}
