//! Supabase REST and Storage client.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::store::{DataStore, Query, StoreError, Table};

const UNIQUE_VIOLATION: &str = "23505";
const NO_ROWS: &str = "PGRST116";

/// Where the backend lives and how to authenticate.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `"https://xyz.supabase.co"`.
    pub url: String,

    /// Public anon key sent with every request.
    pub anon_key: String,

    /// Storage bucket for photos.
    pub storage_bucket: String,
}

/// [`DataStore`] over the Supabase PostgREST gateway and Storage API.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    config: SupabaseConfig,
    http: Client,
}

impl SupabaseStore {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn base(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base(), table.name())
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base(),
            self.config.storage_bucket,
            path.trim_start_matches('/')
        )
    }

    /// Public URL of an uploaded object.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base(),
            self.config.storage_bucket,
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    async fn rows(response: Response) -> Result<Vec<Value>, StoreError> {
        let response = Self::check(response).await?;

        Ok(response.json().await?)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        Err(classify(status, &text))
    }
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    #[serde(default)]
    code: Option<String>,
}

/// Maps a failed response onto the store's error kinds.
fn classify(status: StatusCode, body: &str) -> StoreError {
    let code = serde_json::from_str::<GatewayError>(body)
        .ok()
        .and_then(|error| error.code);

    match (status, code.as_deref()) {
        (StatusCode::CONFLICT, _) | (_, Some(UNIQUE_VIOLATION)) => StoreError::UniqueViolation,
        (_, Some(NO_ROWS)) => StoreError::NotFound,
        _ => StoreError::UnexpectedResponse(format!(
            "request failed with status {status}: {body}"
        )),
    }
}

#[async_trait]
impl DataStore for SupabaseStore {
    async fn select(&self, table: Table, query: Query) -> Result<Vec<Value>, StoreError> {
        debug!(table = table.name(), "select");

        let response = self
            .request(Method::GET, &self.table_url(table))
            .query(&query.to_params())
            .send()
            .await?;

        Self::rows(response).await
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        debug!(table = table.name(), rows = rows.len(), "insert");

        let response = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;

        Self::rows(response).await
    }

    async fn update(
        &self,
        table: Table,
        query: Query,
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        debug!(table = table.name(), "update");

        let response = self
            .request(Method::PATCH, &self.table_url(table))
            .header("Prefer", "return=representation")
            .query(&query.to_params())
            .json(&patch)
            .send()
            .await?;

        Self::rows(response).await
    }

    async fn delete(&self, table: Table, query: Query) -> Result<usize, StoreError> {
        debug!(table = table.name(), "delete");

        let response = self
            .request(Method::DELETE, &self.table_url(table))
            .header("Prefer", "return=representation")
            .query(&query.to_params())
            .send()
            .await?;

        Ok(Self::rows(response).await?.len())
    }

    async fn upload(
        &self,
        path: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        debug!(%path, size = bytes.len(), "upload");

        let response = self
            .request(Method::POST, &self.object_url(&path))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;

        Ok(self.public_url(&path))
    }
}
