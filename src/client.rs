use crate::calendar::date_key;
use crate::config::api_base_from_env;
use crate::errors::ClientError;
use crate::models::{SlotsResponse, ToggleResponse};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

pub fn progress_path(date: NaiveDate) -> String {
    format!("/api/progress/{}", date_key(date))
}

pub fn toggle_path(date: NaiveDate, index: usize) -> String {
    format!("/api/progress/{}/{index}", date_key(date))
}

pub const SLOTS_PATH: &str = "/api/slots";

/// The progress backend as seen by the panel.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    async fn fetch_progress(&self, date: NaiveDate) -> Result<Vec<bool>, ClientError>;

    async fn toggle_slot(&self, date: NaiveDate, index: usize)
    -> Result<ToggleResponse, ClientError>;

    async fn fetch_slots(&self) -> Result<Vec<String>, ClientError>;
}

/// HTTP client for the progress API. Every call goes to the same base URL.
#[derive(Clone)]
pub struct HttpProgressClient {
    http: Client,
    base_url: String,
}

impl HttpProgressClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Uses `PROGRESS_API_BASE`, falling back to the local default server.
    pub fn from_env() -> Self {
        Self::new(api_base_from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ProgressApi for HttpProgressClient {
    async fn fetch_progress(&self, date: NaiveDate) -> Result<Vec<bool>, ClientError> {
        let url = self.url(&progress_path(date));
        debug!("GET {url}");
        self.send_json(self.http.get(url)).await
    }

    async fn toggle_slot(
        &self,
        date: NaiveDate,
        index: usize,
    ) -> Result<ToggleResponse, ClientError> {
        let url = self.url(&toggle_path(date, index));
        debug!("POST {url}");
        self.send_json(self.http.post(url)).await
    }

    async fn fetch_slots(&self) -> Result<Vec<String>, ClientError> {
        let url = self.url(SLOTS_PATH);
        let response: SlotsResponse = self.send_json(self.http.get(url)).await?;
        Ok(response.slots)
    }
}
