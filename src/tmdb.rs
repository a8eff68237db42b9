use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::movie::MovieSummary;

pub const STATUS_INVALID_KEY: f64 = 7.0;
pub const STATUS_NOT_FOUND: f64 = 34.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Popular,
    // Sent as typed, no trimming.
    Search(String),
}

impl Endpoint {
    pub fn for_input(text: &str) -> Self {
        if text.is_empty() {
            Endpoint::Popular
        } else {
            Endpoint::Search(text.to_string())
        }
    }

    pub fn url(&self, api_base: &str, api_key: &str) -> String {
        match self {
            Endpoint::Popular => format!(
                "{api_base}/3/discover/movie?sort_by=popularity.desc&api_key={api_key}&page=1"
            ),
            Endpoint::Search(query) => format!(
                "{api_base}/3/search/movie?&api_key={api_key}&query={}",
                urlencoding::encode(query)
            ),
        }
    }
}

// Any well-formed JSON body; shape is only judged in `into_movies`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ApiPage {
    body: Value,
}

impl From<Value> for ApiPage {
    fn from(body: Value) -> Self {
        Self { body }
    }
}

impl ApiPage {
    // `7` and `7.0` compare equal; `"7"` is not a status code.
    pub fn status_code(&self) -> Option<f64> {
        self.body.get("status_code").and_then(Value::as_f64)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.body.get("status_message").and_then(Value::as_str)
    }

    pub fn into_movies(self) -> Result<Vec<MovieSummary>, FetchError> {
        match self.status_code() {
            Some(code) if code == STATUS_INVALID_KEY => return Err(FetchError::Auth),
            Some(code) if code == STATUS_NOT_FOUND => return Err(FetchError::NotFound),
            _ => {}
        }
        match self.body.get("results") {
            Some(Value::Array(items)) => Ok(items.iter().map(MovieSummary::from_value).collect()),
            Some(other) => {
                debug!("Ignoring non-array results field: {}", other);
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn fetch_page(&self, endpoint: &Endpoint) -> Result<ApiPage>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = format!("cinegrid/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        // TMDB reports key and lookup problems as 401/404 with a JSON envelope.
        if !status.is_success() {
            warn!("TMDB answered HTTP {}", status);
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn fetch_page(&self, endpoint: &Endpoint) -> Result<ApiPage> {
        let url = endpoint.url(&self.api_base, &self.api_key);
        debug!(endpoint = ?endpoint, "Fetching TMDB listing");
        let page: ApiPage = self.get_json::<Value>(&url).await?.into();
        if let Some(message) = page.status_message() {
            debug!(status_code = ?page.status_code(), "TMDB status message: {}", message);
        }
        Ok(page)
    }
}
