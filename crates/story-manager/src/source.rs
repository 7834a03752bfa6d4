//! Index sources
//!
//! - [`HttpIndexSource`]: `GET <index_url>` against a running instance
//! - [`FileIndexSource`]: a JSON file on disk (static builds, CLI, tests)

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use story_store::IndexFetchError;

use crate::error::ManagerError;

/// Something that can produce the raw index payload
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Retrieve the current payload
    async fn fetch(&self) -> Result<Value, IndexFetchError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Index served over HTTP
#[derive(Debug, Clone)]
pub struct HttpIndexSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpIndexSource {
    /// Create a source for `url`
    ///
    /// # Errors
    /// Returns [`ManagerError::Client`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ManagerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ManagerError::Client(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    /// Create a source using a preconfigured client
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, err: &reqwest::Error) -> IndexFetchError {
        if err.is_timeout() {
            IndexFetchError::Timeout {
                url: self.url.clone(),
                secs: self.timeout.as_secs(),
            }
        } else {
            IndexFetchError::Transport {
                url: self.url.clone(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    async fn fetch(&self) -> Result<Value, IndexFetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexFetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                IndexFetchError::Decode(e.to_string())
            } else {
                self.transport_error(&e)
            }
        })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Index read from a file
#[derive(Debug, Clone)]
pub struct FileIndexSource {
    path: PathBuf,
}

impl FileIndexSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IndexSource for FileIndexSource {
    async fn fetch(&self) -> Result<Value, IndexFetchError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| IndexFetchError::Io {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|e| IndexFetchError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
