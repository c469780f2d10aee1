use crate::domain::{FetchResult, SourceId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub id: SourceId,
    pub name: String,
    pub location: String,
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("Expected status code 200, but got {status}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Status code observed on the wire, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
    Http {
        url: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    File {
        path: String,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Http {
            url: DEFAULT_CATALOG_URL.to_string(),
            timeout_ms: None,
        }
    }
}

impl SourceConfig {
    pub fn location(&self) -> &str {
        match self {
            Self::Http { url, .. } => url,
            Self::File { path } => path,
        }
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn metadata(&self) -> SourceMetadata;

    async fn fetch(&self) -> Result<FetchResult, FetchError>;
}
