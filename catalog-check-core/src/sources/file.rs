use crate::domain::{Catalog, FetchResult, SourceId};
use crate::source::{CatalogSource, FetchError, SourceMetadata};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;

/// Reads a captured catalog response from disk.
pub struct FileCatalogSource {
    id: SourceId,
    name: String,
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(id: SourceId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: "FileCatalogSource".to_string(),
            path: path.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.path.display().to_string(),
        }
    }

    async fn fetch(&self) -> Result<FetchResult, FetchError> {
        let start = Instant::now();
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::Transport(format!("{}: {e}", self.path.display())))?;
        let body: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| FetchError::InvalidResponse(format!("body is not JSON: {e}")))?;
        let catalog = Catalog::from_json(body).ok_or_else(|| {
            FetchError::InvalidResponse("expected a JSON array of products".to_string())
        })?;

        Ok(FetchResult {
            source_id: self.id.clone(),
            location: self.path.display().to_string(),
            status: 200,
            catalog,
            latency: start.elapsed(),
            fetched_at: Utc::now(),
        })
    }
}
