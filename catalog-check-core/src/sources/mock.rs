use crate::domain::{Catalog, FetchResult, SourceId};
use crate::source::{CatalogSource, FetchError, SourceMetadata};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// Serves a fixed in-memory catalog. Used for dry runs and tests.
pub struct StaticCatalogSource {
    id: SourceId,
    name: String,
    catalog: Catalog,
}

impl StaticCatalogSource {
    pub fn new(id: SourceId, catalog: Catalog) -> Self {
        Self {
            id,
            name: "StaticCatalogSource".to_string(),
            catalog,
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            location: "memory".to_string(),
        }
    }

    async fn fetch(&self) -> Result<FetchResult, FetchError> {
        Ok(FetchResult {
            source_id: self.id.clone(),
            location: "memory".to_string(),
            status: 200,
            catalog: self.catalog.clone(),
            latency: Duration::from_millis(0),
            fetched_at: Utc::now(),
        })
    }
}
