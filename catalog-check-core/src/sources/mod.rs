mod file;
mod http;
mod mock;

pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;
pub use mock::StaticCatalogSource;

use crate::logging::SharedEventLogger;
use crate::source::{CatalogSource, FetchError, SourceConfig};

pub fn create_source(
    config: SourceConfig,
    logger: SharedEventLogger,
) -> Result<Box<dyn CatalogSource>, FetchError> {
    let source: Box<dyn CatalogSource> = match config {
        SourceConfig::Http { url, timeout_ms } => Box::new(HttpCatalogSource::new(
            "http".to_string(),
            url,
            timeout_ms,
            logger,
        )?),
        SourceConfig::File { path } => Box::new(FileCatalogSource::new("file".to_string(), path)),
    };
    Ok(source)
}
