use crate::domain::{Catalog, FetchResult, SourceId};
use crate::logging::{LogEvent, LogLevel, SharedEventLogger};
use crate::source::{CatalogSource, FetchError, SourceMetadata, DEFAULT_TIMEOUT_MS};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::{Duration, Instant};

const MAX_ERROR_BODY: usize = 512;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpCatalogSource {
    id: SourceId,
    name: String,
    client: Client,
    url: String,
    timeout_ms: u64,
    logger: SharedEventLogger,
}

impl HttpCatalogSource {
    /// Creates a source with its own client bounded by `timeout_ms`
    /// (connect + full request). Fails rather than fall back to a client
    /// without timeouts.
    pub fn new(
        id: SourceId,
        url: String,
        timeout_ms: Option<u64>,
        logger: SharedEventLogger,
    ) -> Result<Self, FetchError> {
        let timeout_ms = timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT.min(Duration::from_millis(timeout_ms)))
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| FetchError::Transport(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_client(id, url, client, timeout_ms, logger))
    }

    pub fn with_client(
        id: SourceId,
        url: String,
        client: Client,
        timeout_ms: u64,
        logger: SharedEventLogger,
    ) -> Self {
        Self {
            id,
            name: "HttpCatalogSource".to_string(),
            client,
            url,
            timeout_ms,
            logger,
        }
    }

    fn map_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout_ms)
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.url.clone(),
        }
    }

    async fn fetch(&self) -> Result<FetchResult, FetchError> {
        self.logger.log(
            LogEvent::new(LogLevel::Debug, "http.request")
                .with_field("url", self.url.clone())
                .with_field("timeout_ms", self.timeout_ms.to_string()),
        );

        let start = Instant::now();
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_ms)
            } else {
                FetchError::InvalidResponse(format!("body is not JSON: {e}"))
            }
        })?;
        let catalog = Catalog::from_json(body).ok_or_else(|| {
            FetchError::InvalidResponse("expected a JSON array of products".to_string())
        })?;

        Ok(FetchResult {
            source_id: self.id.clone(),
            location: self.url.clone(),
            status: status.as_u16(),
            catalog,
            latency: start.elapsed(),
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{truncate_body, HttpCatalogSource};
    use crate::logging::NoopEventLogger;
    use crate::source::DEFAULT_TIMEOUT_MS;
    use std::sync::Arc;

    fn source(timeout_ms: Option<u64>) -> HttpCatalogSource {
        HttpCatalogSource::new(
            "http".to_string(),
            "http://localhost/products".to_string(),
            timeout_ms,
            Arc::new(NoopEventLogger),
        )
        .unwrap()
    }

    #[test]
    fn client_is_always_bounded() {
        assert_eq!(source(None).timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(source(Some(250)).timeout_ms, 250);
    }

    #[test]
    fn truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let out = truncate_body(body);
        assert!(out.len() <= 512);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("oops".to_string()), "oops");
    }
}
