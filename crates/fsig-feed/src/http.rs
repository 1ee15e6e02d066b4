//! HTTP-backed signal source.

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::filter::RowFilter;
use crate::parser::parse_feed;
use crate::source::{BoxFuture, SignalSource};
use fsig_core::{CandidateSignal, InstrumentFilter};
use fsig_telemetry::Metrics;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Fetches the feed page over HTTP and filters its rows.
pub struct HttpSignalSource {
    client: Client,
    config: FeedConfig,
    rows: RowFilter,
}

impl HttpSignalSource {
    /// Create a new source.
    ///
    /// # Arguments
    /// * `config` - Feed URL, timeout and confidence threshold
    /// * `instruments` - Approved-instrument whitelist
    pub fn new(config: FeedConfig, instruments: Arc<InstrumentFilter>) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FeedError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        let rows = RowFilter::new(instruments, config.min_confidence);

        Ok(Self {
            client,
            config,
            rows,
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Download the feed page body.
    pub async fn fetch_document(&self) -> FeedResult<String> {
        debug!(url = %self.config.url, "Fetching feed page");

        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Request(format!("Failed to read body: {e}")))
    }

    /// Fetch, parse and filter one batch, surfacing failures.
    pub async fn try_fetch(&self) -> FeedResult<Vec<CandidateSignal>> {
        let document = self.fetch_document().await?;
        let rows = parse_feed(&document)?;
        let candidates = self.rows.candidates(&rows);

        info!(
            rows = rows.len(),
            candidates = candidates.len(),
            min_confidence = self.rows.min_confidence(),
            "Feed fetched"
        );

        Ok(candidates)
    }
}

impl SignalSource for HttpSignalSource {
    fn fetch(&self) -> BoxFuture<'_, Vec<CandidateSignal>> {
        Box::pin(async move {
            match self.try_fetch().await {
                Ok(candidates) => {
                    Metrics::feed_fetch("ok");
                    candidates
                }
                Err(e) => {
                    Metrics::feed_fetch(e.outcome());
                    error!(url = %self.config.url, error = %e, "Error fetching signals");
                    Vec::new()
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_feed_yields_empty_batch() {
        // Reserve a free port, then release it so nothing is listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = FeedConfig {
            url: format!("http://{addr}/"),
            timeout_secs: 2,
            ..Default::default()
        };
        let source = HttpSignalSource::new(config, Arc::new(InstrumentFilter::default())).unwrap();

        assert!(matches!(
            source.try_fetch().await,
            Err(FeedError::Request(_))
        ));
        assert!(source.fetch().await.is_empty());
    }
}
