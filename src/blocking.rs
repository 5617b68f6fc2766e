//! Synchronous facade over the async selector.
//!
//! Agent pipelines that are written as plain blocking code use this type
//! instead of touching tokio themselves. The fetcher owns a dedicated
//! runtime for its whole lifetime; providers never have to guess whether
//! an event loop exists.
//!
//! The fetcher is not built for concurrent callers. A single pipeline
//! thread driving it sequentially is the supported shape; wrap it yourself
//! if you need more.

use chrono::NaiveDate;
use log::warn;
use tokio::runtime::Runtime;

use crate::config::DataSourceConfig;
use crate::errors::FetchError;
use crate::models::{DataKind, FetchOptions, FetchRequest, RangeData};
use crate::selector::SourceSelector;

/// Blocking entry point for fetching market data.
pub struct BlockingFetcher {
    runtime: Runtime,
    selector: SourceSelector,
}

impl BlockingFetcher {
    /// Wrap a selector in a fresh single-purpose runtime.
    pub fn new(selector: SourceSelector) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime, selector })
    }

    /// Build the fetcher with the standard provider pair.
    pub fn from_config(config: &DataSourceConfig) -> std::io::Result<Self> {
        Self::new(SourceSelector::from_config(config))
    }

    /// Fetch data for a request, blocking until done.
    pub fn fetch(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        self.runtime.block_on(self.selector.fetch(request))
    }

    /// Fetch by kind name, as agent tool layers pass it.
    ///
    /// An unrecognized kind is not an error at this boundary: it is logged
    /// and answered with an empty result, so a misconfigured tool degrades
    /// to "no data" instead of killing the pipeline.
    pub fn fetch_kind_str(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        kind: &str,
        options: FetchOptions,
    ) -> Result<RangeData, FetchError> {
        let Some(kind) = DataKind::parse(kind) else {
            warn!("unknown data kind '{}' requested for {}", kind, ticker);
            return Ok(RangeData::new());
        };

        let request = FetchRequest::new(ticker, start, end, kind)?.with_options(options);
        self.fetch(&request)
    }

    /// Disconnect providers. The fetcher remains usable afterward; the
    /// broker session re-authenticates on the next fetch.
    pub fn shutdown(&self) {
        self.runtime.block_on(self.selector.shutdown());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tempdir_fetcher() -> BlockingFetcher {
        let config = DataSourceConfig {
            data_dir: std::env::temp_dir().join("blocking-fetcher-test"),
            ..DataSourceConfig::default()
        };
        BlockingFetcher::from_config(&config).unwrap()
    }

    #[test]
    fn test_unknown_kind_returns_empty() {
        let fetcher = tempdir_fetcher();
        let data = fetcher
            .fetch_kind_str(
                "AAPL",
                "2024-01-01".parse().unwrap(),
                "2024-01-05".parse().unwrap(),
                "astrology",
                FetchOptions::default(),
            )
            .unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_invalid_range_is_an_error() {
        let fetcher = tempdir_fetcher();
        let result = fetcher.fetch_kind_str(
            "AAPL",
            "2024-01-05".parse().unwrap(),
            "2024-01-01".parse().unwrap(),
            "news",
            FetchOptions::default(),
        );
        assert!(matches!(result, Err(FetchError::InvalidRange { .. })));
    }

    #[test]
    fn test_shutdown_then_fetch_still_works() {
        let fetcher = tempdir_fetcher();
        fetcher.shutdown();
        // Finnhub primary with no cache dir: empty result, no error.
        let data = fetcher
            .fetch_kind_str(
                "MSFT",
                "2024-01-01".parse().unwrap(),
                "2024-01-05".parse().unwrap(),
                "real_time",
                FetchOptions::default(),
            )
            .unwrap();
        assert!(data.is_empty());
    }
}
