//! Source selection with fallback.
//!
//! The selector queries a primary provider and, on failure or empty result,
//! a secondary one. The first non-empty result wins. When both paths come
//! up empty, the primary's error (if any) is what the caller sees; the
//! secondary's failures are only ever logged.
//!
//! There is deliberately no retrying, no backoff, and no caller-side
//! timeout: each provider enforces its own limits internally.

use std::sync::Arc;

use log::{info, warn};

use crate::config::{DataSourceConfig, SourceId};
use crate::errors::FetchError;
use crate::models::{FetchRequest, RangeData};
use crate::provider::{DataProvider, FinnhubCacheProvider, IbkrProvider};

/// Selects between a primary and a secondary data source.
///
/// The selector is a plain caller-owned value: construct it once, share it
/// by reference (or `Arc`), and call [`shutdown`](Self::shutdown) when done.
/// There is no hidden process-wide instance.
pub struct SourceSelector {
    primary: Arc<dyn DataProvider>,
    secondary: Arc<dyn DataProvider>,
    enable_fallback: bool,
}

impl SourceSelector {
    /// Create a selector from explicit providers.
    pub fn new(
        primary: Arc<dyn DataProvider>,
        secondary: Arc<dyn DataProvider>,
        enable_fallback: bool,
    ) -> Self {
        Self {
            primary,
            secondary,
            enable_fallback,
        }
    }

    /// Build the standard provider pair from configuration.
    ///
    /// `data_source` picks which provider plays primary; the other becomes
    /// the fallback.
    pub fn from_config(config: &DataSourceConfig) -> Self {
        let ibkr: Arc<dyn DataProvider> = Arc::new(IbkrProvider::new(
            &config.ibkr_host,
            config.ibkr_port,
            config.ibkr_client_id,
            config.ibkr_timeout(),
        ));
        let finnhub: Arc<dyn DataProvider> = Arc::new(FinnhubCacheProvider::new(&config.data_dir));

        let (primary, secondary) = match config.primary_source() {
            SourceId::Ibkr => (ibkr, finnhub),
            SourceId::Finnhub => (finnhub, ibkr),
        };

        info!(
            "data sources configured: primary={}, secondary={}, fallback={}",
            primary.id(),
            secondary.id(),
            config.enable_fallback
        );

        Self::new(primary, secondary, config.enable_fallback)
    }

    /// Identity of the primary provider.
    pub fn primary_id(&self) -> &'static str {
        self.primary.id()
    }

    /// Identity of the secondary provider.
    pub fn secondary_id(&self) -> &'static str {
        self.secondary.id()
    }

    /// Fetch data, falling back to the secondary source when the primary
    /// fails or returns nothing.
    ///
    /// An empty-but-successful primary result triggers fallback too; that
    /// matches the long-observed behavior of this pipeline, and the policy
    /// is confined to this method should it ever be revisited.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        let mut primary_error: Option<FetchError> = None;

        match self.primary.fetch_in_range(request).await {
            Ok(data) if !data.is_empty() => {
                info!("fetched {} from {}", request.kind, self.primary.id());
                return Ok(data);
            }
            Ok(_) => {
                info!(
                    "{} returned no data for {} {}",
                    self.primary.id(),
                    request.ticker,
                    request.kind
                );
            }
            Err(e) => {
                warn!("failed to fetch from {}: {}", self.primary.id(), e);
                primary_error = Some(e);
            }
        }

        if self.enable_fallback {
            info!("attempting fallback to {}", self.secondary.id());
            match self.secondary.fetch_in_range(request).await {
                Ok(data) if !data.is_empty() => {
                    info!(
                        "fetched {} from fallback source {}",
                        request.kind,
                        self.secondary.id()
                    );
                    return Ok(data);
                }
                Ok(_) => {
                    info!("fallback source {} also returned no data", self.secondary.id());
                }
                Err(e) => {
                    // Never let a fallback failure shadow the primary outcome.
                    warn!("fallback to {} also failed: {}", self.secondary.id(), e);
                }
            }
        }

        match primary_error {
            Some(e) => Err(e),
            None => Ok(RangeData::new()),
        }
    }

    /// Release provider resources (the broker gateway session).
    ///
    /// Idempotent; safe to call when nothing was ever connected.
    pub async fn shutdown(&self) {
        self.primary.shutdown().await;
        self.secondary.shutdown().await;
    }
}
