//! Data provider trait definition.

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::{FetchRequest, RangeData};

/// Trait for data sources the selector can query.
///
/// Implement this trait to add a new data source. The selector treats
/// implementations as interchangeable: it only needs the identity string
/// for logging and the range-fetch operation.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "IBKR" or "FINNHUB".
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch data for the request's ticker, kind, and date range.
    ///
    /// # Returns
    ///
    /// A date-keyed payload map on success. An empty map means the request
    /// was served but no data exists in the range; it is not an error.
    async fn fetch_in_range(&self, request: &FetchRequest) -> Result<RangeData, FetchError>;

    /// Release any held connection.
    ///
    /// Idempotent and safe to call when no connection exists. Default
    /// implementation does nothing; only connection-holding providers
    /// override it.
    async fn shutdown(&self) {}
}
