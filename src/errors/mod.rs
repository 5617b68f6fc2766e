//! Error types for market data fetching.
//!
//! An empty result is not an error: providers return an empty map when a
//! symbol simply has no data in the requested range. Errors are reserved for
//! requests that could not be served at all.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while fetching data from a provider.
///
/// There is deliberately no retry classification here. The selector only
/// distinguishes "the call raised" from "the call returned", and the
/// fallback policy is driven by that alone.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The provider could not be reached at all (gateway down, refused
    /// connection, timed out before a response).
    #[error("Connection failed: {provider} - {message}")]
    ConnectionFailed {
        /// The provider that was unreachable
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The provider answered but reported a failure.
    #[error("Provider error: {provider} - {message}")]
    Provider {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A local cache file was missing or unreadable.
    #[error("Cache read failed: {0}")]
    Cache(String),

    /// The request's start date is after its end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let error = FetchError::ConnectionFailed {
            provider: "IBKR".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Connection failed: IBKR - connection refused"
        );
    }

    #[test]
    fn test_provider_error_display() {
        let error = FetchError::Provider {
            provider: "FINNHUB".to_string(),
            message: "bad ticker".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: FINNHUB - bad ticker");
    }

    #[test]
    fn test_invalid_range_display() {
        let error = FetchError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            format!("{}", error),
            "Invalid date range: 2024-02-01 > 2024-01-01"
        );
    }

    #[test]
    fn test_cache_error_display() {
        let error = FetchError::Cache("no such file".to_string());
        assert_eq!(format!("{}", error), "Cache read failed: no such file");
    }
}
