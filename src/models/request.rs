use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::FetchError;

use super::kind::DataKind;

/// Provider-specific request knobs.
///
/// Each field is consumed by at most one provider and ignored by the other;
/// unset fields fall back to provider defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Lookback window for historical bar requests (e.g. "1y")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Bar size for historical bar requests (e.g. "1d")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_size: Option<String>,

    /// What the bars should show (e.g. "trades", "midpoint")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_to_show: Option<String>,

    /// Cache period tag for file-backed lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// A request for one data item over a date range.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    /// Stock ticker symbol
    pub ticker: String,
    /// Start of the date range (inclusive)
    pub start: NaiveDate,
    /// End of the date range (inclusive)
    pub end: NaiveDate,
    /// What kind of data to fetch
    pub kind: DataKind,
    /// Provider-specific options
    pub options: FetchOptions,
}

impl FetchRequest {
    /// Create a request, validating that `start <= end`.
    pub fn new(
        ticker: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        kind: DataKind,
    ) -> Result<Self, FetchError> {
        if start > end {
            return Err(FetchError::InvalidRange { start, end });
        }
        Ok(Self {
            ticker: ticker.into(),
            start,
            end,
            kind,
            options: FetchOptions::default(),
        })
    }

    /// Attach provider-specific options.
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether a date falls inside the requested range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_request_new() {
        let request = FetchRequest::new(
            "AAPL",
            date("2024-01-01"),
            date("2024-01-05"),
            DataKind::News,
        )
        .unwrap();
        assert_eq!(request.ticker, "AAPL");
        assert!(request.options.period.is_none());
    }

    #[test]
    fn test_request_rejects_reversed_range() {
        let result = FetchRequest::new(
            "AAPL",
            date("2024-01-05"),
            date("2024-01-01"),
            DataKind::News,
        );
        assert!(matches!(result, Err(FetchError::InvalidRange { .. })));
    }

    #[test]
    fn test_single_day_range_is_valid() {
        let request = FetchRequest::new(
            "AAPL",
            date("2024-01-01"),
            date("2024-01-01"),
            DataKind::RealTime,
        )
        .unwrap();
        assert!(request.contains(date("2024-01-01")));
        assert!(!request.contains(date("2024-01-02")));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let request = FetchRequest::new(
            "MSFT",
            date("2024-01-01"),
            date("2024-01-31"),
            DataKind::Historical,
        )
        .unwrap();
        assert!(request.contains(date("2024-01-01")));
        assert!(request.contains(date("2024-01-31")));
        assert!(!request.contains(date("2023-12-31")));
        assert!(!request.contains(date("2024-02-01")));
    }
}
