//! Configuration surface for the data sources.
//!
//! The configuration only decides which provider plays "primary" and how to
//! reach the broker gateway; the fallback policy itself is fixed.

use std::path::PathBuf;
use std::time::Duration;

use log::warn;
use serde::Deserialize;

/// Which source serves requests first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceId {
    /// Broker gateway
    Ibkr,
    /// Local Finnhub cache
    Finnhub,
}

impl SourceId {
    /// The other source, used as fallback.
    pub fn other(&self) -> SourceId {
        match self {
            SourceId::Ibkr => SourceId::Finnhub,
            SourceId::Finnhub => SourceId::Ibkr,
        }
    }
}

/// Data source configuration.
///
/// Deserializable from JSON; every field has a default so partial configs
/// are fine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    /// Primary source name: "ibkr" or "finnhub"
    pub data_source: String,
    /// Whether to fall back to the other source on failure or empty result
    pub enable_fallback: bool,
    /// Broker gateway host
    pub ibkr_host: String,
    /// Broker gateway port
    pub ibkr_port: u16,
    /// Client id reported to the gateway
    pub ibkr_client_id: u32,
    /// Request timeout against the gateway, in seconds
    pub ibkr_timeout_secs: u64,
    /// Root directory of the local Finnhub cache
    pub data_dir: PathBuf,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            data_source: "finnhub".to_string(),
            enable_fallback: true,
            ibkr_host: "127.0.0.1".to_string(),
            ibkr_port: 7497,
            ibkr_client_id: 1,
            ibkr_timeout_secs: 30,
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl DataSourceConfig {
    /// The source configured as primary.
    ///
    /// Unknown names fall back to the default source with a warning rather
    /// than failing: a typo in config should degrade, not crash.
    pub fn primary_source(&self) -> SourceId {
        match self.data_source.to_lowercase().as_str() {
            "ibkr" => SourceId::Ibkr,
            "finnhub" => SourceId::Finnhub,
            other => {
                warn!("unknown data_source '{}', defaulting to finnhub", other);
                SourceId::Finnhub
            }
        }
    }

    /// Gateway request timeout as a `Duration`.
    pub fn ibkr_timeout(&self) -> Duration {
        Duration::from_secs(self.ibkr_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DataSourceConfig::default();
        assert_eq!(config.primary_source(), SourceId::Finnhub);
        assert!(config.enable_fallback);
        assert_eq!(config.ibkr_host, "127.0.0.1");
        assert_eq!(config.ibkr_port, 7497);
        assert_eq!(config.ibkr_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: DataSourceConfig =
            serde_json::from_str(r#"{"data_source": "ibkr", "ibkr_port": 7496}"#).unwrap();
        assert_eq!(config.primary_source(), SourceId::Ibkr);
        assert_eq!(config.ibkr_port, 7496);
        assert!(config.enable_fallback);
    }

    #[test]
    fn test_unknown_source_falls_back_to_default() {
        let config: DataSourceConfig =
            serde_json::from_str(r#"{"data_source": "bloomberg"}"#).unwrap();
        assert_eq!(config.primary_source(), SourceId::Finnhub);
    }

    #[test]
    fn test_source_other() {
        assert_eq!(SourceId::Ibkr.other(), SourceId::Finnhub);
        assert_eq!(SourceId::Finnhub.other(), SourceId::Ibkr);
    }
}
