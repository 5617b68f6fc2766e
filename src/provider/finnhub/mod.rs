//! Local Finnhub cache data provider.
//!
//! Reads date-keyed JSON files that a separate download job maintains under
//! `<data_dir>/finnhub_data/<category>/`. There is no network access here;
//! the files are the provider. File layout:
//!
//! ```text
//! <data_dir>/finnhub_data/news_data/AAPL_data_formatted.json
//! <data_dir>/finnhub_data/news_data/AAPL_annual_data_formatted.json   (with a period)
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use serde_json::Value;

use crate::errors::FetchError;
use crate::models::{retain_range, DataKind, FetchRequest, RangeData};
use crate::provider::DataProvider;

const PROVIDER_ID: &str = "FINNHUB";

const CACHE_ROOT: &str = "finnhub_data";

/// Data provider backed by pre-downloaded Finnhub cache files.
pub struct FinnhubCacheProvider {
    data_dir: PathBuf,
}

impl FinnhubCacheProvider {
    /// Create a provider rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Cache directory name for a data kind, or `None` when the cache has
    /// no files for that kind.
    fn cache_category(kind: DataKind) -> Option<&'static str> {
        match kind {
            DataKind::News => Some("news_data"),
            DataKind::Fundamentals => Some("fin_as_reported"),
            // The cache only holds downloadable report archives; bars,
            // contract metadata, and live snapshots never land on disk.
            DataKind::Historical | DataKind::CompanyInfo | DataKind::RealTime => None,
        }
    }

    /// Path of the cache file for a request.
    fn cache_path(&self, request: &FetchRequest, category: &str) -> PathBuf {
        let file_name = match request.options.period.as_deref() {
            Some(period) => format!("{}_{}_data_formatted.json", request.ticker, period),
            None => format!("{}_data_formatted.json", request.ticker),
        };
        self.data_dir.join(CACHE_ROOT).join(category).join(file_name)
    }

    fn read_cache_file(path: &Path) -> Result<BTreeMap<String, Value>, FetchError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FetchError::Cache(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| FetchError::Parse(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl DataProvider for FinnhubCacheProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_in_range(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        let Some(category) = Self::cache_category(request.kind) else {
            warn!(
                "no local cache for data kind '{}', returning empty result",
                request.kind
            );
            return Ok(RangeData::new());
        };

        let path = self.cache_path(request, category);
        debug!("reading cache file {}", path.display());

        let raw = Self::read_cache_file(&path)?;

        let mut data = RangeData::new();
        for (key, value) in raw {
            match key.parse::<NaiveDate>() {
                Ok(date) => {
                    data.insert(date, value);
                }
                Err(_) => {
                    warn!("skipping non-date key '{}' in {}", key, path.display());
                }
            }
        }
        retain_range(&mut data, request.start, request.end);

        debug!(
            "cache served {} dates for {} {} ({} to {})",
            data.len(),
            request.ticker,
            request.kind,
            request.start,
            request.end
        );
        Ok(data)
    }
}
