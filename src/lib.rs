//! Market data acquisition for trading agents.
//!
//! This crate fetches per-date market data (news, historical bars,
//! fundamentals, company info, real-time quotes) for a ticker over a date
//! range. Data comes from an Interactive Brokers Client Portal gateway
//! when one is available, with a local Finnhub file cache as the other
//! source; [`SourceSelector`] decides which one answers and falls back
//! when the first choice fails or has nothing.
//!
//! Async callers use [`SourceSelector`] directly. Blocking pipelines use
//! [`blocking::BlockingFetcher`], which carries its own runtime.

pub mod blocking;
pub mod config;
pub mod errors;
pub mod models;
pub mod provider;
pub mod selector;

pub use blocking::BlockingFetcher;
pub use config::{DataSourceConfig, SourceId};
pub use errors::FetchError;
pub use models::{DataKind, FetchOptions, FetchRequest, RangeData};
pub use provider::{DataProvider, FinnhubCacheProvider, IbkrProvider};
pub use selector::SourceSelector;
