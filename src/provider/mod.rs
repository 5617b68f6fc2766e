//! Data provider abstractions and implementations.
//!
//! This module contains:
//! - The `DataProvider` trait both sources implement
//! - The broker gateway client (primary source)
//! - The local Finnhub cache reader (secondary source)
//!
//! Providers are black boxes to the selector: each exposes a single
//! fetch-within-date-range operation and an identity string. Which one
//! plays "primary" is a configuration concern, not a provider concern.

mod traits;

pub mod finnhub;
pub mod ibkr;

pub use finnhub::FinnhubCacheProvider;
pub use ibkr::IbkrProvider;
pub use traits::DataProvider;
