//! Core data types for fetch operations:
//! - `kind` - Classification of the data being requested (DataKind)
//! - `request` - Fetch request and provider-specific options (FetchRequest, FetchOptions)
//! - `range` - Date-keyed result map (RangeData)
//! - `market` - Typed payloads serialized into results (Bar, NewsArticle, ...)

mod kind;
mod market;
mod range;
mod request;

pub use kind::DataKind;
pub use market::{Bar, CompanyInfo, NewsArticle, RealTimeQuote};
pub use range::{is_empty_payload, retain_range, RangeData};
pub use request::{FetchOptions, FetchRequest};
