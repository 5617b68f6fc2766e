//! Serde structures for the broker gateway's JSON responses.

use serde::Deserialize;
use serde_json::Value;

/// Response from /iserver/auth/status
#[derive(Debug, Deserialize)]
pub(super) struct AuthStatusResponse {
    /// Whether the gateway session is authenticated
    #[serde(default)]
    pub authenticated: bool,
    /// Whether the gateway is connected to the brokerage backend
    #[serde(default)]
    pub connected: bool,
}

/// One match from /iserver/secdef/search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SecdefSearchItem {
    /// Contract identifier used by all other endpoints
    pub conid: i64,
    /// Ticker symbol of the match
    #[serde(default)]
    pub symbol: Option<String>,
    /// Company name
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Response from /iserver/marketdata/history
#[derive(Debug, Deserialize)]
pub(super) struct HistoryResponse {
    #[serde(default)]
    pub data: Vec<HistoryBar>,
}

/// One bar in a history response
#[derive(Debug, Deserialize)]
pub(super) struct HistoryBar {
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    #[serde(default)]
    pub v: f64,
    /// Bar timestamp (Unix epoch milliseconds)
    pub t: i64,
}

/// Response from /iserver/news
#[derive(Debug, Deserialize)]
pub(super) struct NewsResponse {
    #[serde(default)]
    pub articles: Vec<NewsItem>,
}

/// One article in a news response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NewsItem {
    /// Publication time (Unix epoch milliseconds)
    pub time: i64,
    #[serde(default)]
    pub provider_code: String,
    #[serde(default)]
    pub article_id: String,
    #[serde(default)]
    pub headline: String,
}

/// Response from /iserver/contract/{conid}/info
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContractInfoResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub time_zone_id: Option<String>,
    #[serde(default)]
    pub trading_hours: Option<String>,
}

/// One entry from /iserver/marketdata/snapshot
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SnapshotItem {
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub last: Option<f64>,
    #[serde(default)]
    pub bid_size: Option<f64>,
    #[serde(default)]
    pub ask_size: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub halted: bool,
}

/// Error body some gateway endpoints return
#[derive(Debug, Deserialize)]
pub(super) struct GatewayError {
    pub error: Option<String>,
}

/// Fundamentals snapshots are passed through unmodified.
pub(super) type FundamentalsResponse = Value;
