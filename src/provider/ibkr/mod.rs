//! Broker gateway data provider.
//!
//! Talks to the Interactive Brokers Client Portal gateway running locally:
//! - Contract lookup via /iserver/secdef/search
//! - Daily bars via /iserver/marketdata/history
//! - News headlines via /iserver/news
//! - Fundamentals, contract info, and snapshots via their /iserver endpoints
//!
//! The gateway holds the brokerage session; this client only validates it
//! lazily on first use and logs out on shutdown.

mod models;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::FetchError;
use crate::models::{
    is_empty_payload, Bar, CompanyInfo, DataKind, FetchRequest, NewsArticle, RangeData,
    RealTimeQuote,
};
use crate::provider::DataProvider;

use models::{
    AuthStatusResponse, ContractInfoResponse, FundamentalsResponse, GatewayError, HistoryBar,
    HistoryResponse, NewsResponse, SecdefSearchItem, SnapshotItem,
};

const PROVIDER_ID: &str = "IBKR";

const DEFAULT_DURATION: &str = "1y";
const DEFAULT_BAR_SIZE: &str = "1d";
const NEWS_BATCH_SIZE: u32 = 100;

/// Gateway session state, created lazily on first fetch.
struct Session {
    /// Ticker -> contract id cache for this session
    conids: HashMap<String, i64>,
}

/// Data provider backed by the local broker gateway.
///
/// The session cell is a `tokio::sync::Mutex`; concurrent fetches against
/// one provider serialize on it rather than sharing the session safely.
/// Correctness under heavy concurrent use is not a design goal here.
pub struct IbkrProvider {
    client: Client,
    base_url: String,
    client_id: u32,
    session: Mutex<Option<Session>>,
}

impl IbkrProvider {
    /// Create a provider for a gateway at `host:port`.
    pub fn new(host: &str, port: u16, client_id: u32, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: format!("http://{}:{}/v1/api", host, port),
            client_id,
            session: Mutex::new(None),
        }
    }

    /// Make a GET request to the gateway and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        debug!("gateway request: {} with {} params", path, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    FetchError::ConnectionFailed {
                        provider: PROVIDER_ID.to_string(),
                        message: e.to_string(),
                    }
                } else {
                    FetchError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(gateway_error) = serde_json::from_str::<GatewayError>(&body) {
                if let Some(message) = gateway_error.error {
                    return Err(FetchError::Provider {
                        provider: PROVIDER_ID.to_string(),
                        message,
                    });
                }
            }
            return Err(FetchError::Provider {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Parse(format!("{}: {}", path, e)))
    }

    /// Validate the gateway session, creating the local session state once.
    ///
    /// Holds the session lock for the duration; concurrent callers wait.
    async fn ensure_session(&self) -> Result<(), FetchError> {
        let mut guard = self.session.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let client_id = self.client_id.to_string();
        let status: AuthStatusResponse = self
            .get_json("/iserver/auth/status", &[("clientId", client_id.as_str())])
            .await?;

        if !status.authenticated || !status.connected {
            return Err(FetchError::ConnectionFailed {
                provider: PROVIDER_ID.to_string(),
                message: format!(
                    "gateway session not ready (authenticated={}, connected={})",
                    status.authenticated, status.connected
                ),
            });
        }

        debug!("gateway session validated at {}", self.base_url);
        *guard = Some(Session {
            conids: HashMap::new(),
        });
        Ok(())
    }

    /// Resolve a ticker to its contract id, caching per session.
    async fn resolve_conid(&self, ticker: &str) -> Result<i64, FetchError> {
        self.ensure_session().await?;

        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or_else(|| FetchError::ConnectionFailed {
            provider: PROVIDER_ID.to_string(),
            message: "session was torn down during fetch".to_string(),
        })?;

        if let Some(conid) = session.conids.get(ticker) {
            return Ok(*conid);
        }

        let matches: Vec<SecdefSearchItem> = self
            .get_json("/iserver/secdef/search", &[("symbol", ticker)])
            .await?;

        // Prefer the exact-symbol match; the gateway lists loose matches too.
        let conid = matches
            .iter()
            .find(|m| m.symbol.as_deref() == Some(ticker))
            .or_else(|| matches.first())
            .map(|m| m.conid)
            .ok_or_else(|| FetchError::Provider {
                provider: PROVIDER_ID.to_string(),
                message: format!("no contract found for ticker {}", ticker),
            })?;

        session.conids.insert(ticker.to_string(), conid);
        Ok(conid)
    }

    async fn fetch_news(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        let conid = self.resolve_conid(&request.ticker).await?;
        let conid_str = conid.to_string();
        let count = NEWS_BATCH_SIZE.to_string();

        let response: NewsResponse = self
            .get_json(
                "/iserver/news",
                &[("conid", conid_str.as_str()), ("count", count.as_str())],
            )
            .await?;

        let mut by_date: BTreeMap<NaiveDate, Vec<NewsArticle>> = BTreeMap::new();
        for item in response.articles {
            let Some(time) = Utc.timestamp_millis_opt(item.time).single() else {
                warn!("dropping article with invalid timestamp {}", item.time);
                continue;
            };
            let article = NewsArticle {
                time,
                provider_code: item.provider_code,
                article_id: item.article_id,
                headline: item.headline,
            };
            let date = article.date();
            if request.contains(date) {
                by_date.entry(date).or_default().push(article);
            }
        }

        let mut data = RangeData::new();
        for (date, articles) in by_date {
            data.insert(
                date,
                serde_json::to_value(articles).map_err(|e| FetchError::Parse(e.to_string()))?,
            );
        }

        debug!(
            "fetched news for {} on {} dates in range",
            request.ticker,
            data.len()
        );
        Ok(data)
    }

    async fn fetch_historical(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        let conid = self.resolve_conid(&request.ticker).await?;
        let conid_str = conid.to_string();
        let period = request
            .options
            .duration
            .as_deref()
            .unwrap_or(DEFAULT_DURATION);
        let bar = request
            .options
            .bar_size
            .as_deref()
            .unwrap_or(DEFAULT_BAR_SIZE);

        let mut params = vec![
            ("conid", conid_str.as_str()),
            ("period", period),
            ("bar", bar),
        ];
        if let Some(what) = request.options.what_to_show.as_deref() {
            params.push(("whatToShow", what));
        }

        let response: HistoryResponse = self
            .get_json("/iserver/marketdata/history", &params)
            .await?;

        let mut data = RangeData::new();
        for raw in response.data {
            let Some(converted) = convert_bar(&raw) else {
                warn!("dropping bar with invalid fields at t={}", raw.t);
                continue;
            };
            if request.contains(converted.date) {
                let date = converted.date;
                data.insert(
                    date,
                    serde_json::to_value(converted)
                        .map_err(|e| FetchError::Parse(e.to_string()))?,
                );
            }
        }

        debug!(
            "fetched {} bars for {} ({} to {})",
            data.len(),
            request.ticker,
            request.start,
            request.end
        );
        Ok(data)
    }

    async fn fetch_fundamentals(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        let conid = self.resolve_conid(&request.ticker).await?;

        let snapshot: FundamentalsResponse = self
            .get_json(&format!("/iserver/fundamentals/{}/snapshot", conid), &[])
            .await?;

        let mut data = RangeData::new();
        if !is_empty_payload(&snapshot) {
            data.insert(request.end, json!({ "fundamentals": snapshot }));
        }
        Ok(data)
    }

    async fn fetch_company_info(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        let conid = self.resolve_conid(&request.ticker).await?;

        let info: ContractInfoResponse = self
            .get_json(&format!("/iserver/contract/{}/info", conid), &[])
            .await?;

        let company = CompanyInfo {
            symbol: info.symbol.unwrap_or_else(|| request.ticker.clone()),
            exchange: info.exchange,
            currency: info.currency,
            long_name: info.company_name,
            industry: info.industry,
            category: info.category,
            time_zone_id: info.time_zone_id,
            trading_hours: info.trading_hours,
        };

        let mut data = RangeData::new();
        data.insert(
            request.end,
            serde_json::to_value(company).map_err(|e| FetchError::Parse(e.to_string()))?,
        );
        Ok(data)
    }

    async fn fetch_real_time(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        let conid = self.resolve_conid(&request.ticker).await?;
        let conids = conid.to_string();

        let items: Vec<SnapshotItem> = self
            .get_json(
                "/iserver/marketdata/snapshot",
                &[("conids", conids.as_str())],
            )
            .await?;

        let mut data = RangeData::new();
        if let Some(item) = items.into_iter().next() {
            let quote = RealTimeQuote {
                symbol: request.ticker.clone(),
                bid: item.bid.and_then(to_decimal),
                ask: item.ask.and_then(to_decimal),
                last: item.last.and_then(to_decimal),
                bid_size: item.bid_size.and_then(to_decimal),
                ask_size: item.ask_size.and_then(to_decimal),
                volume: item.volume.and_then(to_decimal),
                high: item.high.and_then(to_decimal),
                low: item.low.and_then(to_decimal),
                close: item.close.and_then(to_decimal),
                halted: item.halted,
                time: Utc::now(),
            };
            data.insert(
                request.end,
                serde_json::to_value(quote).map_err(|e| FetchError::Parse(e.to_string()))?,
            );
        }
        Ok(data)
    }

    /// Log out of the gateway session. Idempotent; a failed logout is only
    /// logged since the gateway expires stale sessions on its own.
    pub async fn disconnect(&self) {
        let mut guard = self.session.lock().await;
        if guard.take().is_none() {
            return;
        }

        let url = format!("{}/logout", self.base_url);
        match self.client.post(&url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("logged out of gateway session");
            }
            Ok(response) => {
                warn!("gateway logout returned HTTP {}", response.status());
            }
            Err(e) => {
                warn!("gateway logout failed: {}", e);
            }
        }
    }
}

#[async_trait]
impl DataProvider for IbkrProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_in_range(&self, request: &FetchRequest) -> Result<RangeData, FetchError> {
        debug!(
            "fetching {} for {} from gateway ({} to {})",
            request.kind, request.ticker, request.start, request.end
        );

        match request.kind {
            DataKind::News => self.fetch_news(request).await,
            DataKind::Historical => self.fetch_historical(request).await,
            DataKind::Fundamentals => self.fetch_fundamentals(request).await,
            DataKind::CompanyInfo => self.fetch_company_info(request).await,
            DataKind::RealTime => self.fetch_real_time(request).await,
        }
    }

    async fn shutdown(&self) {
        self.disconnect().await;
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok()
}

fn convert_bar(raw: &HistoryBar) -> Option<Bar> {
    let date = Utc.timestamp_millis_opt(raw.t).single()?.date_naive();
    Some(Bar {
        date,
        open: Decimal::try_from(raw.o).ok()?,
        high: Decimal::try_from(raw.h).ok()?,
        low: Decimal::try_from(raw.l).ok()?,
        close: Decimal::try_from(raw.c).ok()?,
        volume: Decimal::try_from(raw.v).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> IbkrProvider {
        IbkrProvider::new("127.0.0.1", 7497, 1, Duration::from_secs(30))
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(provider().id(), "IBKR");
    }

    #[test]
    fn test_base_url() {
        assert_eq!(provider().base_url, "http://127.0.0.1:7497/v1/api");
    }

    #[test]
    fn test_auth_status_parsing() {
        let json = r#"{"authenticated": true, "connected": true, "competing": false}"#;
        let status: AuthStatusResponse = serde_json::from_str(json).unwrap();
        assert!(status.authenticated);
        assert!(status.connected);
    }

    #[test]
    fn test_auth_status_defaults_to_unauthenticated() {
        let status: AuthStatusResponse = serde_json::from_str("{}").unwrap();
        assert!(!status.authenticated);
        assert!(!status.connected);
    }

    #[test]
    fn test_secdef_search_parsing() {
        let json = r#"[
            {"conid": 265598, "symbol": "AAPL", "companyName": "APPLE INC"},
            {"conid": 38708077, "symbol": "APLE", "companyName": "APPLE HOSPITALITY REIT"}
        ]"#;
        let matches: Vec<SecdefSearchItem> = serde_json::from_str(json).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].conid, 265598);
        assert_eq!(matches[0].symbol.as_deref(), Some("AAPL"));
    }

    #[test]
    fn test_history_response_parsing() {
        let json = r#"{
            "data": [
                {"o": 185.0, "h": 186.4, "l": 183.92, "c": 184.25, "v": 58414500.0, "t": 1704297600000},
                {"o": 184.22, "h": 185.88, "l": 183.43, "c": 181.91, "v": 71983600.0, "t": 1704384000000}
            ]
        }"#;
        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].t, 1704297600000);
    }

    #[test]
    fn test_history_response_without_data() {
        let response: HistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_news_response_parsing() {
        let json = r#"{
            "articles": [
                {"time": 1704297600000, "providerCode": "BRFG", "articleId": "BRFG$1", "headline": "Apple ships"}
            ]
        }"#;
        let response: NewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.articles.len(), 1);
        assert_eq!(response.articles[0].provider_code, "BRFG");
    }

    #[test]
    fn test_snapshot_parsing() {
        let json = r#"[{"bid": 184.2, "ask": 184.24, "last": 184.22, "halted": false}]"#;
        let items: Vec<SnapshotItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].bid, Some(184.2));
        assert!(!items[0].halted);
    }

    #[test]
    fn test_convert_bar() {
        let raw = HistoryBar {
            o: 185.0,
            h: 186.4,
            l: 183.92,
            c: 184.25,
            v: 58414500.0,
            t: 1704297600000,
        };
        let bar = convert_bar(&raw).unwrap();
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(bar.close, Decimal::try_from(184.25).unwrap());
    }

    #[test]
    fn test_convert_bar_rejects_invalid_timestamp() {
        let raw = HistoryBar {
            o: 1.0,
            h: 1.0,
            l: 1.0,
            c: 1.0,
            v: 0.0,
            t: i64::MAX,
        };
        assert!(convert_bar(&raw).is_none());
    }

    #[tokio::test]
    async fn test_disconnect_without_session_is_noop() {
        // No session was ever created, so no logout request is attempted.
        provider().disconnect().await;
    }
}
