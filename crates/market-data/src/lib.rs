//! # Meridian Market Data
//!
//! This crate is the boundary to the external market-data provider. It owns
//! the HTTP client, the raw-payload deserialization, and the bounded
//! fan-out that fetches an entire instrument universe concurrently.
//!
//! ## Architectural Principles
//!
//! - **Degrade, never abort:** a failed or empty fetch for one symbol must
//!   not take down the batch. The fetcher converts per-symbol failures into
//!   empty series; the analytics layer treats those as first-class states.
//! - **Swappable provider:** the engine consumes the `MarketDataProvider`
//!   trait, so the live chart-API client can be replaced by a mock in tests.

use crate::error::MarketDataError;
use crate::responses::ChartResponse;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use core_types::PriceSeries;

pub mod error;
pub mod fetcher;
pub mod responses;

// --- Public API ---
pub use fetcher::fetch_universe;

/// The generic, abstract interface to a daily-bar market-data provider.
/// This trait is the contract the report pipeline uses, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the daily price history for one symbol.
    ///
    /// An `Ok` result may carry an empty series; callers must treat that as
    /// a valid response for a malformed or unavailable identifier.
    async fn fetch_daily(
        &self,
        symbol: &str,
        range: &RangeSpec,
    ) -> Result<PriceSeries, MarketDataError>;
}

/// The history window for a fetch: either a provider period keyword or an
/// explicit date range.
#[derive(Debug, Clone)]
pub enum RangeSpec {
    /// A provider period string such as "5d", "3mo" or "6mo".
    Period(String),
    /// A closed calendar-date range.
    Between { start: NaiveDate, end: NaiveDate },
}

/// A concrete `MarketDataProvider` backed by the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Points the client at a different host, used by integration tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            // The chart endpoint rejects clients without a browser-like agent.
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; meridian/0.1)")
                .build()
                .expect("Failed to build reqwest client"),
            base_url: base_url.into(),
        }
    }
}

impl Default for YahooChartClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartClient {
    async fn fetch_daily(
        &self,
        symbol: &str,
        range: &RangeSpec,
    ) -> Result<PriceSeries, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let mut request = self.client.get(&url).query(&[("interval", "1d")]);
        request = match range {
            RangeSpec::Period(period) => request.query(&[("range", period.as_str())]),
            RangeSpec::Between { start, end } => {
                let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
                // period2 is exclusive, so step one day past the requested end.
                let period2 = end
                    .succ_opt()
                    .unwrap_or(*end)
                    .and_time(NaiveTime::MIN)
                    .and_utc()
                    .timestamp();
                request.query(&[
                    ("period1", period1.to_string().as_str()),
                    ("period2", period2.to_string().as_str()),
                ])
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        // The provider reports failures in-band, so parse the envelope even
        // on non-success statuses to surface its code and description.
        let payload: ChartResponse = serde_json::from_str(&text).map_err(|e| {
            MarketDataError::Deserialization(format!("{symbol} (status {status}): {e}"))
        })?;

        if let Some(error) = payload.chart.error {
            return Err(MarketDataError::Provider(error.code, error.description));
        }

        let series = payload
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .map(|result| result.into_series(symbol))
            .unwrap_or_else(|| PriceSeries::empty(symbol));

        tracing::debug!(symbol, bars = series.len(), "fetched daily series");
        Ok(series)
    }
}
