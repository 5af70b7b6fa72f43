use chrono::{TimeZone, Utc};
use core_types::{PriceBar, PriceSeries};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;

/// The envelope of the provider's chart endpoint.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartErrorPayload>,
}

/// The provider's in-band error object (unknown symbol, bad range, etc.).
#[derive(Debug, Deserialize)]
pub struct ChartErrorPayload {
    pub code: String,
    pub description: String,
}

/// One symbol's chart data: parallel arrays of timestamps and quote fields.
#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Vec<QuoteBlock>,
}

/// Quote arrays are index-aligned with `timestamp`; individual entries may
/// be null on half-holidays or data gaps.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteBlock {
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<i64>>>,
}

impl ChartResult {
    /// Converts the parallel-array payload into a normalized `PriceSeries`.
    ///
    /// Rows with a missing or non-finite quote value are dropped; a payload
    /// with no usable rows yields an empty series, which downstream layers
    /// treat as a valid state.
    pub fn into_series(self, symbol: &str) -> PriceSeries {
        let timestamps = self.timestamp.unwrap_or_default();
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let Some(date) = Utc
                .timestamp_opt(*ts, 0)
                .single()
                .map(|dt| dt.date_naive())
            else {
                continue;
            };
            let (Some(open), Some(high), Some(low), Some(close)) = (
                decimal_at(&quote.open, i),
                decimal_at(&quote.high, i),
                decimal_at(&quote.low, i),
                decimal_at(&quote.close, i),
            ) else {
                continue;
            };
            let volume = quote
                .volume
                .as_ref()
                .and_then(|v| v.get(i))
                .copied()
                .flatten();
            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        PriceSeries::new(symbol, bars)
    }
}

/// Reads one entry of a quote array as a `Decimal`.
///
/// Provider floats carry binary noise (e.g. 102.30000305175781), so values
/// are normalized to four decimal places.
fn decimal_at(values: &Option<Vec<Option<f64>>>, index: usize) -> Option<Decimal> {
    let value = values.as_ref()?.get(index).copied().flatten()?;
    Decimal::from_f64(value).map(|d| d.round_dp(4))
}
