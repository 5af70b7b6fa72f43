use crate::change::{ChangeCalculator, pct_change};
use crate::record::{ChartSeries, PerformanceRecord};
use core_types::{Instrument, PriceSeries, Timeframe};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Bars in one trading week, the window of the week-over-week comparison.
const TRADING_WEEK_BARS: usize = 5;

/// The per-run batch evaluator: turns a materialized set of price series
/// into performance records and renderer-ready derived series.
#[derive(Debug, Default)]
pub struct PerformanceEngine {
    calculator: ChangeCalculator,
}

/// One row of the index week-over-week comparison: the change from a day's
/// close to the close five trading bars later, labelled with that day's
/// weekday name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayChange {
    pub weekday: String,
    pub pct_change: Decimal,
}

impl PerformanceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates every instrument against the fetched series.
    ///
    /// Instruments whose series is absent from the map are evaluated
    /// against an empty series and come out with unavailable metrics, so
    /// the ranking stage can consume whatever subset of fetches succeeded.
    /// A per-instrument computation error is logged and skipped rather
    /// than aborting the batch.
    pub fn compute_records(
        &self,
        instruments: &[Instrument],
        series_by_symbol: &HashMap<String, PriceSeries>,
        timeframes: &[Timeframe],
    ) -> Vec<PerformanceRecord> {
        let mut records = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            let fallback = PriceSeries::empty(instrument.symbol.clone());
            let series = series_by_symbol
                .get(&instrument.symbol)
                .unwrap_or(&fallback);
            match self
                .calculator
                .compute_record(instrument, series, timeframes)
            {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(symbol = %instrument.symbol, error = %e, "skipping instrument");
                }
            }
        }
        records
    }

    /// The index week-over-week daily comparison.
    ///
    /// For every bar with a bar five trading days later, emits the
    /// percentage change between the two closes labelled with the earlier
    /// bar's weekday. Series shorter than a week produce no rows.
    pub fn weekly_comparison(&self, series: &PriceSeries) -> Vec<WeekdayChange> {
        let bars = series.bars();
        let mut rows = Vec::new();
        for window in bars.windows(TRADING_WEEK_BARS + 1) {
            let reference = &window[0];
            let latest = &window[TRADING_WEEK_BARS];
            let Some(change) = pct_change(latest.close, reference.close) else {
                continue;
            };
            rows.push(WeekdayChange {
                weekday: reference.date.format("%A").to_string(),
                pct_change: change,
            });
        }
        rows
    }

    /// The trailing close series for one instrument, for the renderer's
    /// price charts.
    pub fn chart_series(
        &self,
        name: &str,
        series: &PriceSeries,
        bars: usize,
    ) -> ChartSeries {
        ChartSeries {
            name: name.to_string(),
            points: series
                .trailing(bars)
                .iter()
                .map(|bar| (bar.date, bar.close))
                .collect(),
        }
    }
}
