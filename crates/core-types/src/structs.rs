use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single daily price bar (OHLCV) for one instrument.
///
/// Bars are immutable once fetched; volume is absent for some index feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Option<i64>,
}

/// An ordered daily price history for a single instrument.
///
/// Invariant: bar dates are strictly increasing with no duplicates. The
/// constructor enforces this by sorting and dropping duplicate dates, so a
/// series built from any provider payload is safe to index by bar offset.
///
/// An empty series (no bars at all) and a short series (fewer bars than a
/// requested lookback) are both valid states, never errors. Callers must
/// handle them through the `Option`-returning accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series from raw bars, normalizing order and duplicate dates.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// A series with no bars, used when a fetch failed or returned nothing.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The close of the most recent bar, if any bars exist.
    pub fn latest_close(&self) -> Option<Decimal> {
        self.bars.last().map(|bar| bar.close)
    }

    /// The date of the most recent bar, if any bars exist.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|bar| bar.date)
    }

    /// The close `offset` trading bars before the most recent bar.
    ///
    /// `offset` 0 is the latest bar itself. Returns `None` when the series
    /// holds fewer than `offset + 1` bars.
    pub fn close_bars_back(&self, offset: usize) -> Option<Decimal> {
        if self.bars.len() < offset + 1 {
            return None;
        }
        self.bars
            .get(self.bars.len() - 1 - offset)
            .map(|bar| bar.close)
    }

    /// The trailing `count` bars (all bars when fewer exist).
    pub fn trailing(&self, count: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(count);
        &self.bars[start..]
    }
}

/// A named lookback window expressed as a count of trading bars.
///
/// Offsets are bar counts, not calendar days: markets are closed on
/// weekends and holidays, so "1-week" is 5 bars, "3-month" roughly 63.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub name: String,
    pub bars: usize,
}

impl Timeframe {
    pub fn new(name: impl Into<String>, bars: usize) -> Self {
        Self {
            name: name.into(),
            bars,
        }
    }

    /// A zero-bar lookback would compare the latest close with itself.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.bars == 0 {
            return Err(CoreError::InvalidInput(
                format!("timeframe '{}'", self.name),
                "lookback must be at least 1 bar".to_string(),
            ));
        }
        Ok(())
    }
}

/// A tracked instrument: a display name plus the provider ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub symbol: String,
}

impl Instrument {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(date: &str, close: Decimal) -> PriceBar {
        PriceBar {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: Some(1_000),
        }
    }

    #[test]
    fn test_series_sorts_and_deduplicates_bars() {
        let series = PriceSeries::new(
            "GC=F",
            vec![
                bar("2025-08-05", dec!(102)),
                bar("2025-08-01", dec!(100)),
                bar("2025-08-05", dec!(999)),
                bar("2025-08-04", dec!(101)),
            ],
        );
        let dates: Vec<String> = series.bars().iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-08-01", "2025-08-04", "2025-08-05"]);
        // The first bar seen for a duplicated date wins.
        assert_eq!(series.latest_close(), Some(dec!(102)));
    }

    #[test]
    fn test_close_bars_back_bounds() {
        let series = PriceSeries::new(
            "INFY.NS",
            vec![
                bar("2025-08-01", dec!(10)),
                bar("2025-08-04", dec!(11)),
                bar("2025-08-05", dec!(12)),
            ],
        );
        assert_eq!(series.close_bars_back(0), Some(dec!(12)));
        assert_eq!(series.close_bars_back(2), Some(dec!(10)));
        assert_eq!(series.close_bars_back(3), None);
    }

    #[test]
    fn test_empty_series_is_a_valid_state() {
        let series = PriceSeries::empty("KOL");
        assert!(series.is_empty());
        assert_eq!(series.latest_close(), None);
        assert_eq!(series.close_bars_back(1), None);
        assert!(series.trailing(8).is_empty());
    }

    #[test]
    fn test_trailing_clamps_to_available_bars() {
        let series = PriceSeries::new(
            "^NSEI",
            vec![bar("2025-08-04", dec!(1)), bar("2025-08-05", dec!(2))],
        );
        assert_eq!(series.trailing(8).len(), 2);
        assert_eq!(series.trailing(1)[0].close, dec!(2));
    }

    #[test]
    fn test_timeframe_validation_rejects_zero_bars() {
        assert!(Timeframe::new("1-day", 1).validate().is_ok());
        assert!(Timeframe::new("broken", 0).validate().is_err());
    }
}
