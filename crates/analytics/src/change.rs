use crate::error::AnalyticsError;
use crate::record::PerformanceRecord;
use core_types::{Instrument, PriceSeries, Timeframe};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A stateless calculator for percentage changes over bar lookbacks.
#[derive(Debug, Default)]
pub struct ChangeCalculator {}

/// The outcome of one change computation.
///
/// `current` is the latest close (absent only for an empty series);
/// `pct_change` is absent whenever the series is empty, shorter than the
/// lookback, or the reference close is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangePoint {
    pub current: Option<Decimal>,
    pub pct_change: Option<Decimal>,
}

impl ChangeCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the percentage change between the latest close and the
    /// close `timeframe.bars` bars earlier.
    ///
    /// The formula is `(latest - reference) / reference * 100`, rounded to
    /// two decimal places half-to-even (banker's rounding, the `round_dp`
    /// default).
    ///
    /// # Errors
    ///
    /// A zero-bar lookback is a programming error and returns
    /// `AnalyticsError::InvalidOffset`. Every data-shaped problem (empty
    /// series, short history, zero reference) is reported through `None`
    /// fields instead.
    pub fn compute_change(
        &self,
        series: &PriceSeries,
        timeframe: &Timeframe,
    ) -> Result<ChangePoint, AnalyticsError> {
        if timeframe.bars == 0 {
            return Err(AnalyticsError::InvalidOffset(timeframe.bars));
        }

        let Some(current) = series.latest_close() else {
            return Ok(ChangePoint {
                current: None,
                pct_change: None,
            });
        };

        let pct_change = series
            .close_bars_back(timeframe.bars)
            .and_then(|reference| pct_change(current, reference));

        Ok(ChangePoint {
            current: Some(current),
            pct_change,
        })
    }

    /// Derives one instrument's record across all configured timeframes.
    ///
    /// The single fetched series is reused for every lookback; there is no
    /// per-timeframe refetch.
    pub fn compute_record(
        &self,
        instrument: &Instrument,
        series: &PriceSeries,
        timeframes: &[Timeframe],
    ) -> Result<PerformanceRecord, AnalyticsError> {
        let mut changes = BTreeMap::new();
        let mut current_price = None;

        for timeframe in timeframes {
            let point = self.compute_change(series, timeframe)?;
            current_price = current_price.or(point.current);
            changes.insert(timeframe.name.clone(), point.pct_change);
        }

        Ok(PerformanceRecord {
            name: instrument.name.clone(),
            symbol: instrument.symbol.clone(),
            current_price,
            changes,
        })
    }
}

/// `(current - reference) / reference * 100`, two decimals, half-to-even.
///
/// Returns `None` for a zero reference close; division by a zero market
/// price is a data condition, not a fault.
pub(crate) fn pct_change(current: Decimal, reference: Decimal) -> Option<Decimal> {
    if reference.is_zero() {
        return None;
    }
    Some(((current - reference) / reference * Decimal::ONE_HUNDRED).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PriceBar;
    use rust_decimal_macros::dec;

    fn series(symbol: &str, closes: &[Decimal]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar {
                date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: Some(100),
            })
            .collect();
        PriceSeries::new(symbol, bars)
    }

    #[test]
    fn test_change_matches_formula() {
        let calc = ChangeCalculator::new();
        let s = series("TCS.NS", &[dec!(100), dec!(104.2)]);
        let point = calc.compute_change(&s, &Timeframe::new("1-day", 1)).unwrap();
        assert_eq!(point.current, Some(dec!(104.2)));
        assert_eq!(point.pct_change, Some(dec!(4.20)));
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        let calc = ChangeCalculator::new();
        // 100 -> 102.345 is +2.345%, which rounds down to the even digit.
        let s = series("A", &[dec!(100), dec!(102.345)]);
        let point = calc.compute_change(&s, &Timeframe::new("1-day", 1)).unwrap();
        assert_eq!(point.pct_change, Some(dec!(2.34)));

        // 100 -> 102.355 is +2.355%, which rounds up to the even digit.
        let s = series("B", &[dec!(100), dec!(102.355)]);
        let point = calc.compute_change(&s, &Timeframe::new("1-day", 1)).unwrap();
        assert_eq!(point.pct_change, Some(dec!(2.36)));
    }

    #[test]
    fn test_zero_bar_offset_is_invalid() {
        let calc = ChangeCalculator::new();
        let s = series("INFY.NS", &[dec!(100), dec!(101)]);
        let result = calc.compute_change(&s, &Timeframe::new("same-day", 0));
        assert!(matches!(result, Err(AnalyticsError::InvalidOffset(0))));
    }

    #[test]
    fn test_empty_series_yields_no_price_and_no_change() {
        let calc = ChangeCalculator::new();
        let s = PriceSeries::empty("KOL");
        let point = calc.compute_change(&s, &Timeframe::new("1-day", 1)).unwrap();
        assert_eq!(point.current, None);
        assert_eq!(point.pct_change, None);
    }

    #[test]
    fn test_short_series_keeps_price_but_not_change() {
        let calc = ChangeCalculator::new();
        let s = series("GICRE.NS", &[dec!(100), dec!(101), dec!(102)]);
        let point = calc.compute_change(&s, &Timeframe::new("1-week", 5)).unwrap();
        assert_eq!(point.current, Some(dec!(102)));
        assert_eq!(point.pct_change, None);
    }

    #[test]
    fn test_zero_reference_close_is_unavailable_not_a_fault() {
        let calc = ChangeCalculator::new();
        let s = series("SI=F", &[dec!(0), dec!(5)]);
        let point = calc.compute_change(&s, &Timeframe::new("1-day", 1)).unwrap();
        assert_eq!(point.current, Some(dec!(5)));
        assert_eq!(point.pct_change, None);
    }

    #[test]
    fn test_record_reuses_one_series_for_all_timeframes() {
        let calc = ChangeCalculator::new();
        let s = series("GC=F", &[dec!(90), dec!(95), dec!(96), dec!(97), dec!(98), dec!(99)]);
        let timeframes = [Timeframe::new("1-day", 1), Timeframe::new("1-week", 5)];
        let record = calc
            .compute_record(&Instrument::new("Gold", "GC=F"), &s, &timeframes)
            .unwrap();

        assert_eq!(record.current_price, Some(dec!(99)));
        assert_eq!(record.change("1-day"), Some(dec!(1.02)));
        assert_eq!(record.change("1-week"), Some(dec!(10.00)));
        assert_eq!(record.change("3-month"), None);
    }
}
