use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One instrument's evaluated performance across all configured timeframes.
///
/// Created fresh per engine run and never mutated afterwards. `None` is the
/// "unavailable" sentinel: the series was empty, too short for that
/// lookback, or had a zero reference price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub name: String,
    pub symbol: String,
    /// The latest close, absent only when the series held no bars at all.
    pub current_price: Option<Decimal>,
    /// Percentage change per timeframe name, rounded to two decimals.
    pub changes: BTreeMap<String, Option<Decimal>>,
}

impl PerformanceRecord {
    /// The change for one timeframe, collapsing "timeframe not computed"
    /// and "computed but unavailable" into a single `None`.
    pub fn change(&self, timeframe: &str) -> Option<Decimal> {
        self.changes.get(timeframe).copied().flatten()
    }
}

/// The sort direction of a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Best performers first (descending change).
    Gainers,
    /// Worst performers first (ascending change).
    Losers,
}

/// A ranked, size-bounded, directionally sorted list of performance records.
///
/// Each leaderboard is computed independently from the same read-only
/// record pool; overlapping membership across leaderboards is expected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub timeframe: String,
    pub direction: Direction,
    pub entries: Vec<PerformanceRecord>,
}

impl Leaderboard {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best-ranked record, if any qualified.
    pub fn top(&self) -> Option<&PerformanceRecord> {
        self.entries.first()
    }
}

/// Aggregate statistics over one evaluated record pool.
///
/// `evaluated` excludes records whose chosen timeframe change was
/// unavailable; `gainers + losers` may still be less than `evaluated`
/// because flat instruments count toward neither.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStats {
    pub tracked: usize,
    pub evaluated: usize,
    pub gainers: usize,
    pub losers: usize,
    /// Percent of evaluated instruments with a positive change; `None`
    /// when nothing was evaluated.
    pub breadth_pct: Option<Decimal>,
}

/// A trailing close series handed to the report renderer for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, Decimal)>,
}
