use crate::record::{Direction, Leaderboard, MarketStats, PerformanceRecord};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// A stateless builder of leaderboards and aggregate statistics.
#[derive(Debug, Default)]
pub struct PerformanceRanker {}

impl PerformanceRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks the full record pool by one timeframe's change.
    ///
    /// Records whose change is unavailable for that timeframe are dropped
    /// before sorting and never appear in a leaderboard. Ties are broken by
    /// symbol in ascending lexical order, so equal changes always rank
    /// deterministically. `limit` truncates; fewer qualifying records than
    /// `limit` returns them all, with no padding.
    pub fn rank(
        &self,
        records: &[PerformanceRecord],
        by_timeframe: &str,
        direction: Direction,
        limit: usize,
    ) -> Leaderboard {
        self.rank_filtered(records, by_timeframe, direction, limit, |_| true)
    }

    /// Ranks a sub-universe selected by a membership predicate.
    ///
    /// The predicate filters the already-sorted full pool, so a group's
    /// leaderboard is always consistent with the overall ranking: a record
    /// in the overall top-N also leads its group's board.
    pub fn rank_filtered<F>(
        &self,
        records: &[PerformanceRecord],
        by_timeframe: &str,
        direction: Direction,
        limit: usize,
        is_member: F,
    ) -> Leaderboard
    where
        F: Fn(&PerformanceRecord) -> bool,
    {
        let mut qualifying: Vec<&PerformanceRecord> = records
            .iter()
            .filter(|record| record.change(by_timeframe).is_some())
            .collect();

        qualifying.sort_by(|a, b| {
            // Unavailable changes were filtered out above.
            let change_a = a.change(by_timeframe).unwrap_or_default();
            let change_b = b.change(by_timeframe).unwrap_or_default();
            let by_change = match direction {
                Direction::Gainers => change_b.cmp(&change_a),
                Direction::Losers => change_a.cmp(&change_b),
            };
            by_change.then_with(|| a.symbol.cmp(&b.symbol))
        });

        let entries = qualifying
            .into_iter()
            .filter(|record| is_member(record))
            .take(limit)
            .cloned()
            .collect();

        Leaderboard {
            timeframe: by_timeframe.to_string(),
            direction,
            entries,
        }
    }

    /// Market breadth: the fraction of evaluated records with a positive
    /// change, as a percentage rounded to two decimals.
    ///
    /// Records with an unavailable change are excluded from both sides of
    /// the ratio; a pool with zero evaluated records has no breadth rather
    /// than a division fault.
    pub fn breadth(&self, records: &[PerformanceRecord], by_timeframe: &str) -> Option<Decimal> {
        let changes: Vec<Decimal> = records
            .iter()
            .filter_map(|record| record.change(by_timeframe))
            .collect();
        if changes.is_empty() {
            return None;
        }
        let gainers = changes.iter().filter(|c| c.is_sign_positive() && !c.is_zero()).count();
        Some(
            (Decimal::from(gainers) / Decimal::from(changes.len()) * Decimal::ONE_HUNDRED)
                .round_dp(2),
        )
    }

    /// Aggregate counts plus breadth over one record pool.
    pub fn market_stats(&self, records: &[PerformanceRecord], by_timeframe: &str) -> MarketStats {
        let mut evaluated = 0;
        let mut gainers = 0;
        let mut losers = 0;
        for record in records {
            let Some(change) = record.change(by_timeframe) else {
                continue;
            };
            evaluated += 1;
            match change.cmp(&Decimal::ZERO) {
                Ordering::Greater => gainers += 1,
                Ordering::Less => losers += 1,
                Ordering::Equal => {}
            }
        }
        MarketStats {
            tracked: records.len(),
            evaluated,
            gainers,
            losers,
            breadth_pct: self.breadth(records, by_timeframe),
        }
    }
}
