use crate::insight::{Insight, Severity, signed_pct};
use analytics::{Leaderboard, MarketStats};
use configuration::InsightThresholds;
use std::collections::BTreeMap;

/// Well-known leaderboard role names shared between the orchestrator and
/// the rules that read them.
pub mod roles {
    /// All stocks ranked by 1-day change, best first.
    pub const TOP_OVERALL: &str = "top_overall";
    /// All stocks ranked by 1-day change, worst first.
    pub const BOTTOM_OVERALL: &str = "bottom_overall";
    /// Commodities ranked by 1-week change.
    pub const COMMODITIES: &str = "commodities";
    /// Mid-caps ranked by 1-day change. Optional: absent when no mid-cap
    /// universe is configured for the run.
    pub const MID_CAPS: &str = "mid_caps";
    /// Indices ranked by 1-week change.
    pub const INDICES: &str = "indices";
}

/// Well-known aggregate-stat keys.
pub mod stats_keys {
    /// Stats over the full evaluated stock pool.
    pub const OVERALL: &str = "overall";
}

/// The ranked inputs one evaluation pass reads.
///
/// Both maps are ordered so that evaluation over identical inputs walks
/// identical sequences; the engine has no other state.
#[derive(Debug, Default, Clone)]
pub struct RuleContext {
    pub leaderboards: BTreeMap<String, Leaderboard>,
    pub stats: BTreeMap<String, MarketStats>,
}

impl RuleContext {
    fn board(&self, role: &str) -> Option<&Leaderboard> {
        self.leaderboards.get(role).filter(|board| !board.is_empty())
    }
}

/// Evaluates the fixed rule set over ranked performance data.
pub struct InsightRuleEngine {
    thresholds: InsightThresholds,
}

impl InsightRuleEngine {
    pub fn new(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    /// Runs every rule in priority order and returns the rendered insights.
    ///
    /// Rules whose required inputs are missing are skipped silently. The
    /// terminal disclaimer is unconditional and always last.
    pub fn evaluate(&self, ctx: &RuleContext) -> Vec<Insight> {
        let mut insights = Vec::new();

        self.momentum_rule(ctx, &mut insights);
        self.selloff_rule(ctx, &mut insights);
        self.breadth_advance_rule(ctx, &mut insights);
        self.breadth_decline_rule(ctx, &mut insights);
        self.commodity_rule(ctx, &mut insights);
        self.midcap_rule(ctx, &mut insights);
        self.index_trend_rule(ctx, &mut insights);

        insights.push(Insight::new(
            Severity::Informational,
            "This report is generated automatically for informational purposes only \
             and does not constitute investment advice.",
        ));

        tracing::debug!(count = insights.len(), "insight evaluation complete");
        insights
    }

    /// Fires when the strongest stock of the day clears the momentum bar.
    fn momentum_rule(&self, ctx: &RuleContext, out: &mut Vec<Insight>) {
        let Some(top) = ctx.board(roles::TOP_OVERALL).and_then(|b| b.top()) else {
            return;
        };
        let Some(change) = top.change("1-day") else {
            return;
        };
        if change > self.thresholds.momentum_pct {
            out.push(Insight::new(
                Severity::Positive,
                format!(
                    "Strong momentum: {} leads the market with a {} move on the day.",
                    top.name,
                    signed_pct(change)
                ),
            ));
        }
    }

    /// Fires when the weakest stock of the day breaches the sell-off bar.
    fn selloff_rule(&self, ctx: &RuleContext, out: &mut Vec<Insight>) {
        let Some(bottom) = ctx.board(roles::BOTTOM_OVERALL).and_then(|b| b.top()) else {
            return;
        };
        let Some(change) = bottom.change("1-day") else {
            return;
        };
        if change < -self.thresholds.selloff_pct {
            out.push(Insight::new(
                Severity::Warning,
                format!(
                    "Heavy selling in {}: {} on the day.",
                    bottom.name,
                    signed_pct(change)
                ),
            ));
        }
    }

    fn breadth_advance_rule(&self, ctx: &RuleContext, out: &mut Vec<Insight>) {
        let Some(stats) = ctx.stats.get(stats_keys::OVERALL) else {
            return;
        };
        let Some(breadth) = stats.breadth_pct else {
            return;
        };
        if breadth > self.thresholds.breadth_advance_pct {
            out.push(Insight::new(
                Severity::Positive,
                format!(
                    "Broad-based advance: {} of {} evaluated instruments closed higher ({}% breadth).",
                    stats.gainers, stats.evaluated, breadth
                ),
            ));
        }
    }

    fn breadth_decline_rule(&self, ctx: &RuleContext, out: &mut Vec<Insight>) {
        let Some(stats) = ctx.stats.get(stats_keys::OVERALL) else {
            return;
        };
        let Some(breadth) = stats.breadth_pct else {
            return;
        };
        if breadth < self.thresholds.breadth_decline_pct {
            out.push(Insight::new(
                Severity::Warning,
                format!(
                    "Broad-based decline: only {} of {} evaluated instruments closed higher ({}% breadth).",
                    stats.gainers, stats.evaluated, breadth
                ),
            ));
        }
    }

    /// Fires on an outsized weekly move in the leading commodity, in
    /// either direction.
    fn commodity_rule(&self, ctx: &RuleContext, out: &mut Vec<Insight>) {
        let Some(top) = ctx.board(roles::COMMODITIES).and_then(|b| b.top()) else {
            return;
        };
        let Some(change) = top.change("1-week") else {
            return;
        };
        if change.abs() > self.thresholds.commodity_move_pct {
            let (severity, verb) = if change.is_sign_positive() {
                (Severity::Positive, "gained")
            } else {
                (Severity::Warning, "lost")
            };
            out.push(Insight::new(
                severity,
                format!(
                    "Commodity watch: {} {} {} over the week.",
                    top.name,
                    verb,
                    signed_pct(change)
                ),
            ));
        }
    }

    /// Mid-cap strength. Skipped silently when no mid-cap leaderboard was
    /// provided for the run.
    fn midcap_rule(&self, ctx: &RuleContext, out: &mut Vec<Insight>) {
        let Some(top) = ctx.board(roles::MID_CAPS).and_then(|b| b.top()) else {
            return;
        };
        let Some(change) = top.change("1-day") else {
            return;
        };
        if change > self.thresholds.midcap_momentum_pct {
            out.push(Insight::new(
                Severity::Positive,
                format!(
                    "Mid-cap strength: {} up {} on the day.",
                    top.name,
                    signed_pct(change)
                ),
            ));
        }
    }

    /// Reports the largest week-over-week index move when it clears the
    /// trend bar.
    fn index_trend_rule(&self, ctx: &RuleContext, out: &mut Vec<Insight>) {
        let Some(board) = ctx.board(roles::INDICES) else {
            return;
        };
        let largest = board
            .entries
            .iter()
            .filter_map(|record| record.change("1-week").map(|change| (record, change)))
            .max_by_key(|(_, change)| change.abs());
        let Some((record, change)) = largest else {
            return;
        };
        if change.abs() > self.thresholds.index_trend_pct {
            out.push(Insight::new(
                Severity::Informational,
                format!(
                    "Index watch: {} moved {} week-over-week, the largest move among tracked indices.",
                    record.name,
                    signed_pct(change)
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{Direction, PerformanceRecord};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn thresholds() -> InsightThresholds {
        InsightThresholds {
            momentum_pct: dec!(3.0),
            selloff_pct: dec!(3.0),
            breadth_advance_pct: dec!(66),
            breadth_decline_pct: dec!(33),
            commodity_move_pct: dec!(5.0),
            midcap_momentum_pct: dec!(2.5),
            index_trend_pct: dec!(2.0),
        }
    }

    fn record(name: &str, timeframe: &str, change: Decimal) -> PerformanceRecord {
        let mut changes = BTreeMap::new();
        changes.insert(timeframe.to_string(), Some(change));
        PerformanceRecord {
            name: name.to_string(),
            symbol: name.to_string(),
            current_price: Some(dec!(100)),
            changes,
        }
    }

    fn board(timeframe: &str, direction: Direction, entries: Vec<PerformanceRecord>) -> Leaderboard {
        Leaderboard {
            timeframe: timeframe.to_string(),
            direction,
            entries,
        }
    }

    fn ctx_with_top_gainer(change: Decimal) -> RuleContext {
        let mut ctx = RuleContext::default();
        ctx.leaderboards.insert(
            roles::TOP_OVERALL.to_string(),
            board(
                "1-day",
                Direction::Gainers,
                vec![record("TCS", "1-day", change)],
            ),
        );
        ctx
    }

    #[test]
    fn test_momentum_rule_fires_with_rendered_sign() {
        let engine = InsightRuleEngine::new(thresholds());
        let insights = engine.evaluate(&ctx_with_top_gainer(dec!(4.2)));

        let momentum: Vec<&Insight> = insights
            .iter()
            .filter(|i| i.text.contains("Strong momentum"))
            .collect();
        assert_eq!(momentum.len(), 1);
        assert!(momentum[0].text.contains("+4.20%"));
        assert_eq!(momentum[0].severity, Severity::Positive);
    }

    #[test]
    fn test_momentum_rule_holds_below_threshold() {
        let engine = InsightRuleEngine::new(thresholds());
        let insights = engine.evaluate(&ctx_with_top_gainer(dec!(2.9)));
        assert!(!insights.iter().any(|i| i.text.contains("Strong momentum")));
    }

    #[test]
    fn test_disclaimer_is_always_present_and_last() {
        let engine = InsightRuleEngine::new(thresholds());

        let on_empty = engine.evaluate(&RuleContext::default());
        assert_eq!(on_empty.len(), 1);
        assert!(on_empty[0].text.contains("informational purposes"));

        let on_active = engine.evaluate(&ctx_with_top_gainer(dec!(9.9)));
        assert!(on_active.len() > 1);
        assert!(
            on_active
                .last()
                .unwrap()
                .text
                .contains("informational purposes")
        );
    }

    #[test]
    fn test_absent_midcap_board_only_skips_the_midcap_rule() {
        let engine = InsightRuleEngine::new(thresholds());
        let mut with_mids = ctx_with_top_gainer(dec!(4.2));
        with_mids.leaderboards.insert(
            roles::MID_CAPS.to_string(),
            board(
                "1-day",
                Direction::Gainers,
                vec![record("PIIND", "1-day", dec!(3.1))],
            ),
        );
        let without_mids = ctx_with_top_gainer(dec!(4.2));

        let full = engine.evaluate(&with_mids);
        let reduced = engine.evaluate(&without_mids);

        assert!(full.iter().any(|i| i.text.contains("Mid-cap strength")));
        let survived: Vec<&Insight> = full
            .iter()
            .filter(|i| !i.text.contains("Mid-cap strength"))
            .collect();
        assert_eq!(survived.len(), reduced.len());
        for (a, b) in survived.iter().zip(reduced.iter()) {
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn test_selloff_rule_reads_bottom_board() {
        let engine = InsightRuleEngine::new(thresholds());
        let mut ctx = RuleContext::default();
        ctx.leaderboards.insert(
            roles::BOTTOM_OVERALL.to_string(),
            board(
                "1-day",
                Direction::Losers,
                vec![record("GICRE", "1-day", dec!(-3.4))],
            ),
        );
        let insights = engine.evaluate(&ctx);
        let selloff = insights
            .iter()
            .find(|i| i.text.contains("Heavy selling"))
            .unwrap();
        assert!(selloff.text.contains("-3.40%"));
        assert_eq!(selloff.severity, Severity::Warning);
    }

    #[test]
    fn test_breadth_rules_read_overall_stats() {
        let engine = InsightRuleEngine::new(thresholds());
        let mut ctx = RuleContext::default();
        ctx.stats.insert(
            stats_keys::OVERALL.to_string(),
            MarketStats {
                tracked: 16,
                evaluated: 15,
                gainers: 12,
                losers: 2,
                breadth_pct: Some(dec!(80.00)),
            },
        );
        let insights = engine.evaluate(&ctx);
        let advance = insights
            .iter()
            .find(|i| i.text.contains("Broad-based advance"))
            .unwrap();
        assert!(advance.text.contains("12 of 15"));
        assert!(!insights.iter().any(|i| i.text.contains("Broad-based decline")));
    }

    #[test]
    fn test_index_rule_reports_single_largest_move() {
        let engine = InsightRuleEngine::new(thresholds());
        let mut ctx = RuleContext::default();
        ctx.leaderboards.insert(
            roles::INDICES.to_string(),
            board(
                "1-week",
                Direction::Gainers,
                vec![
                    record("NIFTY", "1-week", dec!(2.1)),
                    record("SENSEX", "1-week", dec!(-2.8)),
                ],
            ),
        );
        let insights = engine.evaluate(&ctx);
        let index_watch: Vec<&Insight> = insights
            .iter()
            .filter(|i| i.text.contains("Index watch"))
            .collect();
        assert_eq!(index_watch.len(), 1);
        assert!(index_watch[0].text.contains("SENSEX"));
        assert!(index_watch[0].text.contains("-2.80%"));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let engine = InsightRuleEngine::new(thresholds());
        let ctx = ctx_with_top_gainer(dec!(4.2));
        assert_eq!(engine.evaluate(&ctx), engine.evaluate(&ctx));
    }
}
