use core_types::{Instrument, Timeframe};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub fetch: Fetch,
    /// The lookback windows to compute for every instrument, in bar counts.
    pub timeframes: Vec<Timeframe>,
    pub universe: Universe,
    pub leaderboards: Leaderboards,
    pub report: Report,
    pub thresholds: InsightThresholds,
    #[serde(default)]
    pub mail: Mail,
}

/// Parameters for the market-data fetch fan-out.
#[derive(Debug, Clone, Deserialize)]
pub struct Fetch {
    /// Provider period string covering the longest configured lookback (e.g. "6mo").
    pub period: String,
    /// Maximum number of in-flight symbol fetches.
    pub concurrency: usize,
}

/// The tracked instrument universe, split into named groups.
///
/// Group membership only filters leaderboards; every instrument is fetched
/// and evaluated the same way regardless of group.
#[derive(Debug, Clone, Deserialize)]
pub struct Universe {
    pub commodities: Vec<Instrument>,
    pub large_caps: Vec<Instrument>,
    pub mid_caps: Vec<Instrument>,
    pub indices: Vec<Instrument>,
}

impl Universe {
    /// Every configured instrument, de-duplicated by symbol.
    pub fn all(&self) -> Vec<Instrument> {
        let mut seen = HashSet::new();
        self.commodities
            .iter()
            .chain(&self.large_caps)
            .chain(&self.mid_caps)
            .chain(&self.indices)
            .filter(|inst| seen.insert(inst.symbol.clone()))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
            && self.large_caps.is_empty()
            && self.mid_caps.is_empty()
            && self.indices.is_empty()
    }
}

/// How many entries each leaderboard keeps.
#[derive(Debug, Clone, Deserialize)]
pub struct Leaderboards {
    pub top_commodities: usize,
    pub top_large_caps: usize,
    pub top_mid_caps: usize,
    pub bottom_overall: usize,
}

/// Report assembly settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    /// Trailing bars included in each chart series handed to the renderer.
    pub chart_bars: usize,
}

/// Named thresholds for the insight rules, in percentage points.
///
/// Rule logic never hard-codes these; every comparison reads a field here.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightThresholds {
    /// Top overall gainer's 1-day change above this fires the momentum rule.
    pub momentum_pct: Decimal,
    /// Bottom performer's 1-day change below the negation of this fires the sell-off rule.
    pub selloff_pct: Decimal,
    /// Breadth (percent of evaluated instruments up on the day) above this fires the advance rule.
    pub breadth_advance_pct: Decimal,
    /// Breadth below this fires the decline rule.
    pub breadth_decline_pct: Decimal,
    /// Top commodity's absolute 1-week change above this fires the commodity rule.
    pub commodity_move_pct: Decimal,
    /// Top mid-cap's 1-day change above this fires the mid-cap rule.
    pub midcap_momentum_pct: Decimal,
    /// An index's absolute 1-week change above this fires the index rule.
    pub index_trend_pct: Decimal,
}

/// Mail-relay delivery settings. Secrets come from the environment, never
/// from the file; when any required field is blank, delivery is disabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mail {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}
