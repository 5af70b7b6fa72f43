use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Fetch, InsightThresholds, Leaderboards, Mail, Report, Universe};

/// Loads the application configuration from a TOML file plus the environment.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, layers `MERIDIAN__`-prefixed environment variables on
/// top (so mail-relay credentials never have to live in the file), then
/// deserializes and validates the result.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        // Environment overrides, e.g. MERIDIAN__MAIL__API_KEY -> mail.api_key.
        .add_source(
            config::Environment::with_prefix("MERIDIAN")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    validate(&config)?;

    Ok(config)
}

/// Rejects configurations the engine cannot run on.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.timeframes.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one timeframe must be configured".to_string(),
        ));
    }
    for timeframe in &config.timeframes {
        timeframe
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    }
    if config.universe.is_empty() {
        return Err(ConfigError::ValidationError(
            "the instrument universe is empty".to_string(),
        ));
    }
    if config.fetch.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "fetch.concurrency must be at least 1".to_string(),
        ));
    }
    if config.report.chart_bars == 0 {
        return Err(ConfigError::ValidationError(
            "report.chart_bars must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Instrument, Timeframe};
    use rust_decimal_macros::dec;

    fn sample_config() -> Config {
        Config {
            fetch: Fetch {
                period: "6mo".to_string(),
                concurrency: 8,
            },
            timeframes: vec![Timeframe::new("1-day", 1), Timeframe::new("1-week", 5)],
            universe: Universe {
                commodities: vec![Instrument::new("Gold", "GC=F")],
                large_caps: vec![Instrument::new("Reliance", "RELIANCE.NS")],
                mid_caps: vec![],
                indices: vec![],
            },
            leaderboards: Leaderboards {
                top_commodities: 5,
                top_large_caps: 10,
                top_mid_caps: 5,
                bottom_overall: 5,
            },
            report: Report { chart_bars: 8 },
            thresholds: InsightThresholds {
                momentum_pct: dec!(3.0),
                selloff_pct: dec!(3.0),
                breadth_advance_pct: dec!(66),
                breadth_decline_pct: dec!(33),
                commodity_move_pct: dec!(5.0),
                midcap_momentum_pct: dec!(2.5),
                index_trend_pct: dec!(2.0),
            },
            mail: Mail::default(),
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(validate(&sample_config()).is_ok());
    }

    #[test]
    fn test_zero_bar_timeframe_is_rejected() {
        let mut config = sample_config();
        config.timeframes.push(Timeframe::new("broken", 0));
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_universe_is_rejected() {
        let mut config = sample_config();
        config.universe.commodities.clear();
        config.universe.large_caps.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_universe_all_deduplicates_symbols() {
        let mut config = sample_config();
        config
            .universe
            .mid_caps
            .push(Instrument::new("Gold again", "GC=F"));
        let all = config.universe.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Gold");
    }
}
