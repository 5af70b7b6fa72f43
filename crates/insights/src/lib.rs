//! # Meridian Insights
//!
//! A stateless rule engine that reads ranked leaderboards and aggregate
//! market statistics and emits short, human-readable statements about
//! market conditions.
//!
//! ## Architectural Principles
//!
//! - **All rules, every run:** rules are independent and evaluated in a
//!   fixed priority order with no early exit; overlapping statements are
//!   intended. The one unconditional rule is the terminal disclaimer.
//! - **Skip, don't fail:** a rule whose required leaderboard is absent or
//!   empty that run is skipped silently. Evaluation never errors.
//! - **Thresholds are configuration:** every numeric comparison reads a
//!   named field of `InsightThresholds`.

// Declare the modules that make up this crate.
pub mod engine;
pub mod insight;

// Re-export the core types to provide a clean public API.
pub use engine::{InsightRuleEngine, RuleContext, roles, stats_keys};
pub use insight::{Insight, Severity, signed_pct};
