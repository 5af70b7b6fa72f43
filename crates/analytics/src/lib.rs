//! # Meridian Performance Analytics
//!
//! This crate is the core of the report pipeline: it turns raw daily price
//! series into multi-timeframe percentage changes, ranked leaderboards and
//! aggregate market statistics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Unavailability is data, not failure:** an empty series, a short
//!   series or a zero reference price produce `None` metrics that flow
//!   through ranking and reporting as first-class values. The only error
//!   this crate raises is a zero-bar lookback, which is a programming bug.
//! - **Stateless Calculation:** every component is a stateless calculator
//!   over read-only inputs, so identical inputs always produce identical
//!   output.
//!
//! ## Public API
//!
//! - `ChangeCalculator`: percentage changes for arbitrary bar lookbacks.
//! - `PerformanceRanker`: leaderboards, market breadth and aggregate stats.
//! - `PerformanceEngine`: per-run batch evaluation plus the index
//!   week-over-week comparison and chart series extraction.

// Declare the modules that constitute this crate.
pub mod change;
pub mod engine;
pub mod error;
pub mod ranker;
pub mod record;

// Re-export the key components to create a clean, public-facing API.
pub use change::{ChangeCalculator, ChangePoint};
pub use engine::{PerformanceEngine, WeekdayChange};
pub use error::AnalyticsError;
pub use ranker::PerformanceRanker;
pub use record::{ChartSeries, Direction, Leaderboard, MarketStats, PerformanceRecord};
