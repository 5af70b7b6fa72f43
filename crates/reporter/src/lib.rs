//! # Meridian Reporter
//!
//! Assembles the final report document handed to the delivery collaborator.
//!
//! The `MarketReport` struct is the renderer hand-off contract: it carries
//! ranked leaderboards, insights, aggregate stats and chart series, and it
//! serializes so an external renderer can consume it as JSON. The built-in
//! HTML assembly covers tables and insight lists; chart rasterization stays
//! external, and pre-rendered artifacts are embedded as inline images.

use analytics::{ChartSeries, Leaderboard, MarketStats, WeekdayChange};
use chrono::NaiveDate;
use insights::{Insight, Severity};
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

/// One titled leaderboard section of the report.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardTable {
    pub title: String,
    /// Which timeframe columns to show, in order.
    pub timeframes: Vec<String>,
    pub board: Leaderboard,
}

/// The week-over-week daily comparison for one index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexComparison {
    pub name: String,
    pub rows: Vec<WeekdayChange>,
}

/// A chart pre-rendered by an external rasterizer.
#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub title: String,
    pub png_base64: String,
}

/// The complete input to the report renderer, and the source of the HTML
/// body and subject line for delivery.
#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub generated_on: NaiveDate,
    pub run_id: Uuid,
    pub tables: Vec<LeaderboardTable>,
    pub index_comparisons: Vec<IndexComparison>,
    pub insights: Vec<Insight>,
    pub stats: MarketStats,
    /// Raw close series for charts the renderer may rasterize itself.
    pub chart_data: Vec<ChartSeries>,
    /// Already-rasterized charts to embed inline.
    pub charts: Vec<ChartArtifact>,
}

impl MarketReport {
    /// The delivery subject line.
    pub fn subject(&self) -> String {
        format!(
            "\u{1F4CA} Weekly Market & Commodity Report - {}",
            self.generated_on
        )
    }

    /// Renders the HTML body.
    ///
    /// Sections with no qualifying records degrade to a "No data
    /// available" placeholder; the run itself never fails for lack of
    /// content.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<h2>\u{1F4CA} Weekly Market & Commodity Report</h2>");

        self.write_stats(&mut html);
        self.write_insights(&mut html);
        for table in &self.tables {
            self.write_table(&mut html, table);
        }
        for comparison in &self.index_comparisons {
            self.write_comparison(&mut html, comparison);
        }
        for chart in &self.charts {
            let _ = write!(
                html,
                "<h4>{}</h4><img src='data:image/png;base64,{}' width='700'><br>",
                escape_html(&chart.title),
                chart.png_base64
            );
        }

        let _ = write!(
            html,
            "<p><small>Report run {} generated on {}.</small></p>",
            self.run_id, self.generated_on
        );
        html
    }

    fn write_stats(&self, html: &mut String) {
        let breadth = self
            .stats
            .breadth_pct
            .map(|b| format!("{b}% breadth"))
            .unwrap_or_else(|| "breadth unavailable".to_string());
        let _ = write!(
            html,
            "<p>Tracked {} instruments: {} advancing, {} declining ({}).</p>",
            self.stats.tracked, self.stats.gainers, self.stats.losers, breadth
        );
    }

    fn write_insights(&self, html: &mut String) {
        if self.insights.is_empty() {
            return;
        }
        html.push_str("<h3>Market Insights</h3><ul>");
        for insight in &self.insights {
            let label = match insight.severity {
                Severity::Informational => "Note",
                Severity::Positive => "Positive",
                Severity::Warning => "Warning",
            };
            let _ = write!(
                html,
                "<li><strong>{}:</strong> {}</li>",
                label,
                escape_html(&insight.text)
            );
        }
        html.push_str("</ul>");
    }

    fn write_table(&self, html: &mut String, table: &LeaderboardTable) {
        let _ = write!(html, "<h3>{}</h3>", escape_html(&table.title));
        if table.board.is_empty() {
            html.push_str("<p>No data available</p>");
            return;
        }

        html.push_str("<table border='1' cellpadding='5'><tr><th>Name</th><th>Symbol</th><th>Price</th>");
        for timeframe in &table.timeframes {
            let _ = write!(html, "<th>{} %</th>", escape_html(timeframe));
        }
        html.push_str("</tr>");

        for record in &table.board.entries {
            let price = record
                .current_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "N/A".to_string());
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td>",
                escape_html(&record.name),
                escape_html(&record.symbol),
                price
            );
            for timeframe in &table.timeframes {
                let cell = record
                    .change(timeframe)
                    .map(insights::signed_pct)
                    .unwrap_or_else(|| "N/A".to_string());
                let _ = write!(html, "<td>{cell}</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</table><br>");
    }

    fn write_comparison(&self, html: &mut String, comparison: &IndexComparison) {
        let _ = write!(
            html,
            "<h3>{} Week-over-Week Daily Comparison</h3>",
            escape_html(&comparison.name)
        );
        if comparison.rows.is_empty() {
            html.push_str("<p>No data available</p>");
            return;
        }
        html.push_str("<table border='1' cellpadding='5'><tr><th>Day</th><th>% Change</th></tr>");
        for row in &comparison.rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.weekday),
                insights::signed_pct(row.pct_change)
            );
        }
        html.push_str("</table><br>");
    }
}

/// Minimal escaping for text interpolated into the HTML body.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
