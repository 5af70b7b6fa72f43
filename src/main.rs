use alerter::MailAlerter;
use alerter::error::AlerterError;
use analytics::{Direction, Leaderboard, PerformanceEngine, PerformanceRanker, PerformanceRecord};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use core_types::Instrument;
use indicatif::{ProgressBar, ProgressStyle};
use insights::{InsightRuleEngine, RuleContext, Severity, roles, signed_pct, stats_keys};
use market_data::{RangeSpec, YahooChartClient, fetch_universe};
use reporter::{IndexComparison, LeaderboardTable, MarketReport};
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// The main entry point for the Meridian report generator.
#[tokio::main]
async fn main() {
    // Mail-relay credentials come from the environment; a .env file is optional.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => {
            if let Err(e) = handle_report(args).await {
                eprintln!("Error generating report: {e}");
                std::process::exit(1);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Computes multi-timeframe market performance and delivers a report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the market performance report and deliver it.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Path to the configuration file, without extension.
    #[arg(long, default_value = "config")]
    config: String,

    /// Compute and print the report without delivering it.
    #[arg(long)]
    dry_run: bool,

    /// Write the assembled report document to a JSON file for an external renderer.
    #[arg(long)]
    json_out: Option<std::path::PathBuf>,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Handles the orchestration of one report run: fetch, evaluate, rank,
/// derive insights, assemble and deliver.
async fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(&args.config)?;
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, "starting report run");

    // --- 1. FETCH ---
    let instruments = config.universe.all();
    let provider = YahooChartClient::new();
    let range = RangeSpec::Period(config.fetch.period.clone());

    let progress_bar = ProgressBar::new(instruments.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let series_by_symbol = fetch_universe(
        &provider,
        &instruments,
        &range,
        config.fetch.concurrency,
        |instrument| {
            progress_bar.set_message(format!("Fetched {}", instrument.symbol));
            progress_bar.inc(1);
        },
    )
    .await;
    progress_bar.finish_with_message("Fetch complete");

    // --- 2. EVALUATE & RANK ---
    let engine = PerformanceEngine::new();
    let ranker = PerformanceRanker::new();
    let records = engine.compute_records(&instruments, &series_by_symbol, &config.timeframes);

    let commodities = symbol_set(&config.universe.commodities);
    let large_caps = symbol_set(&config.universe.large_caps);
    let mid_caps = symbol_set(&config.universe.mid_caps);
    let indices = symbol_set(&config.universe.indices);
    let stocks: HashSet<String> = large_caps.union(&mid_caps).cloned().collect();

    let sizes = &config.leaderboards;
    let top_commodities = ranker.rank_filtered(
        &records,
        "1-week",
        Direction::Gainers,
        sizes.top_commodities,
        |r| commodities.contains(&r.symbol),
    );
    let top_large_caps = ranker.rank_filtered(
        &records,
        "1-day",
        Direction::Gainers,
        sizes.top_large_caps,
        |r| large_caps.contains(&r.symbol),
    );
    let top_mid_caps = ranker.rank_filtered(
        &records,
        "1-day",
        Direction::Gainers,
        sizes.top_mid_caps,
        |r| mid_caps.contains(&r.symbol),
    );
    let bottom_overall = ranker.rank_filtered(
        &records,
        "1-day",
        Direction::Losers,
        sizes.bottom_overall,
        |r| stocks.contains(&r.symbol),
    );
    let top_overall = ranker.rank_filtered(
        &records,
        "1-day",
        Direction::Gainers,
        sizes.top_large_caps,
        |r| stocks.contains(&r.symbol),
    );
    let index_board = ranker.rank_filtered(
        &records,
        "1-week",
        Direction::Gainers,
        config.universe.indices.len(),
        |r| indices.contains(&r.symbol),
    );

    let stock_records: Vec<PerformanceRecord> = records
        .iter()
        .filter(|r| stocks.contains(&r.symbol))
        .cloned()
        .collect();
    let stats = ranker.market_stats(&stock_records, "1-day");

    // --- 3. INSIGHTS ---
    let mut ctx = RuleContext::default();
    ctx.leaderboards
        .insert(roles::TOP_OVERALL.to_string(), top_overall);
    ctx.leaderboards
        .insert(roles::BOTTOM_OVERALL.to_string(), bottom_overall.clone());
    ctx.leaderboards
        .insert(roles::COMMODITIES.to_string(), top_commodities.clone());
    ctx.leaderboards
        .insert(roles::MID_CAPS.to_string(), top_mid_caps.clone());
    ctx.leaderboards
        .insert(roles::INDICES.to_string(), index_board);
    ctx.stats.insert(stats_keys::OVERALL.to_string(), stats.clone());

    let rule_engine = InsightRuleEngine::new(config.thresholds.clone());
    let insights = rule_engine.evaluate(&ctx);

    // --- 4. ASSEMBLE ---
    let index_comparisons: Vec<IndexComparison> = config
        .universe
        .indices
        .iter()
        .filter_map(|instrument| {
            let series = series_by_symbol.get(&instrument.symbol)?;
            Some(IndexComparison {
                name: instrument.name.clone(),
                rows: engine.weekly_comparison(series),
            })
        })
        .collect();

    let mut chart_data = Vec::new();
    for record in &top_commodities.entries {
        if let Some(series) = series_by_symbol.get(&record.symbol) {
            chart_data.push(engine.chart_series(&record.name, series, config.report.chart_bars));
        }
    }
    for instrument in &config.universe.indices {
        if let Some(series) = series_by_symbol.get(&instrument.symbol) {
            chart_data.push(engine.chart_series(&instrument.name, series, config.report.chart_bars));
        }
    }

    let all_timeframes: Vec<String> = config
        .timeframes
        .iter()
        .map(|t| t.name.clone())
        .collect();
    let report = MarketReport {
        generated_on: chrono::Utc::now().date_naive(),
        run_id,
        tables: vec![
            LeaderboardTable {
                title: format!("Top {} Commodity Performers (Week-over-Week)", sizes.top_commodities),
                timeframes: vec!["1-week".to_string()],
                board: top_commodities,
            },
            LeaderboardTable {
                title: format!("Top {} Large Cap Performers (Daily)", sizes.top_large_caps),
                timeframes: all_timeframes.clone(),
                board: top_large_caps,
            },
            LeaderboardTable {
                title: format!("Top {} Mid Cap Performers (Daily)", sizes.top_mid_caps),
                timeframes: vec!["1-day".to_string()],
                board: top_mid_caps,
            },
            LeaderboardTable {
                title: format!("Bottom {} Performers (Daily)", sizes.bottom_overall),
                timeframes: vec!["1-day".to_string()],
                board: bottom_overall,
            },
        ],
        index_comparisons,
        insights,
        stats,
        chart_data,
        charts: Vec::new(),
    };

    print_report(&report);

    if let Some(path) = &args.json_out {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(path = %path.display(), "report document written");
    }

    // --- 5. DELIVER ---
    if args.dry_run {
        tracing::info!("dry run, skipping delivery");
        return Ok(());
    }
    let mailer = MailAlerter::new(&config.mail).ok_or(AlerterError::NotConfigured)?;
    mailer.send_report(&report.subject(), &report.to_html()).await?;
    tracing::info!(%run_id, "report run complete");

    Ok(())
}

/// Collects a universe group into a symbol membership set.
fn symbol_set(instruments: &[Instrument]) -> HashSet<String> {
    instruments
        .iter()
        .map(|instrument| instrument.symbol.clone())
        .collect()
}

// ==============================================================================
// Console Rendering
// ==============================================================================

/// Prints the report's tables and insights to the terminal.
fn print_report(report: &MarketReport) {
    for table in &report.tables {
        println!("\n{}", table.title);
        println!("{}", render_board(&table.board, &table.timeframes));
    }

    println!("\nMarket Insights");
    for insight in &report.insights {
        let tag = match insight.severity {
            Severity::Informational => "[i]",
            Severity::Positive => "[+]",
            Severity::Warning => "[!]",
        };
        println!("  {tag} {}", insight.text);
    }

    let breadth = report
        .stats
        .breadth_pct
        .map(|b| format!("{b}%"))
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "\nTracked {} | advancing {} | declining {} | breadth {}",
        report.stats.tracked, report.stats.gainers, report.stats.losers, breadth
    );
}

/// Renders one leaderboard as a terminal table.
fn render_board(board: &Leaderboard, timeframes: &[String]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["Name".to_string(), "Symbol".to_string(), "Price".to_string()];
    header.extend(timeframes.iter().map(|t| format!("{t} %")));
    table.set_header(header);

    if board.is_empty() {
        table.add_row(vec!["No data available".to_string()]);
        return table;
    }

    for record in &board.entries {
        let mut row = vec![
            record.name.clone(),
            record.symbol.clone(),
            record
                .current_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "N/A".to_string()),
        ];
        row.extend(timeframes.iter().map(|timeframe| {
            record
                .change(timeframe)
                .map(signed_pct)
                .unwrap_or_else(|| "N/A".to_string())
        }));
        table.add_row(row);
    }
    table
}
