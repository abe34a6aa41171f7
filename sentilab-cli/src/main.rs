//! Sentilab CLI — dashboard views in the terminal.
//!
//! Commands:
//! - `show` — load the price series (API, then CSV) plus entity, holdings and insider feeds
//! - `refresh` — load, then force the backend to rebuild its cached series
//! - `tickers` — list tickers with a cached CSV on the backend
//! - `health` — backend liveness

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sentilab_core::coerce::{format_date_label, format_number, format_share, PLACEHOLDER};
use sentilab_core::data::{Backend, Endpoints, FeedFetcher, HttpTransport};
use sentilab_core::SentilabConfig;
use sentilab_runner::{Dashboard, DashboardView, FamilyStatus};

#[derive(Parser)]
#[command(
    name = "sentilab",
    about = "Sentilab CLI — sentiment, market and filings dashboard"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend origin, overriding `api.base_url`.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and print every dashboard panel.
    Show {
        /// Ticker symbol (case-insensitive).
        #[arg(long)]
        ticker: String,

        /// Price period (e.g. 1mo, 6mo, 1y). Defaults to `query.default_period`.
        #[arg(long)]
        period: Option<String>,

        /// Person or organization for news sentiment and 13F holdings.
        #[arg(long)]
        entity: Option<String>,
    },
    /// Load, then ask the backend to rebuild the cached series.
    Refresh {
        #[arg(long)]
        ticker: String,

        #[arg(long)]
        period: Option<String>,
    },
    /// List tickers that have a cached CSV.
    Tickers,
    /// Print backend health.
    Health,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>, api_url: Option<String>) -> Result<SentilabConfig> {
    let mut config = match path {
        Some(p) => SentilabConfig::load(p)
            .with_context(|| format!("loading config from {}", p.display()))?,
        None => SentilabConfig::default(),
    };
    if let Some(url) = api_url {
        config.api.base_url = url;
    }
    config.validate()?;
    debug!(base_url = %config.api.base_url, static_base = config.api.static_base(), "config loaded");
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.api_url)?;

    match cli.command {
        Commands::Show {
            ticker,
            period,
            entity,
        } => run_show(&config, &ticker, period.as_deref(), entity.as_deref()).await,
        Commands::Refresh { ticker, period } => {
            run_refresh(&config, &ticker, period.as_deref()).await
        }
        Commands::Tickers => run_tickers(&config).await,
        Commands::Health => run_health(&config).await,
    }
}

async fn load_dashboard(
    config: &SentilabConfig,
    ticker: &str,
    period: Option<&str>,
    entity: Option<&str>,
) -> Result<Dashboard> {
    let mut dash = Dashboard::connect(config).context("building dashboard")?;
    if let Some(p) = period {
        dash.select_period(p);
    }
    dash.select_ticker(ticker);
    if dash.ticker().is_none() {
        bail!("ticker must not be empty");
    }
    if let Some(name) = entity {
        dash.select_entity(name);
    }
    dash.settle().await;
    Ok(dash)
}

async fn run_show(
    config: &SentilabConfig,
    ticker: &str,
    period: Option<&str>,
    entity: Option<&str>,
) -> Result<()> {
    let dash = load_dashboard(config, ticker, period, entity).await?;
    let view = dash.view();
    print_price(&view);
    print_entity(&view);
    print_holdings(&view);
    print_insiders(&view);
    Ok(())
}

async fn run_refresh(config: &SentilabConfig, ticker: &str, period: Option<&str>) -> Result<()> {
    let mut dash = load_dashboard(config, ticker, period, None).await?;
    let before = dash.view().fingerprint;

    dash.refresh();
    dash.settle().await;

    let view = dash.view();
    print_price(&view);
    println!();
    match (&view.price.error, &view.fingerprint) {
        (Some(e), _) => println!("Refresh failed: {e}"),
        (None, fp) if *fp == before => println!("Refresh complete: series unchanged"),
        (None, _) => println!("Refresh complete: series updated"),
    }
    Ok(())
}

fn feeds(config: &SentilabConfig) -> Result<FeedFetcher> {
    let endpoints = Endpoints::new(&config.api, &config.query)?;
    let transport = HttpTransport::new()?;
    Ok(FeedFetcher::new(Backend::new(Arc::new(transport), endpoints)))
}

async fn run_tickers(config: &SentilabConfig) -> Result<()> {
    let tickers = feeds(config)?
        .tickers()
        .await
        .context("fetching ticker list")?;
    if tickers.is_empty() {
        println!("No cached tickers.");
    }
    for t in tickers {
        println!("{t}");
    }
    Ok(())
}

async fn run_health(config: &SentilabConfig) -> Result<()> {
    let health = feeds(config)?.health().await.context("fetching health")?;
    println!(
        "ok: {}  ts: {}",
        health.ok,
        health.ts.as_deref().unwrap_or(PLACEHOLDER)
    );
    if !health.ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Status line for a panel, or `None` when it has data to show.
fn panel_status(status: &FamilyStatus) -> Option<String> {
    if let Some(e) = &status.error {
        return Some(format!("Error: {e}"));
    }
    if status.loading {
        return Some("Loading…".to_string());
    }
    None
}

fn print_price(view: &DashboardView) {
    let ticker = view.ticker.as_deref().unwrap_or(PLACEHOLDER);
    println!("=== {ticker} ({}) ===", view.period);
    if let Some(status) = panel_status(&view.price) {
        println!("{status}");
        if view.source.is_none() {
            return;
        }
    }

    let source = view
        .source
        .map(|s| s.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let summary = view.analytics.summary.display();
    println!("Source:         {source}");
    println!("Rows:           {}", view.analytics.summary.rows);
    println!("Range:          {}", summary.range);
    println!("Last close:     {}", summary.last_close);
    println!("Total return:   {}", summary.total_return);
    println!("Equity return:  {}", summary.equity_return);
    println!("Last signal:    {}", summary.last_signal);
    println!(
        "Markers:        {} buy / {} sell",
        view.analytics.buys.len(),
        view.analytics.sells.len()
    );
    if let Some(fp) = &view.fingerprint {
        println!("Fingerprint:    {}", fp.short());
    }

    if view.analytics.recent.is_empty() {
        return;
    }
    println!();
    println!(
        "{:<26} {:>10} {:>10} {:>8} {:>10}",
        "Date", "Close", "Sentiment", "Signal", "Equity"
    );
    println!("{}", "-".repeat(68));
    for row in &view.analytics.recent {
        println!(
            "{:<26} {:>10} {:>10} {:>8} {:>10}",
            row.date,
            format_number(row.close),
            format_number(row.sentiment),
            row.signal.as_ref().map(|s| s.as_str()).unwrap_or(PLACEHOLDER),
            format_number(row.equity),
        );
    }
}

fn print_entity(view: &DashboardView) {
    let Some(name) = &view.entity else {
        return;
    };
    println!();
    println!("--- News sentiment: {name} ---");
    if let Some(status) = panel_status(&view.entity_sentiment) {
        println!("{status}");
        return;
    }
    let points = view.entity_projection.points();
    if points.is_empty() {
        println!("No sentiment data.");
        return;
    }
    for p in points {
        println!(
            "{:<6} {:>8}",
            format_date_label(&p.observation.date),
            format_number(Some(p.value))
        );
    }
    let mean = points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64;
    println!("Mean:  {}", format_number(Some(mean)));
}

fn print_holdings(view: &DashboardView) {
    if view.entity.is_none() {
        return;
    }
    println!();
    println!("--- 13F holdings ---");
    if let Some(status) = panel_status(&view.holdings) {
        println!("{status}");
        return;
    }
    let Some(report) = &view.holdings_report else {
        return;
    };
    println!(
        "CIK: {}  Filed: {}",
        report.cik.as_deref().unwrap_or(PLACEHOLDER),
        report.filing_date.as_deref().unwrap_or(PLACEHOLDER)
    );
    let total: f64 = report.holdings.iter().filter_map(|h| h.value).sum();
    for h in &report.holdings {
        let share = h.value.filter(|_| total > 0.0).map(|v| v / total);
        println!(
            "{:<32} {:<10} {:>16} {:>14} {:>8}",
            h.issuer,
            h.title,
            format_number(h.value),
            format_number(h.shares),
            format_share(share),
        );
    }
}

fn print_insiders(view: &DashboardView) {
    println!();
    println!("--- Insider filings (Form 4) ---");
    if let Some(status) = panel_status(&view.insiders) {
        println!("{status}");
        return;
    }
    let Some(report) = &view.insider_report else {
        return;
    };
    if report.filings.is_empty() {
        println!("No recent filings.");
    }
    for f in &report.filings {
        println!(
            "{:<12} {:<22} {}",
            f.filing_date,
            f.accession,
            f.url.as_deref().unwrap_or(&f.document)
        );
    }
}
