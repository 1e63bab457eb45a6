//! Prints the billed intervals and item totals of a saved timesheet session.
//!
//! ```text
//! timesheet-summary [--config PATH] [--session PATH] [--today YYYY-MM-DD]
//! ```
//!
//! Without `--config`, `timesheet.toml` is looked up in the standard
//! locations and built-in defaults are used when none is found.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use ndis_timesheet::db::{FileSessionStore, SessionStore, SessionStoreFactory, StoreType};
use ndis_timesheet::invoice::InvoiceSummary;
use ndis_timesheet::{BillingCodeTable, TimesheetConfig, TimesheetEditor};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    session: Option<PathBuf>,
    today: Option<NaiveDate>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .with_context(|| format!("{} expects a value", flag))
        };
        match flag.as_str() {
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--session" => args.session = Some(PathBuf::from(value()?)),
            "--today" => {
                let raw = value()?;
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("--today expects YYYY-MM-DD, got '{}'", raw))?;
                args.today = Some(date);
            }
            other => bail!(
                "unknown argument '{}'\nusage: timesheet-summary [--config PATH] [--session PATH] [--today YYYY-MM-DD]",
                other
            ),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&PathBuf>) -> Result<TimesheetConfig> {
    match path {
        Some(path) => TimesheetConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(
            TimesheetConfig::from_default_location().unwrap_or_else(|e| {
                warn!("{}; using defaults", e);
                TimesheetConfig::default()
            }),
        ),
    }
}

fn print_summary(summary: &InvoiceSummary) {
    println!(
        "{:<12} {:<18} {:>5} {:>5} {:>7} {:>9} {:>10}",
        "Date", "Item", "Start", "End", "Hours", "Rate", "Cost"
    );
    for line in &summary.lines {
        println!(
            "{:<12} {:<18} {:>5} {:>5} {:>7} {:>9} {:>10}",
            line.date,
            line.item_number,
            line.start_time,
            line.end_time,
            line.hours,
            line.hourly_rate,
            line.cost
        );
    }
    println!();
    println!("{:<18} {:>7} {:>9} {:>10}", "Item", "Hours", "Rate", "Cost");
    for total in &summary.item_totals {
        println!(
            "{:<18} {:>7} {:>9} {:>10}",
            total.item_number, total.hours, total.hourly_rate, total.cost
        );
    }
    println!();
    println!(
        "Total: {} hour(s), {} ({:?} rates)",
        summary.total_hours, summary.total_cost, summary.rate_tier
    );
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;

    let store: Arc<dyn SessionStore> = match &args.session {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None if config.store_type()? == StoreType::Memory => {
            warn!("Session store is in-memory; reading the default session file instead");
            SessionStoreFactory::create(StoreType::File, None)
        }
        None => SessionStoreFactory::from_settings(&config.session)?,
    };

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let table = Arc::new(BillingCodeTable::ndis_default());
    let mut editor = TimesheetEditor::from_config(&config, table, store, today)
        .context("Failed to start timesheet session")?;

    if !editor.restore() {
        info!("No saved session found");
        return Ok(());
    }

    let summary = editor.summary(config.rate_tier()?, config.break_on_day());
    if summary.is_empty() {
        info!("Saved session has no billed time");
        return Ok(());
    }
    print_summary(&summary);
    Ok(())
}
