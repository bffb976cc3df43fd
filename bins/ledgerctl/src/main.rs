//! OHADA ledger command-line driver.
//!
//! Replays a scenario of business events through the engine, prints the
//! financial statements of every period as JSON and writes each period's
//! audit file.
//!
//! Usage: ledgerctl <scenario.json> [output-dir]

mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use ohada_core::reports::report_range;
use ohada_core::{LedgerService, ReportService};
use ohada_shared::types::ActorId;
use ohada_shared::{AppConfig, LoggingConfig};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use scenario::Scenario;

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let mut args = std::env::args().skip(1);
    let scenario_path = args
        .next()
        .context("usage: ledgerctl <scenario.json> [output-dir]")?;
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    let raw = std::fs::read_to_string(&scenario_path)
        .with_context(|| format!("cannot read {scenario_path}"))?;
    let scenario = Scenario::from_json(&raw).with_context(|| format!("invalid scenario {scenario_path}"))?;

    let ledger = LedgerService::with_syscohada_chart(config.ledger.clone())?;
    info!(
        currency = %config.ledger.currency,
        policy = ?config.ledger.posting_policy,
        accounts = ledger.chart().len(),
        "Ledger ready"
    );

    let summary = scenario.replay(&ledger, ActorId::new())?;
    let reports = ReportService::new(&ledger);

    let mut statements = Vec::new();
    for period in ledger.calendar().periods() {
        let range = report_range(period.start_date, period.end_date)?;
        statements.push(json!({
            "period": period.code,
            "trial_balance": reports.trial_balance(range),
            "income_statement": reports.income_statement(range),
            "balance_sheet": reports.balance_sheet(range),
            "vat_declaration": reports.vat_declaration(range),
        }));

        let audit = reports.export_audit_file(period.id)?;
        let path = output_dir.join(audit.file_name(&scenario.company_id));
        std::fs::write(&path, audit.render())
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!(period = %period.code, path = %path.display(), rows = audit.rows.len(), "Audit file written");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "posted": summary.posted,
            "skipped": summary.skipped,
            "periods": statements,
        }))?
    );
    Ok(())
}
