//! Scenario files: fiscal periods to open and business events to replay.

use chrono::NaiveDate;
use ohada_core::LedgerService;
use ohada_core::ledger::BusinessEvent;
use ohada_shared::types::ActorId;
use serde::Deserialize;
use tracing::info;

/// A fiscal period to open before replaying events.
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodSpec {
    /// Period code, e.g. `FY2026`.
    pub code: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

/// Input of one `ledgerctl` run.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Company identifier used in the audit file name.
    pub company_id: String,
    /// Periods, opened in order.
    pub periods: Vec<PeriodSpec>,
    /// Events, replayed in order.
    #[serde(default)]
    pub events: Vec<BusinessEvent>,
}

/// Outcome of a replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events that produced an entry.
    pub posted: usize,
    /// Events whose posting failed under the lenient policy.
    pub skipped: usize,
}

impl Scenario {
    /// Parses a scenario from JSON.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Opens the periods and replays every event.
    ///
    /// Under the strict posting policy the first failing event aborts the run.
    pub fn replay(&self, ledger: &LedgerService, actor: ActorId) -> anyhow::Result<ReplaySummary> {
        for period in &self.periods {
            let label = if period.label.is_empty() { &period.code } else { &period.label };
            ledger.open_period(&period.code, label, period.start, period.end)?;
        }

        let mut summary = ReplaySummary::default();
        for event in &self.events {
            match ledger.handle_event(event, actor)? {
                Some(_) => summary.posted += 1,
                None => summary.skipped += 1,
            }
        }
        info!(posted = summary.posted, skipped = summary.skipped, "Scenario replayed");
        Ok(summary)
    }
}
