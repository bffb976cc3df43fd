//! Fiscal period types.

use chrono::{DateTime, NaiveDate, Utc};
use ohada_shared::types::{ActorId, DateRange, FiscalPeriodId};
use serde::{Deserialize, Serialize};

/// Status of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalPeriodStatus {
    /// Period is open for postings.
    Open,
    /// Period is closed, no new postings allowed. Terminal.
    Closed,
}

/// A bounded accounting interval (usually a fiscal year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Unique identifier.
    pub id: FiscalPeriodId,
    /// Short code (e.g., "FY2026").
    pub code: String,
    /// Display label.
    pub label: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Current status.
    pub status: FiscalPeriodStatus,
    /// Whether this is the flagged current period.
    pub is_current: bool,
    /// Who closed the period.
    pub closed_by: Option<ActorId>,
    /// When the period was closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl FiscalPeriod {
    /// Returns true if postings can target this period.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == FiscalPeriodStatus::Open
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// The period's dates as a range.
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}
