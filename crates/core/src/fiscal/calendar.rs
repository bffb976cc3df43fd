//! Fiscal calendar: period lifecycle and date resolution.

use chrono::{NaiveDate, Utc};
use ohada_shared::types::{ActorId, DateRange, FiscalPeriodId};
use parking_lot::RwLock;
use tracing::{info, warn};

use super::period::{FiscalPeriod, FiscalPeriodStatus};
use crate::ledger::error::LedgerError;

/// The set of fiscal periods.
///
/// All writes go through one lock, so the "at most one current period, and
/// it is open" rule is enforced in the same critical section that changes
/// any flag.
#[derive(Debug, Default)]
pub struct FiscalCalendar {
    periods: RwLock<Vec<FiscalPeriod>>,
}

impl FiscalCalendar {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new period.
    ///
    /// The period becomes current when no open current period exists.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for inverted dates or a reused code and
    /// `PeriodOverlap` when the range intersects an existing period.
    pub fn open(
        &self,
        code: &str,
        label: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<FiscalPeriod, LedgerError> {
        let range = DateRange::new(start_date, end_date).ok_or_else(|| {
            LedgerError::ValidationFailed(format!(
                "period {code} ends ({end_date}) before it starts ({start_date})"
            ))
        })?;

        let mut periods = self.periods.write();
        if periods.iter().any(|p| p.code == code) {
            return Err(LedgerError::ValidationFailed(format!(
                "period code {code} already exists"
            )));
        }
        if let Some(existing) = periods.iter().find(|p| p.range().overlaps(&range)) {
            return Err(LedgerError::PeriodOverlap {
                code: code.to_string(),
                existing: existing.code.clone(),
            });
        }

        let period = FiscalPeriod {
            id: FiscalPeriodId::new(),
            code: code.to_string(),
            label: label.to_string(),
            start_date,
            end_date,
            status: FiscalPeriodStatus::Open,
            is_current: !periods.iter().any(|p| p.is_current),
            closed_by: None,
            closed_at: None,
        };
        info!(period = %period.code, start = %start_date, end = %end_date, current = period.is_current, "Fiscal period opened");
        periods.push(period.clone());
        Ok(period)
    }

    /// Finds the period a posting dated `date` belongs to.
    ///
    /// Falls back to the current period when no period contains the date.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenPeriod` if nothing matches and `PeriodClosed` if the
    /// matching period is closed.
    pub fn resolve_for_date(&self, date: NaiveDate) -> Result<FiscalPeriod, LedgerError> {
        let periods = self.periods.read();
        let period = periods
            .iter()
            .find(|p| p.contains_date(date))
            .or_else(|| periods.iter().find(|p| p.is_current))
            .ok_or(LedgerError::NoOpenPeriod(date))?;

        if !period.is_open() {
            return Err(LedgerError::PeriodClosed(period.code.clone()));
        }
        Ok(period.clone())
    }

    /// Checks that a period exists and is still open.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` or `PeriodClosed`.
    pub fn ensure_open(&self, id: FiscalPeriodId) -> Result<(), LedgerError> {
        let periods = self.periods.read();
        let period = periods
            .iter()
            .find(|p| p.id == id)
            .ok_or(LedgerError::PeriodNotFound(id))?;
        if period.is_open() {
            Ok(())
        } else {
            Err(LedgerError::PeriodClosed(period.code.clone()))
        }
    }

    /// Closes a period. Irreversible.
    ///
    /// A current period loses its flag when closed.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` or `AlreadyClosed`.
    pub fn close(&self, id: FiscalPeriodId, actor: ActorId) -> Result<FiscalPeriod, LedgerError> {
        let mut periods = self.periods.write();
        let period = periods
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(LedgerError::PeriodNotFound(id))?;

        if !period.is_open() {
            warn!(period = %period.code, "Attempt to close an already closed period");
            return Err(LedgerError::AlreadyClosed(period.code.clone()));
        }

        period.status = FiscalPeriodStatus::Closed;
        period.is_current = false;
        period.closed_by = Some(actor);
        period.closed_at = Some(Utc::now());
        info!(period = %period.code, actor = %actor, "Fiscal period closed");
        Ok(period.clone())
    }

    /// Makes `id` the only current period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, or `PeriodClosed` for a closed period.
    pub fn set_current(&self, id: FiscalPeriodId) -> Result<FiscalPeriod, LedgerError> {
        let mut periods = self.periods.write();
        let target = periods
            .iter()
            .find(|p| p.id == id)
            .ok_or(LedgerError::PeriodNotFound(id))?;
        if !target.is_open() {
            return Err(LedgerError::PeriodClosed(target.code.clone()));
        }

        let mut current = None;
        for period in periods.iter_mut() {
            period.is_current = period.id == id;
            if period.is_current {
                current = Some(period.clone());
            }
        }
        current.ok_or(LedgerError::PeriodNotFound(id))
    }

    /// Looks up a period by id.
    #[must_use]
    pub fn get(&self, id: FiscalPeriodId) -> Option<FiscalPeriod> {
        self.periods.read().iter().find(|p| p.id == id).cloned()
    }

    /// Looks up a period by code.
    #[must_use]
    pub fn get_by_code(&self, code: &str) -> Option<FiscalPeriod> {
        self.periods.read().iter().find(|p| p.code == code).cloned()
    }

    /// The flagged current period, if any.
    #[must_use]
    pub fn current(&self) -> Option<FiscalPeriod> {
        self.periods.read().iter().find(|p| p.is_current).cloned()
    }

    /// All periods ordered by start date.
    #[must_use]
    pub fn periods(&self) -> Vec<FiscalPeriod> {
        let mut periods = self.periods.read().clone();
        periods.sort_by_key(|p| p.start_date);
        periods
    }
}
