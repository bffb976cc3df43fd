//! Fiscal period management.

pub mod calendar;
pub mod period;

pub use calendar::FiscalCalendar;
pub use period::{FiscalPeriod, FiscalPeriodStatus};
