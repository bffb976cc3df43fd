//! Common types used across the application.

pub mod id;
pub mod money;
pub mod range;

pub use id::*;
pub use money::{Currency, format_comma_decimal};
pub use range::DateRange;
