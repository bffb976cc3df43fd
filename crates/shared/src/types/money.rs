//! Currency codes and amount formatting.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` throughout.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes used by OHADA member states' bookkeeping.
///
/// The ledger keeps a single functional currency; the others exist so the
/// configured one can be parsed and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// West African CFA franc (UEMOA).
    #[default]
    Xof,
    /// Central African CFA franc (CEMAC).
    Xaf,
    /// Comorian franc.
    Kmf,
    /// Guinean franc.
    Gnf,
    /// Congolese franc.
    Cdf,
    /// Euro
    Eur,
}

/// Formats an amount with exactly two decimals and a comma separator.
///
/// `118000` becomes `"118000,00"`, `-12.345` becomes `"-12,35"`. No thousands
/// separator is emitted.
#[must_use]
pub fn format_comma_decimal(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}").replace('.', ",")
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xof => write!(f, "XOF"),
            Self::Xaf => write!(f, "XAF"),
            Self::Kmf => write!(f, "KMF"),
            Self::Gnf => write!(f, "GNF"),
            Self::Cdf => write!(f, "CDF"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "XOF" => Ok(Self::Xof),
            "XAF" => Ok(Self::Xaf),
            "KMF" => Ok(Self::Kmf),
            "GNF" => Ok(Self::Gnf),
            "CDF" => Ok(Self::Cdf),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
