//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Functional currency of the books.
    #[serde(default)]
    pub currency: Currency,
    /// What happens when automatic posting of a business event fails.
    #[serde(default)]
    pub posting_policy: PostingPolicy,
    /// Account codes used by the automatic posting rules.
    #[serde(default)]
    pub accounts: AccountMapping,
}

/// Behavior when an automatic posting fails while finalizing a business event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingPolicy {
    /// The posting error is returned and the triggering operation must abort.
    Strict,
    /// The posting error is logged and the triggering operation completes.
    #[default]
    Lenient,
}

/// Account codes targeted by the automatic posting rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountMapping {
    /// Customer receivables.
    pub receivable: String,
    /// Sales revenue.
    pub revenue: String,
    /// VAT collected on sales.
    pub vat_collected: String,
    /// Supplier payables.
    pub payable: String,
    /// Purchases expense.
    pub purchases: String,
    /// Deductible VAT on purchases.
    pub vat_deductible: String,
    /// Bank account (cheque, transfer, card).
    pub bank: String,
    /// Cash on hand.
    pub cash: String,
    /// Mobile money wallet.
    pub mobile_money: String,
}

impl Default for AccountMapping {
    fn default() -> Self {
        Self {
            receivable: "411".to_string(),
            revenue: "701".to_string(),
            vat_collected: "4431".to_string(),
            payable: "401".to_string(),
            purchases: "601".to_string(),
            vat_deductible: "4452".to_string(),
            bank: "521".to_string(),
            cash: "571".to_string(),
            mobile_money: "552".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "ohada=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/<RUN_MODE>`,
    /// then `OHADA__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("OHADA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
