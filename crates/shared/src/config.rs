//! Application configuration management.
//!
//! All tunables live here and are passed into components at construction
//! time — there is no process-wide mutable singleton. Reconciliation scoring
//! weights, the auto-match threshold and the retention period are deliberate
//! configuration, not hard-coded constants.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Document numbering configuration.
    #[serde(default)]
    pub numbering: NumberingConfig,
    /// Bank reconciliation configuration.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// Retention and compliance-export configuration.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Document storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_database_url() -> String {
    "postgres://localhost/kontor".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// Document numbering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberingConfig {
    /// Prefix for invoice numbers.
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
    /// Prefix for credit note numbers.
    #[serde(default = "default_credit_note_prefix")]
    pub credit_note_prefix: String,
    /// Prefix for quote numbers.
    #[serde(default = "default_quote_prefix")]
    pub quote_prefix: String,
    /// Minimum width of the zero-padded sequential part.
    #[serde(default = "default_pad_width")]
    pub pad_width: usize,
}

fn default_invoice_prefix() -> String {
    "RE".to_string()
}

fn default_credit_note_prefix() -> String {
    "GS".to_string()
}

fn default_quote_prefix() -> String {
    "AN".to_string()
}

fn default_pad_width() -> usize {
    4
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: default_invoice_prefix(),
            credit_note_prefix: default_credit_note_prefix(),
            quote_prefix: default_quote_prefix(),
            pad_width: default_pad_width(),
        }
    }
}

/// Bank reconciliation configuration.
///
/// Confidence is the sum of earned weights, capped at 1. The defaults put a
/// textual reference hit plus an exact amount match at exactly the auto-match
/// threshold; anything weaker is surfaced as a suggestion only.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Weight earned when the document number appears in the transaction
    /// purpose text.
    #[serde(default = "default_reference_weight")]
    pub reference_weight: Decimal,
    /// Weight earned by an exact amount match.
    #[serde(default = "default_exact_amount_weight")]
    pub exact_amount_weight: Decimal,
    /// Weight earned by an amount match within `amount_tolerance`.
    #[serde(default = "default_approx_amount_weight")]
    pub approx_amount_weight: Decimal,
    /// Weight earned when the document date falls within `date_window_days`
    /// of the booking date.
    #[serde(default = "default_date_weight")]
    pub date_weight: Decimal,
    /// Relative tolerance for the approximate amount match (0.01 = 1%).
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: Decimal,
    /// Window, in days, for the date-proximity signal.
    #[serde(default = "default_date_window_days")]
    pub date_window_days: i64,
    /// Minimum confidence required for automatic matching.
    #[serde(default = "default_auto_match_threshold")]
    pub auto_match_threshold: Decimal,
}

fn default_reference_weight() -> Decimal {
    Decimal::new(50, 2) // 0.50
}

fn default_exact_amount_weight() -> Decimal {
    Decimal::new(40, 2) // 0.40
}

fn default_approx_amount_weight() -> Decimal {
    Decimal::new(20, 2) // 0.20
}

fn default_date_weight() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

fn default_amount_tolerance() -> Decimal {
    Decimal::new(1, 2) // 1%
}

fn default_date_window_days() -> i64 {
    14
}

fn default_auto_match_threshold() -> Decimal {
    Decimal::new(90, 2) // 0.90
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            reference_weight: default_reference_weight(),
            exact_amount_weight: default_exact_amount_weight(),
            approx_amount_weight: default_approx_amount_weight(),
            date_weight: default_date_weight(),
            amount_tolerance: default_amount_tolerance(),
            date_window_days: default_date_window_days(),
            auto_match_threshold: default_auto_match_threshold(),
        }
    }
}

/// Retention and compliance-export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// Statutory retention period in years, measured from the end of the
    /// calendar year of deletion.
    #[serde(default = "default_retention_years")]
    pub retention_years: i32,
    /// Compliance standard named in export manifests.
    #[serde(default = "default_compliance_standard")]
    pub compliance_standard: String,
}

fn default_retention_years() -> i32 {
    10
}

fn default_compliance_standard() -> String {
    "GoBD".to_string()
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_years: default_retention_years(),
            compliance_standard: default_compliance_standard(),
        }
    }
}

/// Document storage configuration.
///
/// A flat, environment-friendly section; the storage layer validates it and
/// turns it into a typed provider at construction time. The `s3` backend
/// requires the endpoint, bucket, region and credential fields.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend: `fs` (local filesystem) or `s3`.
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Root directory for the `fs` backend.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// S3 endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// S3 region.
    #[serde(default)]
    pub region: Option<String>,
    /// S3 access key id.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// S3 secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Per-operation timeout in seconds.
    #[serde(default = "default_storage_timeout_secs")]
    pub operation_timeout_secs: u64,
}

fn default_storage_backend() -> String {
    "fs".to_string()
}

fn default_storage_root() -> String {
    "./storage".to_string()
}

fn default_storage_timeout_secs() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            root: default_storage_root(),
            endpoint: None,
            bucket: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            operation_timeout_secs: default_storage_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KONTOR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
