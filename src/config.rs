use crate::error::{AppError, Result};
use crate::types::FeeModel;

pub const FINDING_ENDPOINT: &str = "https://svcs.ebay.com/services/search/FindingService/v1";

/// Finding API service version sent with every call.
pub const SERVICE_VERSION: &str = "1.13.0";

/// The Finding API caps paginationInput.entriesPerPage at 100.
pub const MAX_ENTRIES_PER_PAGE: usize = 100;

/// Pause between successive page fetches of the same keyword (rate-limit courtesy).
pub const PAGE_FETCH_PAUSE_MS: u64 = 100;

/// Per-request HTTP timeout (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Acceptance thresholds. Both must hold for a listing to qualify.
pub mod thresholds {
    /// Minimum expected profit in GBP.
    pub const MIN_PROFIT_GBP: f64 = 25.0;
    /// Minimum margin as a fraction of buy price (0.25 = 25%).
    pub const MIN_MARGIN: f64 = 0.25;
}

/// Default fee model values (UK private seller).
pub mod default_fees {
    pub const EBAY_FEE_RATE: f64 = 0.128;
    pub const PAYMENT_FEE_RATE: f64 = 0.029;
    pub const PAYMENT_FIXED_FEE: f64 = 0.30;
    pub const SHIPPING_OUT: f64 = 4.50;
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Finding API application ID (EBAY_APP_ID).
    pub app_id: String,
    /// Search keywords, comma-separated in KEYWORDS.
    pub keywords: Vec<String>,
    /// Marketplace selector (GLOBAL_ID) — EBAY-GB for the UK site.
    pub global_id: String,
    /// Max active listings fetched per keyword (ACTIVE_LIMIT).
    pub active_limit: usize,
    /// Target sold-sample size per keyword (SOLD_LIMIT).
    pub sold_limit: usize,
    /// Completed-listing lookback window in days (LOOKBACK_DAYS).
    pub lookback_days: i64,
    /// CSV output path (OUTPUT).
    pub output: String,
    pub log_level: String,
    pub fees: FeeModel,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app_id: require_app_id(&std::env::var("EBAY_APP_ID").unwrap_or_default())?,
            keywords: require_keywords(&std::env::var("KEYWORDS").unwrap_or_default())?,
            global_id: std::env::var("GLOBAL_ID").unwrap_or_else(|_| "EBAY-GB".to_string()),
            active_limit: parse_or(std::env::var("ACTIVE_LIMIT").ok(), 20),
            sold_limit: parse_or(std::env::var("SOLD_LIMIT").ok(), 120),
            lookback_days: parse_or(std::env::var("LOOKBACK_DAYS").ok(), 90),
            output: std::env::var("OUTPUT").unwrap_or_else(|_| "results.csv".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            fees: FeeModel {
                marketplace_fee_rate: parse_or(
                    std::env::var("EBAY_FEE_RATE").ok(),
                    default_fees::EBAY_FEE_RATE,
                ),
                payment_fee_rate: parse_or(
                    std::env::var("PAYMENT_FEE_RATE").ok(),
                    default_fees::PAYMENT_FEE_RATE,
                ),
                payment_fixed_fee: parse_or(
                    std::env::var("PAYMENT_FIXED_FEE").ok(),
                    default_fees::PAYMENT_FIXED_FEE,
                ),
                outbound_shipping_cost: parse_or(
                    std::env::var("SHIPPING_OUT").ok(),
                    default_fees::SHIPPING_OUT,
                ),
            },
        })
    }
}

/// A blank or whitespace-only application ID is a caller configuration
/// error, caught before any network activity.
fn require_app_id(raw: &str) -> Result<String> {
    let app_id = raw.trim();
    if app_id.is_empty() {
        return Err(AppError::Config(
            "EBAY_APP_ID is not set; a Finding API application ID is required".to_string(),
        ));
    }
    Ok(app_id.to_string())
}

/// Split a comma-separated keyword list, trimming entries and dropping
/// empties. A list with no usable keywords is a configuration error.
fn require_keywords(raw: &str) -> Result<Vec<String>> {
    let keywords: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(AppError::Config(
            "KEYWORDS is empty; provide a comma-separated keyword list".to_string(),
        ));
    }
    Ok(keywords)
}

/// Numeric override with fallback: an unset or malformed value falls
/// back to the default rather than failing the run.
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|s| s.parse::<T>().ok()).unwrap_or(default)
}
