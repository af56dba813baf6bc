use std::time::Duration;

// -----------------------------------------------
// YAHOO FINANCE API ENDPOINTS
// -----------------------------------------------
pub const YAHOO_QUERY_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const YAHOO_CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

// Modules that carry the short-interest bundle. longName and marketCap come
// from `price`, the short fields from `defaultKeyStatistics`, currentPrice
// from `financialData`; `summaryDetail` backfills marketCap for some listings.
pub const QUOTE_SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData";

pub fn chart_url(symbol: &str) -> String {
    format!(
        "{}/v8/finance/chart/{}?range=1d&interval=1d",
        YAHOO_QUERY_BASE_URL,
        urlencoding::encode(symbol)
    )
}

pub fn quote_summary_url(symbol: &str, crumb: &str) -> String {
    format!(
        "{}/v10/finance/quoteSummary/{}?modules={}&crumb={}",
        YAHOO_QUERY_BASE_URL,
        urlencoding::encode(symbol),
        QUOTE_SUMMARY_MODULES,
        urlencoding::encode(crumb)
    )
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// WORKER POOL
// -----------------------------------------------
pub const DEFAULT_MAX_WORKERS: usize = 10;

// -----------------------------------------------
// SHORT INTEREST THRESHOLDS
// -----------------------------------------------
pub const DEFAULT_SHORT_THRESHOLD: f64 = 10.0;
pub const DEMO_HEAVY_THRESHOLD: f64 = 20.0;
pub const DEMO_MIN_SHORT_PERCENT: f64 = 5.0;

// -----------------------------------------------
// DEMO SYMBOLS AND EXPORT
// -----------------------------------------------
pub const DEMO_SYMBOLS: &[&str] = &["GME", "AMC", "TSLA", "AAPL", "MSFT", "NVDA"];
pub const COMPARISON_CSV_PATH: &str = "short_interest_comparison.csv";

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Get the execution mode from environment or default to demo
pub fn get_execution_mode() -> String {
    std::env::var("SHORTS_MODE").unwrap_or_else(|_| "demo".to_string())
}

/// Get the symbol set for comparison runs
pub fn get_symbols() -> Vec<String> {
    match std::env::var("SHORTS_SYMBOLS") {
        Ok(val) if !val.trim().is_empty() => val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => DEMO_SYMBOLS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Get worker pool width, overridable via environment variable
pub fn get_max_workers() -> usize {
    if let Ok(val) = std::env::var("SHORTS_MAX_WORKERS") {
        if let Ok(num) = val.parse::<usize>() {
            return num.clamp(1, 50);
        }
    }

    DEFAULT_MAX_WORKERS
}

/// Get the minimum short percent used by the demo's filtered table
pub fn get_min_short_percent() -> f64 {
    std::env::var("SHORTS_MIN_PERCENT")
        .ok()
        .and_then(|val| val.parse::<f64>().ok())
        .unwrap_or(DEMO_MIN_SHORT_PERCENT)
}
