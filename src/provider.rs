use anyhow::Result;
use async_trait::async_trait;

/// Per-symbol metadata bundle exposed by a market-data source.
/// Any field may be missing for a given listing.
#[derive(Debug, Clone, Default)]
pub struct SymbolInfo {
    pub long_name: Option<String>,
    pub short_ratio: Option<f64>,
    pub short_percent_of_float: Option<f64>,
    pub shares_short: Option<u64>,
    pub shares_short_prior_month: Option<u64>,
    pub float_shares: Option<u64>,
    pub market_cap: Option<u64>,
    pub current_price: Option<f64>,
}

/// Market-data source. Implementations are shared across worker tasks,
/// so they must be immutable from the caller's point of view.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Closing prices from the most recent one-day history, in
    /// chronological order. May be empty when the market has no data.
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<f64>>;

    /// Metadata bundle for a symbol, with missing fields as `None`.
    async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo>;
}
