use crate::models::{PriceQuote, QuoteOutcome};
use crate::provider::MarketData;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Price lookup facade over one provider handle and one normalized symbol.
pub struct QuoteClient {
    provider: Arc<dyn MarketData>,
    symbol: String,
}

impl QuoteClient {
    pub fn new(provider: Arc<dyn MarketData>, ticker: &str) -> Self {
        Self {
            provider,
            symbol: normalize_symbol(ticker),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Latest closing price. Every failure (network, unknown symbol,
    /// empty history) is converted into an in-band outcome; callers
    /// never see an Err and nothing is retried.
    pub async fn latest_close(&self) -> QuoteOutcome {
        match self.try_latest_close().await {
            Ok(close) => QuoteOutcome::Price(PriceQuote {
                symbol: self.symbol.clone(),
                close,
            }),
            Err(e) => {
                debug!("Price lookup failed for {}: {}", self.symbol, e);
                QuoteOutcome::Failed(format!(
                    "Error fetching price for {}: {}",
                    self.symbol, e
                ))
            }
        }
    }

    async fn try_latest_close(&self) -> Result<f64> {
        let closes = self.provider.daily_closes(&self.symbol).await?;
        closes
            .last()
            .copied()
            .context("no closing price in one-day history")
    }

    /// Rendered price message.
    pub async fn price_message(&self) -> String {
        self.latest_close().await.message()
    }
}

/// Tickers are compared uppercase; normalize once on construction.
pub fn normalize_symbol(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("aapl"), "AAPL");
        assert_eq!(normalize_symbol("  tsla "), "TSLA");
        assert_eq!(normalize_symbol("BRK.b"), "BRK.B");
        assert_eq!(normalize_symbol(""), "");
    }
}
