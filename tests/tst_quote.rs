use anyhow::{anyhow, Result};
use async_trait::async_trait;
use short_analyzer::{MarketData, QuoteClient, SymbolInfo};
use std::collections::HashMap;
use std::sync::Arc;

/// Canned history provider: fixed close series per symbol, unknown
/// symbols error like a failed provider lookup.
struct CannedHistory {
    closes: HashMap<String, Vec<f64>>,
}

impl CannedHistory {
    fn new(entries: &[(&str, &[f64])]) -> Arc<Self> {
        Arc::new(Self {
            closes: entries
                .iter()
                .map(|(symbol, closes)| (symbol.to_string(), closes.to_vec()))
                .collect(),
        })
    }
}

#[async_trait]
impl MarketData for CannedHistory {
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<f64>> {
        self.closes
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow!("symbol not found: {}", symbol))
    }

    async fn symbol_info(&self, _symbol: &str) -> Result<SymbolInfo> {
        Err(anyhow!("no info in this fixture"))
    }
}

#[tokio::test]
async fn test_price_message_valid_tickers() {
    let provider = CannedHistory::new(&[
        ("AAPL", &[185.5]),
        ("TSLA", &[250.0]),
        ("GOOG", &[140.25]),
    ]);

    for ticker in ["AAPL", "TSLA", "GOOG"] {
        let client = QuoteClient::new(provider.clone(), ticker);
        let message = client.price_message().await;
        assert!(
            message.contains(&format!("The current price of {}", ticker)),
            "unexpected message: {}",
            message
        );
    }
}

#[tokio::test]
async fn test_price_uses_last_close() {
    let provider = CannedHistory::new(&[("AAPL", &[180.0, 182.5, 185.0, 185.5])]);

    let client = QuoteClient::new(provider, "AAPL");
    assert_eq!(
        client.price_message().await,
        "The current price of AAPL is $185.50"
    );
}

#[tokio::test]
async fn test_ticker_is_uppercased() {
    let provider = CannedHistory::new(&[("AAPL", &[185.5])]);

    let client = QuoteClient::new(provider, "aapl");
    assert_eq!(client.symbol(), "AAPL");
    assert!(client
        .price_message()
        .await
        .contains("The current price of AAPL"));
}

#[tokio::test]
async fn test_price_message_invalid_ticker() {
    let provider = CannedHistory::new(&[]);

    let client = QuoteClient::new(provider, "INVALID_TICKER");
    let message = client.price_message().await;
    assert!(message.contains("Error fetching price"));
    assert!(message.contains("INVALID_TICKER"));
}

#[tokio::test]
async fn test_price_message_empty_ticker() {
    let provider = CannedHistory::new(&[]);

    let client = QuoteClient::new(provider, "");
    assert!(client
        .price_message()
        .await
        .contains("Error fetching price"));
}

#[tokio::test]
async fn test_price_message_empty_history() {
    let provider = CannedHistory::new(&[("AAPL", &[])]);

    let client = QuoteClient::new(provider, "AAPL");
    let outcome = client.latest_close().await;
    assert!(outcome.is_failed());
    assert!(outcome.message().contains("Error fetching price for AAPL"));
}
