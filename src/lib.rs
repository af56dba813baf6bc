pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod provider;
pub mod quote;
pub mod short_interest;
pub mod yahoo_client;

// Re-exports (public API)
pub use models::{PriceQuote, QuoteOutcome, ShortInterestOutcome, ShortInterestRecord};
pub use provider::{MarketData, SymbolInfo};
pub use quote::QuoteClient;
pub use short_interest::ShortInterestClient;
pub use yahoo_client::YahooClient;
