use serde::Serialize;

/// Latest closing price for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol: String,
    pub close: f64,
}

/// Short-interest metrics for one symbol. Field renames are the exact
/// column names used for display and CSV export; every metric may be
/// absent upstream.
#[derive(Debug, Clone, Serialize)]
pub struct ShortInterestRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,

    #[serde(rename = "Company")]
    pub company: Option<String>,

    #[serde(rename = "Short Ratio")]
    pub short_ratio: Option<f64>,

    #[serde(rename = "Short % of Float")]
    pub short_percent_of_float: Option<f64>,

    #[serde(rename = "Shares Short")]
    pub shares_short: Option<u64>,

    #[serde(rename = "Shares Short Prior Month")]
    pub shares_short_prior_month: Option<u64>,

    #[serde(rename = "Float")]
    pub float_shares: Option<u64>,

    #[serde(rename = "Market Cap")]
    pub market_cap: Option<u64>,

    #[serde(rename = "Current Price")]
    pub current_price: Option<f64>,
}

// -----------------------------------------------
// TAGGED OUTCOMES
// -----------------------------------------------
// Provider-facing operations never raise to callers; failures travel
// in-band as an explicit variant carrying the user-visible message.

/// Outcome of a price lookup.
#[derive(Debug, Clone)]
pub enum QuoteOutcome {
    Price(PriceQuote),
    Failed(String),
}

impl QuoteOutcome {
    /// Render the user-visible message for this outcome.
    pub fn message(&self) -> String {
        match self {
            QuoteOutcome::Price(quote) => {
                format!("The current price of {} is ${:.2}", quote.symbol, quote.close)
            }
            QuoteOutcome::Failed(msg) => msg.clone(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QuoteOutcome::Failed(_))
    }
}

/// Outcome of a short-interest lookup.
#[derive(Debug, Clone)]
pub enum ShortInterestOutcome {
    Data(ShortInterestRecord),
    Failed(String),
}

impl ShortInterestOutcome {
    pub fn record(&self) -> Option<&ShortInterestRecord> {
        match self {
            ShortInterestOutcome::Data(record) => Some(record),
            ShortInterestOutcome::Failed(_) => None,
        }
    }

    pub fn into_record(self) -> Option<ShortInterestRecord> {
        match self {
            ShortInterestOutcome::Data(record) => Some(record),
            ShortInterestOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ShortInterestOutcome::Failed(_))
    }
}
