use crate::config;
use crate::models::{ShortInterestOutcome, ShortInterestRecord};
use crate::provider::MarketData;
use crate::quote::normalize_symbol;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Short-interest retrieval, formatting and cross-symbol comparison.
pub struct ShortInterestClient {
    provider: Arc<dyn MarketData>,
}

impl ShortInterestClient {
    pub fn new(provider: Arc<dyn MarketData>) -> Self {
        Self { provider }
    }

    // -----------------------------------------------
    // SINGLE SYMBOL
    // -----------------------------------------------

    /// Fetch the short-interest record for one symbol. Failures travel
    /// in-band; missing individual metrics are None, not errors.
    pub async fn fetch(&self, ticker: &str) -> ShortInterestOutcome {
        let symbol = normalize_symbol(ticker);

        match self.provider.symbol_info(&symbol).await {
            Ok(info) => ShortInterestOutcome::Data(ShortInterestRecord {
                symbol,
                company: info.long_name,
                short_ratio: info.short_ratio,
                short_percent_of_float: info.short_percent_of_float,
                shares_short: info.shares_short,
                shares_short_prior_month: info.shares_short_prior_month,
                float_shares: info.float_shares,
                market_cap: info.market_cap,
                current_price: info.current_price,
            }),
            Err(e) => ShortInterestOutcome::Failed(format!(
                "Error getting short interest data for {}: {}",
                symbol, e
            )),
        }
    }

    /// Human-readable summary; an error outcome yields its message verbatim.
    pub async fn summary(&self, ticker: &str) -> String {
        match self.fetch(ticker).await {
            ShortInterestOutcome::Data(record) => render_summary(&record),
            ShortInterestOutcome::Failed(msg) => msg,
        }
    }

    /// True iff the lookup succeeded, short % of float is present and it
    /// is at or above the threshold.
    pub async fn is_heavily_shorted(&self, ticker: &str, threshold: f64) -> bool {
        match self.fetch(ticker).await {
            ShortInterestOutcome::Data(record) => record
                .short_percent_of_float
                .is_some_and(|pct| pct >= threshold),
            ShortInterestOutcome::Failed(_) => false,
        }
    }

    // -----------------------------------------------
    // BATCH COMPARISON WITH CONCURRENCY CONTROL
    // -----------------------------------------------

    /// One lookup per symbol, at most `max_workers` in flight. Failed and
    /// absent entries are dropped, never aborting the batch; the survivors
    /// are sorted descending by short % of float with missing values last.
    pub async fn compare(
        &self,
        symbols: &[String],
        max_workers: usize,
    ) -> Vec<ShortInterestRecord> {
        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut handles = vec![];

        for symbol in symbols {
            let provider = Arc::clone(&self.provider);
            let sem = Arc::clone(&semaphore);
            let symbol = symbol.clone();

            let handle = tokio::spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|e| anyhow::anyhow!("Semaphore error: {}", e))?;

                // Each worker gets its own facade around the shared handle
                let client = ShortInterestClient::new(provider);
                Ok::<_, anyhow::Error>(client.fetch(&symbol).await)
            });

            handles.push(handle);
        }

        let mut records = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Ok(ShortInterestOutcome::Data(record))) => records.push(record),
                Ok(Ok(ShortInterestOutcome::Failed(msg))) => {
                    debug!("Dropping failed lookup: {}", msg);
                }
                Ok(Err(e)) => debug!("Dropping lookup: {}", e),
                Err(e) => debug!("Dropping panicked lookup task: {}", e),
            }
        }

        sort_by_short_percent(&mut records);
        records
    }

    /// Comparison filtered to rows at or above `min_short_percent`,
    /// preserving the comparison's sort order.
    pub async fn find_high(
        &self,
        symbols: &[String],
        min_short_percent: f64,
    ) -> Vec<ShortInterestRecord> {
        let mut records = self.compare(symbols, config::DEFAULT_MAX_WORKERS).await;
        records.retain(|r| {
            r.short_percent_of_float
                .is_some_and(|pct| pct >= min_short_percent)
        });
        records
    }
}

// -----------------------------------------------
// SORTING AND FORMATTING
// -----------------------------------------------

/// Descending by short % of float; rows without a value sort after every
/// row that has one. Stable for ties.
pub fn sort_by_short_percent(records: &mut [ShortInterestRecord]) {
    records.sort_by(|a, b| {
        match (a.short_percent_of_float, b.short_percent_of_float) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Multi-line short-interest report for one record.
pub fn render_summary(record: &ShortInterestRecord) -> String {
    let mut summary = format!("\n--- Short Interest Summary for {} ---\n", record.symbol);
    summary.push_str(&format!(
        "Company: {}\n",
        record.company.as_deref().unwrap_or("N/A")
    ));

    match record.short_percent_of_float {
        Some(pct) => summary.push_str(&format!("Short % of Float: {:.2}%\n", pct)),
        None => summary.push_str("Short % of Float: N/A\n"),
    }

    match record.short_ratio {
        Some(ratio) => summary.push_str(&format!("Short Ratio (Days to Cover): {:.2}\n", ratio)),
        None => summary.push_str("Short Ratio: N/A\n"),
    }

    match record.shares_short {
        Some(shares) => summary.push_str(&format!("Shares Short: {}\n", group_thousands(shares))),
        None => summary.push_str("Shares Short: N/A\n"),
    }

    match record.float_shares {
        Some(shares) => summary.push_str(&format!("Float: {}\n", group_thousands(shares))),
        None => summary.push_str("Float: N/A\n"),
    }

    summary
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}
