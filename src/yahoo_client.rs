use crate::config;
use crate::provider::{MarketData, SymbolInfo};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

// -----------------------------------------------
// CLIENT WRAPPER WITH SESSION STATE
// -----------------------------------------------
pub struct YahooClient {
    client: Client,
    session: RwLock<Option<Session>>,
}

// Yahoo rejects quoteSummary calls without a consent cookie and a
// matching crumb; both are fetched lazily and reused for the client's
// lifetime.
#[derive(Debug, Clone)]
struct Session {
    cookie: String,
    crumb: String,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            session: RwLock::new(None),
        })
    }

    /// Establish the cookie + crumb session (only once per client)
    async fn session_if_needed(&self) -> Result<Session> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut guard = self.session.write().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        let res = self
            .client
            .get(config::YAHOO_COOKIE_URL)
            .send()
            .await
            .context("Failed to fetch Yahoo consent cookie")?;

        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .context("No session cookie in Yahoo response")?;

        let crumb = self
            .client
            .get(config::YAHOO_CRUMB_URL)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .context("Failed to fetch Yahoo crumb")?
            .text()
            .await
            .context("Failed to read Yahoo crumb")?;

        // A failed crumb request returns a JSON error body, not a token
        if crumb.is_empty() || crumb.contains('{') {
            let preview: String = crumb.chars().take(80).collect();
            anyhow::bail!("Unusable Yahoo crumb: {}", preview);
        }

        let session = Session { cookie, crumb };
        *guard = Some(session.clone());
        debug!("Yahoo session established");

        Ok(session)
    }

    async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// Single-attempt fetch with response validation
    async fn fetch_json(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("Request send failed")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            anyhow::bail!("HTTP error {}: {}", status, preview);
        }

        let text = res.text().await.context("Failed to read body")?;

        // Validate JSON
        let trimmed = text.trim();
        if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            let preview: String = text.chars().take(200).collect();
            anyhow::bail!("Non-JSON response: {}", preview);
        }

        Ok(text)
    }

    // -----------------------------------------------
    // CHART: MOST RECENT ONE-DAY HISTORY
    // -----------------------------------------------
    async fn fetch_daily_chart(&self, symbol: &str) -> Result<ChartResponse> {
        let url = config::chart_url(symbol);
        let text = self.fetch_json(&url).await?;

        serde_json::from_str(&text).context("Failed to parse chart response")
    }

    // -----------------------------------------------
    // QUOTE SUMMARY: SHORT INTEREST INFO BUNDLE
    // -----------------------------------------------
    async fn fetch_quote_summary(&self, symbol: &str) -> Result<QuoteSummaryResponse> {
        let session = self.session_if_needed().await?;
        let url = config::quote_summary_url(symbol, &session.crumb);

        let res = self
            .client
            .get(&url)
            .header(header::COOKIE, &session.cookie)
            .send()
            .await
            .context("Quote summary request failed")?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            // Stale crumb. The next call re-handshakes; this one fails.
            warn!("Yahoo session rejected for {}, clearing crumb", symbol);
            self.clear_session().await;
            anyhow::bail!("Yahoo session rejected: {}", status);
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            anyhow::bail!("Quote summary error {}: {}", status, preview);
        }

        res.json::<QuoteSummaryResponse>()
            .await
            .context("Failed to parse quote summary")
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<f64>> {
        debug!("Fetching 1d chart for {}", symbol);

        let chart = self.fetch_daily_chart(symbol).await?;
        let result = chart
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .context("Empty chart result")?;

        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .and_then(|block| block.close)
            .unwrap_or_default();

        // Yahoo pads the series with nulls for unfilled intervals
        Ok(closes.into_iter().flatten().collect())
    }

    async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo> {
        debug!("Fetching quote summary for {}", symbol);

        let summary = self.fetch_quote_summary(symbol).await?;
        let result = summary
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .context("Empty quote summary result")?;

        let price = result.price.as_ref();
        let stats = result.default_key_statistics.as_ref();
        let detail = result.summary_detail.as_ref();
        let financial = result.financial_data.as_ref();

        Ok(SymbolInfo {
            long_name: price.and_then(|p| p.long_name.clone()),
            short_ratio: stats.and_then(|s| s.short_ratio.raw()),
            short_percent_of_float: stats.and_then(|s| s.short_percent_of_float.raw()),
            shares_short: stats.and_then(|s| s.shares_short.raw_count()),
            shares_short_prior_month: stats.and_then(|s| s.shares_short_prior_month.raw_count()),
            float_shares: stats.and_then(|s| s.float_shares.raw_count()),
            market_cap: price
                .and_then(|p| p.market_cap.raw_count())
                .or_else(|| detail.and_then(|d| d.market_cap.raw_count())),
            current_price: financial.and_then(|f| f.current_price.raw()),
        })
    }
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    let lang = config::ACCEPT_LANGUAGES.choose(&mut thread_rng()).unwrap();
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_str(lang)?,
    );
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Ok(Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?)
}

// -----------------------------------------------
// WIRE MODELS
// -----------------------------------------------
// Yahoo wraps most numbers as {"raw": 123.4, "fmt": "123.40"} and sends
// an empty object when a metric is unavailable; only raw is consumed.

#[derive(Debug, Clone, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

trait RawField {
    fn raw(&self) -> Option<f64>;

    // Share counts and market caps are integral; Yahoo keeps them well
    // under 2^53 so the cast is exact.
    fn raw_count(&self) -> Option<u64> {
        self.raw().map(|v| v as u64)
    }
}

impl RawField for Option<RawValue> {
    fn raw(&self) -> Option<f64> {
        self.as_ref().and_then(|v| v.raw)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct ChartQuoteBlock {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetailModule>,
    default_key_statistics: Option<KeyStatisticsModule>,
    financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatisticsModule {
    short_ratio: Option<RawValue>,
    short_percent_of_float: Option<RawValue>,
    shares_short: Option<RawValue>,
    shares_short_prior_month: Option<RawValue>,
    float_shares: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialDataModule {
    current_price: Option<RawValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_raw_value() {
        let detail: RawValue = serde_json::from_str(r#"{"raw": 150.25, "fmt": "150.25"}"#).unwrap();
        assert_eq!(detail.raw, Some(150.25));

        // Unavailable metrics arrive as empty objects
        let empty: RawValue = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.raw, None);
    }

    #[test]
    fn test_raw_count_cast() {
        let value = Some(RawValue {
            raw: Some(3_000_000_000_000.0),
        });
        assert_eq!(value.raw_count(), Some(3_000_000_000_000));
        assert_eq!(None::<RawValue>.raw_count(), None);
    }

    #[test]
    fn test_deserialize_chart_response() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "timestamp": [1700000000],
                    "indicators": {"quote": [{"close": [180.0, null, 185.5]}]}
                }],
                "error": null
            }
        }"#;

        let chart: ChartResponse = serde_json::from_str(json).unwrap();
        let closes = chart.chart.result.unwrap()[0]
            .indicators
            .quote
            .first()
            .and_then(|block| block.close.clone())
            .unwrap();
        assert_eq!(closes, vec![Some(180.0), None, Some(185.5)]);
    }

    #[test]
    fn test_deserialize_chart_error_response() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let chart: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(chart.chart.result.is_none());
    }

    #[test]
    fn test_deserialize_quote_summary() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"longName": "Apple Inc.", "marketCap": {"raw": 3000000000000}},
                    "summaryDetail": {"marketCap": {}},
                    "defaultKeyStatistics": {
                        "shortRatio": {"raw": 2.5, "fmt": "2.50"},
                        "shortPercentOfFloat": {"raw": 15.3},
                        "sharesShort": {"raw": 100000000},
                        "sharesShortPriorMonth": {"raw": 95000000},
                        "floatShares": {"raw": 650000000}
                    },
                    "financialData": {"currentPrice": {"raw": 185.5}}
                }],
                "error": null
            }
        }"#;

        let summary: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let results = summary.quote_summary.result.unwrap();
        let result = &results[0];

        let price = result.price.as_ref().unwrap();
        assert_eq!(price.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(price.market_cap.raw_count(), Some(3_000_000_000_000));

        let stats = result.default_key_statistics.as_ref().unwrap();
        assert_eq!(stats.short_ratio.raw(), Some(2.5));
        assert_eq!(stats.short_percent_of_float.raw(), Some(15.3));
        assert_eq!(stats.shares_short.raw_count(), Some(100_000_000));

        let financial = result.financial_data.as_ref().unwrap();
        assert_eq!(financial.current_price.raw(), Some(185.5));
    }

    #[test]
    fn test_deserialize_quote_summary_missing_modules() {
        let json = r#"{"quoteSummary": {"result": [{"price": {"longName": "Bare Co."}}], "error": null}}"#;
        let summary: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let results = summary.quote_summary.result.unwrap();
        let result = &results[0];

        assert!(result.default_key_statistics.is_none());
        assert!(result.financial_data.is_none());
        assert!(result.price.as_ref().unwrap().market_cap.raw().is_none());
    }
}
