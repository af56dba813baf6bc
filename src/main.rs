use anyhow::Result;
use colored::Colorize;
use short_analyzer::models::ShortInterestRecord;
use short_analyzer::{
    config, export, logging, MarketData, QuoteClient, ShortInterestClient, YahooClient,
};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let mode = config::get_execution_mode();
    match mode.as_str() {
        "quote" => run_quote_prompt().await,
        _ => run_demo().await,
    }
}

/// Interactive price lookup: one ticker from stdin, one message out
async fn run_quote_prompt() -> Result<()> {
    print!("Enter a stock ticker symbol (e.g., AAPL, TSLA, GOOG): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let provider: Arc<dyn MarketData> = Arc::new(YahooClient::new()?);
    let client = QuoteClient::new(provider, line.trim());
    println!("{}", client.price_message().await);

    Ok(())
}

/// Full walkthrough: single-symbol lookups, batch comparison, filter, CSV
async fn run_demo() -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Short Interest Analyzer".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!(
        "{} Run date: {}",
        "ℹ".blue(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    let provider: Arc<dyn MarketData> = Arc::new(YahooClient::new()?);
    let symbols = config::get_symbols();
    let lead = symbols.first().cloned().unwrap_or_else(|| "GME".to_string());

    // Step 1: single-symbol lookups
    println!("{}", format!("Step 1: Analyzing {}...", lead).cyan());

    let quote_client = QuoteClient::new(Arc::clone(&provider), &lead);
    println!("{}", quote_client.price_message().await);

    let shorts = ShortInterestClient::new(Arc::clone(&provider));
    println!("{}", shorts.summary(&lead).await);
    println!(
        "Is heavily shorted (>{:.0}%): {}",
        config::DEMO_HEAVY_THRESHOLD,
        shorts
            .is_heavily_shorted(&lead, config::DEMO_HEAVY_THRESHOLD)
            .await
    );
    println!();

    // Step 2: batch comparison
    let max_workers = config::get_max_workers();
    println!("{}", "Step 2: Comparing short interest...".cyan());
    println!("{} Symbols: {}", "ℹ".blue(), symbols.join(", "));
    println!("{} Max concurrent requests: {}", "ℹ".blue(), max_workers);
    println!();

    let start_time = std::time::Instant::now();
    let comparison = shorts.compare(&symbols, max_workers).await;
    let elapsed = start_time.elapsed();

    println!("{}", "--- Short Interest Comparison ---".cyan().bold());
    if comparison.is_empty() {
        println!("{} No valid data retrieved for any symbols", "✗".red());
    } else {
        print_table(&comparison, 5);
    }
    println!(
        "{} Retrieved {}/{} symbols in {:.2}s",
        "✓".green(),
        comparison.len(),
        symbols.len(),
        elapsed.as_secs_f64()
    );
    println!();

    // Step 3: threshold filter
    let min_percent = config::get_min_short_percent();
    println!(
        "{}",
        format!("--- Stocks with >{:.0}% Short Interest ---", min_percent)
            .cyan()
            .bold()
    );
    let high = shorts.find_high(&symbols, min_percent).await;
    if high.is_empty() {
        println!("{} None found", "✗".red());
    } else {
        print_table(&high, high.len());
    }
    println!();

    // Step 4: save comparison
    if !comparison.is_empty() {
        export::write_comparison_csv(&comparison, Path::new(config::COMPARISON_CSV_PATH))?;
        println!(
            "{} Results saved to '{}'",
            "✓".green(),
            config::COMPARISON_CSV_PATH
        );
    }

    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Done!".green().bold());
    println!("{}", "=".repeat(60).blue());

    Ok(())
}

/// Aligned Symbol / Company / Short % / Short Ratio columns
fn print_table(records: &[ShortInterestRecord], limit: usize) {
    println!(
        "  {:<8} {:<28} {:>18} {:>12}",
        "Symbol", "Company", "Short % of Float", "Short Ratio"
    );

    for record in records.iter().take(limit) {
        let company: String = record
            .company
            .as_deref()
            .unwrap_or("N/A")
            .chars()
            .take(28)
            .collect();

        println!(
            "  {:<8} {:<28} {:>18} {:>12}",
            record.symbol,
            company,
            record
                .short_percent_of_float
                .map_or_else(|| "N/A".to_string(), |pct| format!("{:.2}%", pct)),
            record
                .short_ratio
                .map_or_else(|| "N/A".to_string(), |ratio| format!("{:.2}", ratio)),
        );
    }

    if records.len() > limit {
        println!("  ... and {} more", records.len() - limit);
    }
}
