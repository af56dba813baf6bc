use crate::models::ShortInterestRecord;
use anyhow::{Context, Result};
use std::path::Path;

/// Write a comparison table as CSV: header row from the record's column
/// names, one line per record, empty cells for missing values, no index
/// column.
pub fn write_comparison_csv(records: &[ShortInterestRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for record in records {
        writer
            .serialize(record)
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<ShortInterestRecord> {
        vec![
            ShortInterestRecord {
                symbol: "TSLA".to_string(),
                company: Some("Tesla, Inc.".to_string()),
                short_ratio: Some(3.2),
                short_percent_of_float: Some(25.8),
                shares_short: Some(80_000_000),
                shares_short_prior_month: Some(78_000_000),
                float_shares: Some(310_000_000),
                market_cap: Some(800_000_000_000),
                current_price: Some(250.0),
            },
            ShortInterestRecord {
                symbol: "AAPL".to_string(),
                company: Some("Apple Inc.".to_string()),
                short_ratio: None,
                short_percent_of_float: Some(15.3),
                shares_short: None,
                shares_short_prior_month: None,
                float_shares: None,
                market_cap: None,
                current_price: None,
            },
        ]
    }

    #[test]
    fn test_write_comparison_csv() {
        let path = std::env::temp_dir().join("short_analyzer_export_test.csv");
        write_comparison_csv(&sample_records(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Symbol,Company,Short Ratio,Short % of Float,Shares Short,\
             Shares Short Prior Month,Float,Market Cap,Current Price"
        );

        let tsla = lines.next().unwrap();
        assert!(tsla.starts_with("TSLA,"));
        assert!(tsla.contains("25.8"));

        // Missing values serialize as empty cells
        let aapl = lines.next().unwrap();
        assert!(aapl.starts_with("AAPL,"));
        assert!(aapl.contains(",,"));

        assert!(lines.next().is_none());
        std::fs::remove_file(&path).ok();
    }
}
