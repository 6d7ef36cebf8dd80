use crate::data::series::{PricePoint, PriceSeries};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Symbol", alias = "ticker", alias = "Ticker")]
    symbol: Option<String>,
}

//a raw daily row as read from disk, before cleaning
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub symbol: Option<String>,
}

//parses a date as YYYY-MM-DD, RFC 3339 or "YYYY-MM-DD HH:MM:SS"
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|timestamp| timestamp.date())
}

//loads daily price rows from a csv file with date and close columns
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PriceRecord>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut records = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let date = parse_date(&record.date).ok_or_else(|| {
            anyhow::anyhow!(
                "Failed to parse date '{}' at line {}",
                record.date,
                index + 2
            )
        })?;

        records.push(PriceRecord {
            date,
            close: record.close,
            symbol: record.symbol,
        });
    }

    //stable sort keeps file order among equal dates
    records.sort_by(|a, b| a.date.cmp(&b.date));

    info!(rows = records.len(), path = ?path, "loaded price rows");
    Ok(records)
}

//keeps rows for the given symbol; files without a symbol column pass through
pub fn filter_by_symbol(records: &[PriceRecord], symbol: &str) -> Vec<PriceRecord> {
    records
        .iter()
        .filter(|record| match &record.symbol {
            Some(s) => s.eq_ignore_ascii_case(symbol),
            None => true,
        })
        .cloned()
        .collect()
}

//turns sorted raw rows into a validated series
//rows with a missing, non-finite or non-positive close are dropped
//duplicate dates keep the last row
pub fn clean_prices(records: &[PriceRecord]) -> Result<PriceSeries> {
    let mut points: Vec<PricePoint> = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    let mut duplicates = 0usize;

    for record in records {
        let close = match record.close {
            Some(close) if close.is_finite() && close > 0.0 => close,
            _ => {
                debug!(date = %record.date, close = ?record.close, "dropping unusable close");
                dropped += 1;
                continue;
            }
        };

        match points.last_mut() {
            Some(last) if last.date == record.date => {
                last.close = close;
                duplicates += 1;
            }
            _ => points.push(PricePoint::new(record.date, close)),
        }
    }

    if dropped > 0 || duplicates > 0 {
        warn!(dropped, duplicates, "cleaned price rows");
    }

    PriceSeries::new(points).context("Cleaned prices do not form a valid series")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15);
        assert_eq!(parse_date("2023-03-15"), expected);
        assert_eq!(parse_date("2023-03-15T00:00:00Z"), expected);
        assert_eq!(parse_date("2023-03-15 16:00:00"), expected);
        assert_eq!(parse_date("15/03/2023"), None);
    }

    #[test]
    fn test_load_csv_sorts_and_accepts_capitalised_headers() {
        let file = write_csv(
            "Date,Open,Close,Volume\n\
             2024-01-03,1,102.0,10\n\
             2024-01-02,1,101.0,10\n",
        );

        let records = load_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(records[0].close, Some(101.0));
        assert_eq!(records[1].symbol, None);
    }

    #[test]
    fn test_load_csv_reports_bad_date() {
        let file = write_csv("date,close\nyesterday,1.0\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_filter_by_symbol() {
        let file = write_csv(
            "date,close,symbol\n\
             2024-01-02,10.0,AAPL\n\
             2024-01-02,20.0,MSFT\n\
             2024-01-03,11.0,aapl\n",
        );

        let records = load_csv(file.path()).unwrap();
        let aapl = filter_by_symbol(&records, "AAPL");
        assert_eq!(aapl.len(), 2);
        assert!(aapl.iter().all(|r| r.close.unwrap() < 20.0));
    }

    #[test]
    fn test_clean_prices_drops_gaps_and_duplicates() {
        let file = write_csv(
            "date,close\n\
             2024-01-02,10.0\n\
             2024-01-03,\n\
             2024-01-04,-1.0\n\
             2024-01-05,12.0\n\
             2024-01-05,12.5\n",
        );

        let records = load_csv(file.path()).unwrap();
        let series = clean_prices(&records).unwrap();

        assert_eq!(series.closes(), vec![10.0, 12.5]);
        assert_eq!(
            series.last_date(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }
}
