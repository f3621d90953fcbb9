use std::time::Duration;

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::config::MARKET_DATA;
use crate::domain::bar::PriceBar;
use crate::models::series::PriceSeries;
use crate::utils::TimeUtils;

// ============================================================================
// Daily price history retrieval (Stooq CSV endpoint)
// ============================================================================

/// Failure of the price-history collaborator. One attempt, no retry policy;
/// callers fall back to the cache or start empty.
#[derive(Error, Debug, Clone)]
pub enum DataError {
    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

pub struct StooqClient {
    http: reqwest::Client,
}

impl StooqClient {
    pub fn new() -> Result<Self, DataError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(MARKET_DATA.quotes.timeout_ms))
            .user_agent(MARKET_DATA.quotes.user_agent)
            .build()
            .map_err(|e| DataError::Unavailable(e.to_string()))?;
        Ok(Self { http })
    }

    /// Fetch `lookback_days` calendar days of daily bars, oldest first.
    pub async fn daily_series(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<PriceSeries, DataError> {
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(lookback_days as i64);
        let url = request_url(symbol, start, end);
        log::info!("Fetching {} daily bars from {}", symbol, url);

        let body = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| DataError::Unavailable(e.to_string()))?
            .text()
            .await
            .map_err(|e| DataError::Unavailable(e.to_string()))?;

        parse_daily_csv(symbol, &body)
    }
}

fn request_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}?s={}&d1={}&d2={}&i=d",
        MARKET_DATA.quotes.base_url,
        stooq_symbol(symbol),
        start.format("%Y%m%d"),
        end.format("%Y%m%d"),
    )
}

/// Stooq keys US tickers as `spy.us`; pass through symbols that already
/// carry a market suffix.
fn stooq_symbol(symbol: &str) -> String {
    let lower = symbol.to_ascii_lowercase();
    if lower.contains('.') {
        lower
    } else {
        format!("{}{}", lower, MARKET_DATA.quotes.default_market_suffix)
    }
}

/// Parse the `Date,Open,High,Low,Close,Volume` download format. The volume
/// column is absent or empty for some indices; those bars carry volume 0.
fn parse_daily_csv(symbol: &str, body: &str) -> Result<PriceSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut series = PriceSeries::new(symbol, TimeUtils::MS_IN_D);
    for record in reader.records() {
        let record = record.map_err(|e| DataError::Unavailable(format!("csv parse: {e}")))?;

        let date: NaiveDate = field(&record, 0, "date")?
            .parse()
            .map_err(|e| DataError::Unavailable(format!("bad date: {e}")))?;
        let open = numeric_field(&record, 1, "open")?;
        let high = numeric_field(&record, 2, "high")?;
        let low = numeric_field(&record, 3, "low")?;
        let close = numeric_field(&record, 4, "close")?;
        let volume = match record.get(5) {
            Some(raw) if !raw.is_empty() => raw
                .parse()
                .map_err(|e| DataError::Unavailable(format!("bad volume: {e}")))?,
            _ => 0.0,
        };

        let timestamp_ms = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc()
            .timestamp_millis();

        series
            .push_bar(PriceBar::new(timestamp_ms, open, high, low, close, volume))
            .map_err(|e| DataError::Unavailable(e.to_string()))?;
    }

    if series.is_empty() {
        // Stooq answers unknown symbols with a "No data" stub body
        return Err(DataError::Unavailable(format!(
            "no rows returned for {symbol}"
        )));
    }
    Ok(series)
}

fn field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    label: &str,
) -> Result<&'a str, DataError> {
    record
        .get(idx)
        .ok_or_else(|| DataError::Unavailable(format!("missing {label} column")))
}

fn numeric_field(record: &csv::StringRecord, idx: usize, label: &str) -> Result<f64, DataError> {
    field(record, idx, label)?
        .parse()
        .map_err(|e| DataError::Unavailable(format!("bad {label}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Date,Open,High,Low,Close,Volume\n\
        2024-01-15,402.00,410.00,400.00,404.00,75000000\n\
        2024-01-16,404.50,408.00,401.00,405.00,68000000\n";

    #[test]
    fn test_parse_daily_csv() {
        let series = parse_daily_csv("SPY", SAMPLE).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.highest_high(), Some(410.0));
        assert_eq!(series.lowest_low(), Some(400.0));
        assert_eq!(series.last_close(), Some(405.0));
        assert_eq!(series.interval_ms, TimeUtils::MS_IN_D);
    }

    #[test]
    fn test_parse_tolerates_missing_volume_column() {
        let body = "Date,Open,High,Low,Close\n2024-01-15,402.0,410.0,400.0,404.0\n";
        let series = parse_daily_csv("^SPX.US", body).unwrap();
        assert_eq!(series.volumes, vec![0.0]);
    }

    #[test]
    fn test_parse_rejects_stub_bodies() {
        assert!(parse_daily_csv("NOPE", "No data").is_err());
        assert!(parse_daily_csv("NOPE", "").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage_rows() {
        let body = "Date,Open,High,Low,Close,Volume\nnot-a-date,1,2,3,4,5\n";
        assert!(parse_daily_csv("SPY", body).is_err());
    }

    #[test]
    fn test_stooq_symbol_suffixing() {
        assert_eq!(stooq_symbol("SPY"), "spy.us");
        assert_eq!(stooq_symbol("spy.us"), "spy.us");
        assert_eq!(stooq_symbol("BTC.V"), "btc.v");
    }

    #[test]
    fn test_request_url_shape() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let url = request_url("SPY", start, end);
        assert!(url.contains("s=spy.us"));
        assert!(url.contains("d1=20240101"));
        assert!(url.contains("d2=20240331"));
        assert!(url.ends_with("i=d"));
    }
}
