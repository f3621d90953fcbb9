use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::MARKET_DATA;

// ============================================================================
// Best-effort news and economic-calendar retrieval
// ============================================================================
// These panels are advisory. Any failure — endpoint unset, transport error,
// unexpected shape — degrades to an empty collection and a logged warning;
// the interaction itself never fails.

#[derive(Deserialize, Debug, Clone)]
pub struct Headline {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CalendarEvent {
    pub event: String,
    pub date: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub actual: String,
    #[serde(default)]
    pub forecast: String,
    #[serde(default)]
    pub previous: String,
}

pub async fn fetch_headlines() -> Vec<Headline> {
    match fetch_json(MARKET_DATA.news.headlines_url_env).await {
        Ok(items) => items,
        Err(e) => {
            log::warn!("Headline fetch skipped: {e:#}");
            Vec::new()
        }
    }
}

pub async fn fetch_calendar() -> Vec<CalendarEvent> {
    match fetch_json(MARKET_DATA.news.calendar_url_env).await {
        Ok(items) => items,
        Err(e) => {
            log::warn!("Calendar fetch skipped: {e:#}");
            Vec::new()
        }
    }
}

/// GET a JSON array from the endpoint named by `url_env`.
async fn fetch_json<T: DeserializeOwned>(url_env: &str) -> Result<Vec<T>> {
    let url = std::env::var(url_env).unwrap_or_default();
    ensure!(!url.is_empty(), "{url_env} is not configured");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(MARKET_DATA.news.timeout_ms))
        .build()?;

    let items = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<T>>()
        .await?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_deserializes_with_missing_optionals() {
        let item: Headline = serde_json::from_str(r#"{"title": "CPI due"}"#).unwrap();
        assert_eq!(item.title, "CPI due");
        assert!(item.summary.is_empty());
        assert!(item.url.is_empty());
    }

    #[test]
    fn test_calendar_event_deserializes() {
        let item: CalendarEvent = serde_json::from_str(
            r#"{"event": "FOMC", "date": "2024-01-31", "impact": "high"}"#,
        )
        .unwrap();
        assert_eq!(item.event, "FOMC");
        assert_eq!(item.impact, "high");
        assert!(item.actual.is_empty());
    }
}
