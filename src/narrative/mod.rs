use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::analysis::level_calc::LevelSet;
use crate::config::MARKET_DATA;
use crate::models::series::PriceSeries;

// ============================================================================
// Narrative generation: a replaceable port with a deterministic fallback
// ============================================================================
// The service only phrases numbers that were already computed; nothing it
// produces feeds back into level math, and a failure surfaces as placeholder
// text rather than an interaction fault.

#[derive(Error, Debug, Clone)]
pub enum NarrativeError {
    #[error("narrative generation failed: {0}")]
    Generation(String),
}

pub trait NarrativeService: Send + Sync {
    fn trading_plan(&self, symbol: &str, levels: &LevelSet) -> Result<String, NarrativeError>;
    fn daily_recap(&self, symbol: &str, series: &PriceSeries) -> Result<String, NarrativeError>;
}

/// Pick the LLM client when its endpoint is configured, the built-in
/// templates otherwise.
pub fn service_from_env() -> Arc<dyn NarrativeService> {
    match LlmNarrative::from_env() {
        Some(client) => {
            log::info!("Narrative service: LLM endpoint");
            Arc::new(client)
        }
        None => {
            log::info!("Narrative service: built-in templates");
            Arc::new(TemplateNarrative)
        }
    }
}

// ============================================================================
// TemplateNarrative: deterministic Markdown from the computed numbers
// ============================================================================

pub struct TemplateNarrative;

impl NarrativeService for TemplateNarrative {
    fn trading_plan(&self, symbol: &str, levels: &LevelSet) -> Result<String, NarrativeError> {
        let resistance = descending(&levels.resistances);
        let support = descending(&levels.supports);
        if resistance.len() < 3 || support.len() < 3 {
            return Err(NarrativeError::Generation(
                "not enough levels to phrase a plan".to_string(),
            ));
        }

        Ok(format!(
            "## {symbol} Trading Plan\n\
             \n\
             ### Bull Case\n\
             - If price breaks above **{:.2}**, look for longs targeting **{:.2}** and **{:.2}**.\n\
             - Monitor **{:.2}** as a pivot point for continuation.\n\
             \n\
             ### Bear Case\n\
             - If price falls below **{:.2}**, look for shorts targeting **{:.2}** and **{:.2}**.\n\
             - Watch for failed breakdowns near **{:.2}** to confirm continuation.\n\
             \n\
             ### Key Notes\n\
             - Trade level to level; avoid chasing moves.\n\
             - Wait for reclaim setups around the magnet before sizing up.\n",
            resistance[0],
            resistance[1],
            resistance[2],
            levels.magnet,
            support[0],
            support[1],
            support[2],
            support[1],
        ))
    }

    fn daily_recap(&self, symbol: &str, series: &PriceSeries) -> Result<String, NarrativeError> {
        let Some(bar) = series.last_bar() else {
            return Err(NarrativeError::Generation(
                "no session data to recap".to_string(),
            ));
        };

        Ok(format!(
            "## {symbol} Daily Recap\n\
             - **High:** {:.2}\n\
             - **Low:** {:.2}\n\
             - **Close:** {:.2}\n\
             \n\
             The session ranged between {:.2} and {:.2}, closing at {:.2}. \
             Key movements included resistance tests and support reactions.\n",
            bar.high, bar.low, bar.close, bar.low, bar.high, bar.close,
        ))
    }
}

fn descending(prices: &[f64]) -> Vec<f64> {
    let mut out = prices.to_vec();
    out.reverse();
    out
}

// ============================================================================
// LlmNarrative: OpenAI-compatible chat endpoint
// ============================================================================

pub struct LlmNarrative {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl LlmNarrative {
    /// Available only when the endpoint env var is set. Runs on a worker
    /// thread (blocking client), never on the UI thread.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(MARKET_DATA.narrative.endpoint_env).ok()?;
        let api_key = std::env::var(MARKET_DATA.narrative.api_key_env).ok();

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(MARKET_DATA.narrative.timeout_ms))
            .build()
            .ok()?;

        Some(Self {
            http,
            endpoint,
            api_key,
        })
    }

    fn complete(&self, prompt: &str) -> Result<String, NarrativeError> {
        let payload = json!({
            "model": MARKET_DATA.narrative.model,
            "max_tokens": MARKET_DATA.narrative.max_tokens,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a concise trading assistant. Phrase the given \
                                reference prices as a short Markdown briefing. Never invent \
                                numbers that are not in the prompt."
                },
                { "role": "user", "content": prompt }
            ]
        });

        let mut request = self.http.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response: serde_json::Value = request
            .send()
            .map_err(|e| NarrativeError::Generation(e.to_string()))?
            .error_for_status()
            .map_err(|e| NarrativeError::Generation(e.to_string()))?
            .json()
            .map_err(|e| NarrativeError::Generation(e.to_string()))?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                NarrativeError::Generation("response carried no message content".to_string())
            })
    }
}

impl NarrativeService for LlmNarrative {
    fn trading_plan(&self, symbol: &str, levels: &LevelSet) -> Result<String, NarrativeError> {
        let resistance = descending(&levels.resistances);
        let prompt = format!(
            "Write a trading plan for {symbol}. Resistance levels (highest first): {:?}. \
             Support levels (lowest first): {:?}. Magnet/pivot price: {:.2}. \
             Cover a bull case above the first resistance and a bear case below the \
             first support, trading level to level.",
            resistance, levels.supports, levels.magnet,
        );
        self.complete(&prompt)
    }

    fn daily_recap(&self, symbol: &str, series: &PriceSeries) -> Result<String, NarrativeError> {
        let Some(bar) = series.last_bar() else {
            return Err(NarrativeError::Generation(
                "no session data to recap".to_string(),
            ));
        };
        let prompt = format!(
            "Write a short recap of today's {symbol} session. High {:.2}, low {:.2}, \
             close {:.2}.",
            bar.high, bar.low, bar.close,
        );
        self.complete(&prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::PriceBar;
    use crate::utils::TimeUtils;

    fn sample_levels() -> LevelSet {
        LevelSet {
            resistances: vec![403.82, 406.18, 407.64, 410.0],
            supports: vec![400.0, 402.36, 403.82, 406.18],
            magnet: 405.0,
        }
    }

    #[test]
    fn test_template_plan_quotes_the_levels() {
        let plan = TemplateNarrative
            .trading_plan("SPY", &sample_levels())
            .unwrap();

        assert!(plan.contains("410.00"), "breakout level missing");
        assert!(plan.contains("407.64"), "first long target missing");
        assert!(plan.contains("405.00"), "magnet missing");
        assert!(plan.contains("406.18"), "breakdown level missing");
        assert!(plan.starts_with("## SPY Trading Plan"));
    }

    #[test]
    fn test_template_plan_needs_three_levels_per_side() {
        let thin = LevelSet {
            resistances: vec![410.0],
            supports: vec![400.0],
            magnet: 405.0,
        };
        assert!(TemplateNarrative.trading_plan("SPY", &thin).is_err());
    }

    #[test]
    fn test_template_recap_quotes_the_last_bar() {
        let mut series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        series
            .push_bar(PriceBar::new(
                TimeUtils::MS_IN_D,
                402.0,
                408.0,
                401.0,
                405.0,
                1000.0,
            ))
            .unwrap();

        let recap = TemplateNarrative.daily_recap("SPY", &series).unwrap();
        assert!(recap.contains("408.00"));
        assert!(recap.contains("401.00"));
        assert!(recap.contains("405.00"));
    }

    #[test]
    fn test_template_recap_without_data_fails() {
        let series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        assert!(TemplateNarrative.daily_recap("SPY", &series).is_err());
    }
}
