//! External-service configuration constants.

/// Configuration for the daily-quote REST endpoint (Stooq CSV download)
pub struct QuoteApi {
    pub base_url: &'static str,
    /// Appended when the symbol carries no market suffix (`spy` -> `spy.us`)
    pub default_market_suffix: &'static str,
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

/// Configuration for the best-effort news/calendar panels.
/// Endpoints are read from environment variables so the collaborator can be
/// swapped without a rebuild; unset means the panel shows "no data".
pub struct NewsApi {
    pub headlines_url_env: &'static str,
    pub calendar_url_env: &'static str,
    pub timeout_ms: u64,
}

/// Configuration for the optional narrative (LLM) service
pub struct NarrativeApi {
    pub endpoint_env: &'static str,
    pub api_key_env: &'static str,
    pub model: &'static str,
    pub timeout_ms: u64,
    pub max_tokens: u32,
}

/// The Master External-Service Configuration Struct
pub struct MarketDataConfig {
    pub quotes: QuoteApi,
    pub news: NewsApi,
    pub narrative: NarrativeApi,
}

pub const MARKET_DATA: MarketDataConfig = MarketDataConfig {
    quotes: QuoteApi {
        base_url: "https://stooq.com/q/d/l/",
        default_market_suffix: ".us",
        timeout_ms: 10_000,
        user_agent: "level-scout/0.1",
    },
    news: NewsApi {
        headlines_url_env: "LEVEL_SCOUT_NEWS_URL",
        calendar_url_env: "LEVEL_SCOUT_CALENDAR_URL",
        timeout_ms: 5_000,
    },
    narrative: NarrativeApi {
        endpoint_env: "LEVEL_SCOUT_LLM_URL",
        api_key_env: "LEVEL_SCOUT_LLM_KEY",
        model: "gpt-4o-mini",
        timeout_ms: 30_000,
        max_tokens: 600,
    },
};
