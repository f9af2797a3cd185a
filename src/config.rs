use crate::error::GatewayError;
use crate::utils::retry::RetryPolicy;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const MAX_LOOKAHEAD_DAYS: i64 = 365;

/// Runtime settings, normally read from the environment (and a `.env` file)
#[derive(Debug, Clone)]
pub struct Config {
    pub odds_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub odds_api_base_url: String,
    pub gemini_api_base_url: String,
    pub gemini_model: String,
    pub retry: RetryPolicy,
    pub mock_latency: Duration,
    pub lookahead_days: i64,
    pub http_timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odds_api_key: None,
            gemini_api_key: None,
            odds_api_base_url: DEFAULT_ODDS_API_BASE_URL.to_string(),
            gemini_api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            retry: RetryPolicy::default(),
            mock_latency: Duration::from_millis(1500),
            lookahead_days: 7,
            http_timeout: Duration::from_secs(30),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let retry = RetryPolicy {
            max_retries: parse_or(&get, "RETRY_MAX_RETRIES", defaults.retry.max_retries)?,
            initial_backoff: Duration::from_millis(parse_or(
                &get,
                "RETRY_INITIAL_BACKOFF_MS",
                defaults.retry.initial_backoff.as_millis() as u64,
            )?),
            ..defaults.retry
        };

        let lookahead_days: i64 = parse_or(&get, "LOOKAHEAD_DAYS", defaults.lookahead_days)?;
        if !(0..=MAX_LOOKAHEAD_DAYS).contains(&lookahead_days) {
            return Err(GatewayError::Config(format!(
                "LOOKAHEAD_DAYS must be between 0 and {}, got {}",
                MAX_LOOKAHEAD_DAYS, lookahead_days
            )));
        }

        Ok(Self {
            odds_api_key: get("ODDS_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            odds_api_base_url: get("ODDS_API_BASE_URL").unwrap_or(defaults.odds_api_base_url),
            gemini_api_base_url: get("GEMINI_API_BASE_URL")
                .unwrap_or(defaults.gemini_api_base_url),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            retry,
            mock_latency: Duration::from_millis(parse_or(
                &get,
                "MOCK_LATENCY_MS",
                defaults.mock_latency.as_millis() as u64,
            )?),
            lookahead_days,
            http_timeout: Duration::from_secs(parse_or(
                &get,
                "HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )?),
            bind_addr: parse_or(&get, "BIND_ADDR", defaults.bind_addr)?,
        })
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T, GatewayError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| GatewayError::Config(format!("{} = {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
