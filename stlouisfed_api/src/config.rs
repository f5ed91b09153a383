//! Client configuration with documented defaults.

use std::time::Duration;

use crate::rate_limiter::{DEFAULT_MAX_CALLS, DEFAULT_PERIOD};
use crate::Error;

/// Production base URL shared by FRED, ALFRED and GeoFRED.
pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org";

/// Request timeout applied to every HTTP call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("stlouisfed-rs/", env!("CARGO_PKG_VERSION"));

/// Client-side request quota: at most `max_calls` sends in any `period`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub max_calls: u64,
    pub period: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_MAX_CALLS,
            period: DEFAULT_PERIOD,
        }
    }
}

/// Everything a [`Client`](crate::Client) needs. Multiple clients with
/// different settings can coexist; nothing here is global.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// `None` disables the client-side rate gate.
    pub rate_limit: Option<RateLimit>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Production settings with the default quota of 120 calls per minute.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit: Some(RateLimit::default()),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Reads settings from the environment.
    ///
    /// `FRED_API_KEY` is required. `FRED_BASE_URL`, `FRED_RATE_LIMIT_MAX_CALLS`,
    /// `FRED_RATE_LIMIT_PERIOD_SECS` and `FRED_TIMEOUT_SECS` fall back to the
    /// defaults when unset or unparsable. A max-calls value of 0 disables the
    /// rate gate.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| Error::validation("FRED_API_KEY is not set"))?;
        let mut config = Self::new(&api_key);

        if let Ok(base_url) = std::env::var("FRED_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().to_string();
            }
        }

        let max_calls = env_u64("FRED_RATE_LIMIT_MAX_CALLS", DEFAULT_MAX_CALLS);
        let period = Duration::from_secs(env_u64(
            "FRED_RATE_LIMIT_PERIOD_SECS",
            DEFAULT_PERIOD.as_secs(),
        ));
        config.rate_limit = (max_calls > 0).then_some(RateLimit { max_calls, period });
        config.timeout = Duration::from_secs(env_u64("FRED_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs()));
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_rate_limit(mut self, max_calls: u64, period: Duration) -> Self {
        self.rate_limit = Some(RateLimit { max_calls, period });
        self
    }

    pub fn without_rate_limit(mut self) -> Self {
        self.rate_limit = None;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, "https://api.stlouisfed.org");
        assert_eq!(
            config.rate_limit,
            Some(RateLimit {
                max_calls: 120,
                period: Duration::from_secs(60)
            })
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("stlouisfed-rs/"));
    }

    #[test]
    fn builder_methods() {
        let config = ClientConfig::new("key")
            .with_base_url("http://localhost:9999")
            .with_rate_limit(2, Duration::from_millis(300))
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.rate_limit.unwrap().max_calls, 2);
        assert_eq!(config.user_agent, "test-agent");

        assert_eq!(config.without_rate_limit().rate_limit, None);
    }

    #[test]
    fn env_u64_falls_back() {
        assert_eq!(env_u64("STLOUISFED_TEST_UNSET_VARIABLE", 7), 7);
    }
}
