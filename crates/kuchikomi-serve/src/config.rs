//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Trailing window for the write rate limiter.
    pub rate_window: Duration,

    /// Admitted writes per identity per window.
    pub rate_max_requests: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `KUCHIKOMI_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `KUCHIKOMI_RATE_WINDOW_SECS`: Rate limiter window in seconds (default: 10)
    /// - `KUCHIKOMI_RATE_MAX`: Admitted writes per identity per window (default: 5)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("KUCHIKOMI_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let rate_window_secs: u64 = parse_env("KUCHIKOMI_RATE_WINDOW_SECS", 10)?;
        let rate_max_requests: usize = parse_env("KUCHIKOMI_RATE_MAX", 5)?;

        if rate_window_secs == 0 || rate_max_requests == 0 {
            anyhow::bail!("rate limiter window and max requests must be non-zero");
        }

        tracing::info!(
            bind_addr = %bind_addr,
            rate_window_secs,
            rate_max_requests,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            rate_window: Duration::from_secs(rate_window_secs),
            rate_max_requests,
        })
    }
}

/// Read an integer environment variable, falling back to `default` when
/// unset.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {name} {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}
