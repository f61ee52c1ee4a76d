//! Daemon configuration.
//!
//! Every option can be given as a flag or through its environment
//! variable, so a container only needs `VTS_URL` and `SCRAPE_DURATION`.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("duration must be greater than zero")]
    ZeroDuration,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "vtsrated", about = "Per-backend request rates from nginx VTS", version)]
pub struct Config {
    /// URL of the VTS JSON status page.
    #[arg(long, env = "VTS_URL")]
    pub vts_url: String,

    /// Poll period, e.g. `15s`, `1m30s`, `500ms`.
    #[arg(long, env = "SCRAPE_DURATION", value_parser = parse_interval)]
    pub scrape_duration: Duration,

    /// Give up on a single status fetch after this long.
    #[arg(long, env = "SCRAPE_TIMEOUT", default_value = "10s", value_parser = parse_interval)]
    pub scrape_timeout: Duration,

    /// Address the metrics endpoint listens on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,
}

/// Parse a positive duration.
pub fn parse_interval(s: &str) -> Result<Duration, ConfigError> {
    let d = humantime::parse_duration(s.trim()).map_err(|e| ConfigError::InvalidDuration {
        value: s.to_string(),
        reason: e.to_string(),
    })?;
    if d.is_zero() {
        return Err(ConfigError::ZeroDuration);
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_interval_units() {
        assert_eq!(parse_interval("15s").unwrap(), Duration::from_secs(15));
        assert_eq!(parse_interval("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_interval("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_interval("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval(" 1h ").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn parse_interval_rejects_garbage() {
        assert!(matches!(
            parse_interval("soon"),
            Err(ConfigError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse_interval(""),
            Err(ConfigError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse_interval("-5s"),
            Err(ConfigError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn parse_interval_rejects_zero() {
        assert!(matches!(parse_interval("0s"), Err(ConfigError::ZeroDuration)));
    }

    #[test]
    fn config_from_flags() {
        let config = Config::try_parse_from([
            "vtsrated",
            "--vts-url",
            "http://127.0.0.1/status/format/json",
            "--scrape-duration",
            "15s",
        ])
        .unwrap();

        assert_eq!(config.vts_url, "http://127.0.0.1/status/format/json");
        assert_eq!(config.scrape_duration, Duration::from_secs(15));
        assert_eq!(config.scrape_timeout, Duration::from_secs(10));
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn config_rejects_bad_interval() {
        let result = Config::try_parse_from([
            "vtsrated",
            "--vts-url",
            "http://127.0.0.1/status",
            "--scrape-duration",
            "every now and then",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn config_takes_no_positional_arguments() {
        let result = Config::try_parse_from([
            "vtsrated",
            "http://127.0.0.1/status",
            "15s",
        ]);
        assert!(result.is_err());
    }
}
