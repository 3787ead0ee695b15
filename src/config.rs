//! Configuration management

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::solver::SolveOptions;
use crate::source::SourceConfig;

/// Runtime configuration of the planner service.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub solve: SolveOptions,
    /// Delay between refresh cycles.
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            solve: SolveOptions::default(),
            poll_interval: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup; unset keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let base_url = lookup("COURIER_API_URL").unwrap_or(defaults.source.base_url);
        let timeout_secs = parse(&lookup, "COURIER_TIMEOUT_SECS", defaults.source.timeout_secs)?;
        let lookback_minutes =
            parse(&lookup, "COURIER_LOOKBACK_MINUTES", defaults.source.lookback_minutes)?;
        let poll_secs = parse(&lookup, "COURIER_POLL_SECS", defaults.poll_interval.as_secs())?;
        let max_route_minutes =
            parse(&lookup, "COURIER_MAX_ROUTE_MINUTES", defaults.solve.max_route_minutes)?;
        let service_minutes =
            parse(&lookup, "COURIER_SERVICE_MINUTES", defaults.solve.service_minutes)?;

        if lookback_minutes <= 0 {
            return Err(invalid("COURIER_LOOKBACK_MINUTES", lookback_minutes));
        }
        if !(max_route_minutes > 0.0) {
            return Err(invalid("COURIER_MAX_ROUTE_MINUTES", max_route_minutes));
        }
        if !(service_minutes >= 0.0) {
            return Err(invalid("COURIER_SERVICE_MINUTES", service_minutes));
        }

        Ok(Self {
            source: SourceConfig {
                base_url,
                timeout_secs,
                lookback_minutes,
            },
            solve: SolveOptions {
                max_route_minutes,
                service_minutes,
            },
            poll_interval: Duration::from_secs(poll_secs),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn invalid(key: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}
