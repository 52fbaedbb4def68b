//! Access Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::team::{TeamSizeLimit, TeamSizeTiers};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable lines.
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => bail!("unknown log format '{other}' (expected 'json' or 'pretty')"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive (e.g., "info" or "`ev_access=debug`")
    pub filter: String,

    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

/// Access configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Per-tier team size defaults (`TEAM_LIMIT_*`)
    pub team_limits: TeamSizeTiers,

    /// Logging (`LOG_FILTER`, `LOG_FORMAT`)
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = TeamSizeTiers::default();

        Ok(Self {
            team_limits: TeamSizeTiers {
                free: env_limit("TEAM_LIMIT_FREE", defaults.free)?,
                starter: env_limit("TEAM_LIMIT_STARTER", defaults.starter)?,
                professional: env_limit("TEAM_LIMIT_PROFESSIONAL", defaults.professional)?,
                enterprise: env_limit("TEAM_LIMIT_ENTERPRISE", defaults.enterprise)?,
            },
            log: LogConfig {
                filter: env::var("LOG_FILTER").unwrap_or_else(|_| "info".into()),
                format: match env::var("LOG_FORMAT") {
                    Ok(value) => value.parse::<LogFormat>().context("Invalid LOG_FORMAT")?,
                    Err(_) => LogFormat::default(),
                },
            },
        })
    }

    /// Load a `.env` file if present, then read the environment.
    pub fn from_env_file() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to load .env file"),
        }
        Self::from_env()
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            team_limits: TeamSizeTiers::default(),
            log: LogConfig {
                filter: "debug".into(),
                format: LogFormat::Pretty,
            },
        }
    }
}

fn env_limit(name: &str, default: TeamSizeLimit) -> Result<TeamSizeLimit> {
    match env::var(name) {
        Ok(value) => value
            .parse::<TeamSizeLimit>()
            .with_context(|| format!("Invalid {name}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const VARS: &[&str] = &[
        "TEAM_LIMIT_FREE",
        "TEAM_LIMIT_STARTER",
        "TEAM_LIMIT_PROFESSIONAL",
        "TEAM_LIMIT_ENTERPRISE",
        "LOG_FILTER",
        "LOG_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.team_limits, TeamSizeTiers::default());
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    #[serial]
    fn test_limits_from_env() {
        clear_env();
        env::set_var("TEAM_LIMIT_STARTER", "10");
        env::set_var("TEAM_LIMIT_ENTERPRISE", "500");
        env::set_var("TEAM_LIMIT_PROFESSIONAL", "unlimited");

        let config = Config::from_env().unwrap();
        assert_eq!(config.team_limits.free, TeamSizeLimit::Limited(1));
        assert_eq!(config.team_limits.starter, TeamSizeLimit::Limited(10));
        assert_eq!(config.team_limits.professional, TeamSizeLimit::Unbounded);
        assert_eq!(config.team_limits.enterprise, TeamSizeLimit::Limited(500));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_limit_is_error() {
        clear_env();
        env::set_var("TEAM_LIMIT_FREE", "0");

        let err = Config::from_env().unwrap_err();
        assert!(format!("{err:#}").contains("TEAM_LIMIT_FREE"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_log_settings_from_env() {
        clear_env();
        env::set_var("LOG_FILTER", "ev_access=debug");
        env::set_var("LOG_FORMAT", "JSON");

        let config = Config::from_env().unwrap();
        assert_eq!(config.log.filter, "ev_access=debug");
        assert_eq!(config.log.format, LogFormat::Json);

        env::set_var("LOG_FORMAT", "xml");
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_default_for_test() {
        let config = Config::default_for_test();
        assert_eq!(config.team_limits.starter, TeamSizeLimit::Limited(5));
    }
}
