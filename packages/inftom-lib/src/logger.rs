use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// The level filter a subscriber should be installed with for the given
/// config. A disabled logger filters everything.
pub fn level_filter(config: &LoggerConfig) -> LevelFilter {
    if !*config.get_enabled() {
        return LevelFilter::OFF;
    }

    config.get_log_level().to_level_filter()
}

#[test]
fn test_log_level_from_str() {
    assert_eq!("DBG".parse::<LogLevel>(), Ok(LogLevel::Debug));
    assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
    assert_eq!("Err".parse::<LogLevel>(), Ok(LogLevel::Error));
    assert!("verbose".parse::<LogLevel>().is_err());
}

#[test]
fn test_level_filter_disabled() {
    let config = LoggerConfig::default().with_log_level(LogLevel::Debug);
    assert_eq!(level_filter(&config), LevelFilter::OFF);

    let config = config.with_enabled(true);
    assert_eq!(level_filter(&config), LevelFilter::DEBUG);
}
