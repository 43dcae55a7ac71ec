use inftom_macros::config;

use crate::logger::LogLevel;

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        match self {
            Some(t) => Some(t),
            None => or,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    pub struct RunConfig {
        word_separator: String = String::from(","),
        trace: bool = false,
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}

impl GeneralConfig for RunConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}

#[test]
fn test_run_config_partial_toml() {
    let config = RunConfig::from_toml(
        r#"
        trace = true

        [logger]
        enabled = true
        "#,
    )
    .unwrap();

    assert_eq!(config.get_word_separator(), ",");
    assert!(*config.get_trace());
    assert!(*config.logger().get_enabled());
    assert!(!*config.logger().get_log_file());
    assert_eq!(*config.logger().get_log_level(), LogLevel::Warn);
}

#[test]
fn test_run_config_empty_toml() {
    let config = RunConfig::from_toml("").unwrap();

    assert_eq!(config.get_word_separator(), ",");
    assert!(!*config.get_trace());
    assert!(!*config.logger().get_enabled());
}

#[test]
fn test_run_config_log_level() {
    let config = RunConfig::from_toml(
        r#"
        word_separator = " "

        [logger]
        log_level = "Debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.get_word_separator(), " ");
    assert_eq!(*config.logger().get_log_level(), LogLevel::Debug);
}
