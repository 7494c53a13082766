//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `autowater.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use autowater_adapter_mail::MailConfig;
use autowater_adapter_mqtt::MqttConfig;
use autowater_app::driver::TickMode;
use autowater_domain::reservoir::{InitialReading, ReservoirSpec};
use autowater_domain::schedule::DailySchedule;

const CONFIG_FILE: &str = "autowater.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tank parameters and the startup sensor reading.
    pub reservoir: ReservoirConfig,
    /// Tick source and pacing.
    pub tick: TickConfig,
    /// MQTT broker settings.
    pub mqtt: MqttConfig,
    /// Notification mail settings.
    pub mail: MailConfig,
    /// Daily reminder mails.
    pub reminder: ReminderConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Reservoir parameters, in liters and liters per tick.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReservoirConfig {
    pub min_volume: u32,
    pub max_volume: u32,
    pub out_rate: u32,
    pub in_rate: u32,
    /// Water in the tank at startup.
    pub water_level: u32,
    /// Soil humidity at startup, in tenths of a percent.
    pub humidity_level: u32,
    /// Pump state at startup.
    pub pump_on: bool,
}

/// Tick driver configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// `timer` or `bus`.
    pub mode: TickMode,
    /// Tick period (timer mode) or minimum spacing per channel (bus mode).
    pub interval_ms: u64,
    /// Minimum time between two pump switches. `0` disables settling.
    pub pump_settle_ms: u64,
}

/// Reminder schedule.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Local wall-clock times, `HH:MM`.
    pub times: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `autowater.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("AUTOWATER_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(val) = var("AUTOWATER_MQTT_PORT") {
            if let Ok(port) = val.parse() {
                self.mqtt.broker_port = port;
            }
        }
        if let Some(val) = var("AUTOWATER_SMTP_USERNAME") {
            self.mail.username = val;
        }
        if let Some(val) = var("AUTOWATER_SMTP_PASSWORD") {
            self.mail.password = val;
        }
        if let Some(val) = var("AUTOWATER_MAIL_TO") {
            self.mail.to = val;
        }
        if let Some(val) = var("AUTOWATER_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.reservoir
            .spec()
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        if self.tick.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "MQTT port must be non-zero".to_string(),
            ));
        }
        if self.mail.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "mail attempts must be non-zero".to_string(),
            ));
        }
        if self.mail.enabled && self.mail.to.is_empty() {
            return Err(ConfigError::Validation(
                "mail is enabled but no recipient is set".to_string(),
            ));
        }
        self.reminder.schedule()?;
        Ok(())
    }
}

impl ReservoirConfig {
    #[must_use]
    pub fn spec(&self) -> ReservoirSpec {
        ReservoirSpec {
            min_volume: self.min_volume,
            max_volume: self.max_volume,
            out_rate: self.out_rate,
            in_rate: self.in_rate,
        }
    }

    #[must_use]
    pub fn initial_reading(&self) -> InitialReading {
        InitialReading {
            water_level: self.water_level,
            humidity_level: self.humidity_level,
            pump_on: self.pump_on,
        }
    }
}

impl TickConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn pump_settle(&self) -> Duration {
        Duration::from_millis(self.pump_settle_ms)
    }
}

impl ReminderConfig {
    /// Parse the configured times.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a malformed or empty list.
    pub fn schedule(&self) -> Result<DailySchedule, ConfigError> {
        DailySchedule::parse(self.times.as_slice()).map_err(|err| ConfigError::Validation(err.to_string()))
    }
}

impl Default for ReservoirConfig {
    fn default() -> Self {
        let spec = ReservoirSpec::default();
        let reading = InitialReading::default();
        Self {
            min_volume: spec.min_volume,
            max_volume: spec.max_volume,
            out_rate: spec.out_rate,
            in_rate: spec.in_rate,
            water_level: reading.water_level,
            humidity_level: reading.humidity_level,
            pump_on: reading.pump_on,
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            mode: TickMode::Timer,
            interval_ms: 1000,
            pump_settle_ms: 1000,
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            times: vec!["08:00".to_string(), "22:00".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autowaterd=info,autowater=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.reservoir.spec(), ReservoirSpec::default());
        assert_eq!(config.reservoir.initial_reading(), InitialReading::default());
        assert_eq!(config.tick.mode, TickMode::Timer);
        assert_eq!(config.tick.interval(), Duration::from_secs(1));
        assert_eq!(config.tick.pump_settle(), Duration::from_secs(1));
        assert_eq!(config.mqtt.broker_host, "localhost");
        assert!(!config.mail.enabled);
        assert_eq!(config.reminder.schedule().unwrap(), DailySchedule::default());
        assert_eq!(config.logging.filter, "autowaterd=info,autowater=info");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.reservoir.max_volume, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [reservoir]
            min_volume = 10
            max_volume = 500
            out_rate = 20
            in_rate = 2
            water_level = 250
            humidity_level = 350
            pump_on = true

            [tick]
            mode = 'bus'
            interval_ms = 250
            pump_settle_ms = 0

            [mqtt]
            broker_host = 'broker.local'

            [mail]
            enabled = true
            to = 'owner@example.com'

            [reminder]
            times = ['07:30']

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.reservoir.spec().max_volume, 500);
        assert_eq!(config.reservoir.initial_reading().water_level, 250);
        assert!(config.reservoir.initial_reading().pump_on);
        assert_eq!(config.tick.mode, TickMode::Bus);
        assert_eq!(config.tick.interval(), Duration::from_millis(250));
        assert_eq!(config.tick.pump_settle(), Duration::ZERO);
        assert_eq!(config.mqtt.broker_host, "broker.local");
        assert_eq!(config.mqtt.broker_port, 1883);
        assert!(config.mail.enabled);
        assert_eq!(config.reminder.schedule().unwrap().times().len(), 1);
        assert_eq!(config.logging.filter, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.mqtt.broker_port, 1883);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_tick_mode() {
        let result: Result<Config, _> = toml::from_str("[tick]\nmode = 'sometimes'");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("AUTOWATER_MQTT_HOST", "10.0.0.2"),
            ("AUTOWATER_MQTT_PORT", "8883"),
            ("AUTOWATER_SMTP_USERNAME", "garden@example.com"),
            ("AUTOWATER_SMTP_PASSWORD", "secret"),
            ("AUTOWATER_MAIL_TO", "owner@example.com"),
            ("AUTOWATER_LOG", "trace"),
        ]));
        assert_eq!(config.mqtt.broker_host, "10.0.0.2");
        assert_eq!(config.mqtt.broker_port, 8883);
        assert_eq!(config.mail.username, "garden@example.com");
        assert_eq!(config.mail.password, "secret");
        assert_eq!(config.mail.to, "owner@example.com");
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_prefer_rust_log_over_autowater_log() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("AUTOWATER_LOG", "trace"), ("RUST_LOG", "warn")]));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_ignore_unparsable_port_override() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("AUTOWATER_MQTT_PORT", "mqtt")]));
        assert_eq!(config.mqtt.broker_port, 1883);
    }

    #[test]
    fn should_reject_empty_reservoir_range() {
        let mut config = Config::default();
        config.reservoir.min_volume = 1000;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_tick_interval() {
        let mut config = Config::default();
        config.tick.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.mqtt.broker_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_mail_attempts() {
        let mut config = Config::default();
        config.mail.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_enabled_mail_without_recipient() {
        let mut config = Config::default();
        config.mail.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_malformed_reminder_time() {
        let mut config = Config::default();
        config.reminder.times = vec!["8 o'clock".to_string()];
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: invalid time of day \"8 o'clock\", expected HH:MM"
        );
    }

    #[test]
    fn should_reject_empty_reminder_schedule() {
        let mut config = Config::default();
        config.reminder.times.clear();
        assert!(config.validate().is_err());
    }
}
