//! Configuration management for the uptime reporter

use crate::aggregate::DEFAULT_WINDOWS;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the persisted uptime log
    pub store_path: String,

    /// Webhook URL for the routine report
    pub report_webhook_url: String,

    /// Webhook URL for the critical alarm
    pub alarm_webhook_url: String,

    /// HTTP timeout for webhook requests
    pub http_timeout: Duration,

    /// Lookback windows, in days
    pub windows: Vec<u32>,

    /// Services whose samples are coerced against the latency ceiling
    /// instead of requiring a boolean flag
    pub latency_services: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: "uptime-log.json".to_string(),
            report_webhook_url: String::new(),
            alarm_webhook_url: String::new(),
            http_timeout: Duration::from_secs(10),
            windows: DEFAULT_WINDOWS.to_vec(),
            latency_services: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(store_path) = env::var("UPTIME_LOG") {
            config.store_path = store_path;
        }

        if let Ok(url) = env::var("REPORT_WEBHOOK_URL") {
            config.report_webhook_url = url;
        }

        if let Ok(url) = env::var("ALARM_WEBHOOK_URL") {
            config.alarm_webhook_url = url;
        }

        if let Ok(timeout) = env::var("HTTP_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.http_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(windows) = env::var("REPORT_WINDOWS") {
            let parsed: Vec<u32> = windows
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if !parsed.is_empty() {
                config.windows = parsed;
            }
        }

        if let Ok(services) = env::var("LATENCY_SERVICES") {
            config.latency_services = services
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }

    /// Validate the parts every command needs
    pub fn validate(&self) -> Result<(), String> {
        if self.store_path.is_empty() {
            return Err("store_path cannot be empty".to_string());
        }

        if self.windows.is_empty() {
            return Err("at least one report window must be configured".to_string());
        }

        if self.windows.contains(&0) {
            return Err("report windows must be at least one day".to_string());
        }

        Ok(())
    }

    /// Validate the webhook destinations; only the report command needs them
    pub fn validate_webhooks(&self) -> Result<(), String> {
        if self.report_webhook_url.is_empty() {
            return Err("report_webhook_url cannot be empty".to_string());
        }

        if self.alarm_webhook_url.is_empty() {
            return Err("alarm_webhook_url cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.store_path, "uptime-log.json");
        assert_eq!(config.windows, vec![30, 100, 365]);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_defaults_have_no_webhooks() {
        let config = Config::default();
        assert!(config.validate_webhooks().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_windows() {
        let mut config = Config::default();
        config.windows = vec![];
        assert!(config.validate().is_err());

        config.windows = vec![30, 0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_store_path() {
        let mut config = Config::default();
        config.store_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_webhook_validation_requires_both_urls() {
        let mut config = Config::default();
        config.report_webhook_url = "https://chat.example/report".to_string();
        assert!(config.validate_webhooks().is_err());

        config.alarm_webhook_url = "https://chat.example/alarm".to_string();
        assert!(config.validate_webhooks().is_ok());
    }
}
