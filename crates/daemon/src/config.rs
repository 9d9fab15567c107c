//! Daemon configuration from `WAITLIST_*` environment variables
//!
//! Unset or unparsable values fall back to the defaults below.

use std::str::FromStr;
use waitlist_core::application::QueueServiceConfig;
use waitlist_core::domain::{BusinessHours, QueueSettings};
use waitlist_infra_memory::DEFAULT_EVENT_CAPACITY;

const DEFAULT_MAX_PARTY_SIZE: u32 = 8;
const DEFAULT_MIN_PARTY_SIZE: u32 = 1;
const DEFAULT_ALLOWED_OVER_CAPACITY: u32 = 10;
const DEFAULT_WAIT_MINUTES: i64 = 30;
const DEFAULT_NOTIFICATION_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Development: pretty formatting with colors
    Pretty,
    /// Production: JSON structured logging
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub log_format: LogFormat,
    /// Queues created at startup, all with `default_settings`
    pub bootstrap_queues: Vec<String>,
    pub default_settings: QueueSettings,
    pub business_hours: BusinessHours,
    pub strict_transitions: bool,
    pub event_capacity: usize,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let log_format = match lookup("WAITLIST_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let bootstrap_queues: Vec<String> = lookup("WAITLIST_QUEUES")
            .map(|names| {
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let default_settings = QueueSettings {
            max_party_size: parsed_or(&lookup, "WAITLIST_MAX_PARTY_SIZE", DEFAULT_MAX_PARTY_SIZE),
            min_party_size: parsed_or(&lookup, "WAITLIST_MIN_PARTY_SIZE", DEFAULT_MIN_PARTY_SIZE),
            allowed_over_capacity: parsed_or(
                &lookup,
                "WAITLIST_ALLOWED_OVER_CAPACITY",
                DEFAULT_ALLOWED_OVER_CAPACITY,
            ),
            default_estimated_wait_time: parsed_or(
                &lookup,
                "WAITLIST_DEFAULT_WAIT_MINUTES",
                DEFAULT_WAIT_MINUTES,
            ),
            notification_threshold: parsed_or(
                &lookup,
                "WAITLIST_NOTIFICATION_THRESHOLD",
                DEFAULT_NOTIFICATION_THRESHOLD,
            ),
        };

        let defaults = BusinessHours::default();
        let business_hours = BusinessHours {
            open_time: or("WAITLIST_OPEN_TIME", &defaults.open_time),
            close_time: or("WAITLIST_CLOSE_TIME", &defaults.close_time),
            timezone: or("WAITLIST_TIMEZONE", &defaults.timezone),
        };

        Self {
            log_format,
            bootstrap_queues,
            default_settings,
            business_hours,
            strict_transitions: parsed_or(&lookup, "WAITLIST_STRICT_TRANSITIONS", false),
            event_capacity: parsed_or(&lookup, "WAITLIST_EVENT_CAPACITY", DEFAULT_EVENT_CAPACITY),
        }
    }

    pub fn service_config(&self) -> QueueServiceConfig {
        QueueServiceConfig {
            strict_transitions: self.strict_transitions,
            default_business_hours: self.business_hours.clone(),
        }
    }
}

fn parsed_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> DaemonConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.bootstrap_queues.is_empty());
        assert_eq!(config.default_settings.max_party_size, 8);
        assert_eq!(config.default_settings.min_party_size, 1);
        assert_eq!(config.default_settings.default_estimated_wait_time, 30);
        assert_eq!(config.business_hours, BusinessHours::default());
        assert!(!config.strict_transitions);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("WAITLIST_LOG_FORMAT", "json"),
            ("WAITLIST_QUEUES", "Main Dining, Bar ,,"),
            ("WAITLIST_MAX_PARTY_SIZE", "12"),
            ("WAITLIST_DEFAULT_WAIT_MINUTES", "45"),
            ("WAITLIST_OPEN_TIME", "11:30"),
            ("WAITLIST_STRICT_TRANSITIONS", "true"),
        ]);

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.bootstrap_queues, vec!["Main Dining", "Bar"]);
        assert_eq!(config.default_settings.max_party_size, 12);
        assert_eq!(config.default_settings.default_estimated_wait_time, 45);
        assert_eq!(config.business_hours.open_time, "11:30");

        let service = config.service_config();
        assert!(service.strict_transitions);
        assert_eq!(service.default_business_hours.close_time, "22:00");
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config(&[
            ("WAITLIST_MAX_PARTY_SIZE", "lots"),
            ("WAITLIST_STRICT_TRANSITIONS", "yes"),
        ]);
        assert_eq!(config.default_settings.max_party_size, 8);
        assert!(!config.strict_transitions);
    }
}
