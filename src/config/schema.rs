//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the outbound guard.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Command group definitions; one isolation pool is built per group.
    pub groups: Vec<GroupConfig>,

    /// User service client settings.
    pub user_service: UserServiceConfig,

    /// Statistics event publisher settings.
    pub statistics: StatisticsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            user_service: UserServiceConfig::default(),
            statistics: StatisticsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// One command group and the bounds of its isolation pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// Group name commands are submitted under (e.g. "User").
    pub name: String,

    /// Commands of this group allowed to execute at the same time.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Commands allowed to wait for a running slot. Zero means a full
    /// pool rejects immediately.
    #[serde(default = "default_max_queued")]
    pub max_queued: usize,

    /// Execution window applied when a command carries no override.
    #[serde(default = "default_group_timeout_ms")]
    pub default_timeout_ms: u64,
}

fn default_max_concurrent() -> usize {
    10
}

fn default_max_queued() -> usize {
    0
}

fn default_group_timeout_ms() -> u64 {
    1000
}

fn default_groups() -> Vec<GroupConfig> {
    vec![
        GroupConfig {
            name: "User".to_string(),
            max_concurrent: default_max_concurrent(),
            max_queued: default_max_queued(),
            default_timeout_ms: 1000,
        },
        GroupConfig {
            name: "Statistics".to_string(),
            max_concurrent: default_max_concurrent(),
            max_queued: 5,
            default_timeout_ms: 2000,
        },
    ]
}

/// User service client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserServiceConfig {
    /// Base URL of the user service (e.g. "http://localhost:8081").
    pub route: String,

    /// Command group user lookups run under.
    pub group: String,

    /// Per-call execution window in milliseconds.
    pub timeout_ms: u64,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            route: "http://localhost:8081".to_string(),
            group: "User".to_string(),
            timeout_ms: 1000,
        }
    }
}

/// Statistics event publisher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Base URL of the event broker's HTTP ingestion endpoint.
    pub broker_url: String,

    /// Routing key advertisement-view events are published under.
    pub routing_key: String,

    /// Command group publishes run under.
    pub group: String,

    /// Per-publish execution window in milliseconds.
    pub timeout_ms: u64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            broker_url: "http://localhost:15672".to_string(),
            routing_key: "statistics.adIsShown".to_string(),
            group: "Statistics".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_both_standard_groups() {
        let config = GuardConfig::default();
        let names: Vec<&str> = config.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["User", "Statistics"]);
        assert_eq!(config.user_service.group, "User");
        assert_eq!(config.statistics.group, "Statistics");
        assert_eq!(config.user_service.timeout_ms, 1000);
        assert_eq!(config.statistics.timeout_ms, 2000);
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: GuardConfig = toml::from_str("").unwrap();
        assert_eq!(config.groups.len(), 2);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn partial_group_definition_fills_in_defaults() {
        let config: GuardConfig = toml::from_str(
            r#"
            [[groups]]
            name = "Billing"
            max_concurrent = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.groups.len(), 1);
        let group = &config.groups[0];
        assert_eq!(group.name, "Billing");
        assert_eq!(group.max_concurrent, 4);
        assert_eq!(group.max_queued, 0);
        assert_eq!(group.default_timeout_ms, 1000);
    }

    #[test]
    fn facade_sections_parse() {
        let config: GuardConfig = toml::from_str(
            r#"
            [user_service]
            route = "http://users.internal:8081"
            timeout_ms = 750

            [statistics]
            broker_url = "http://broker.internal:15672"
            routing_key = "statistics.adIsShown"
            "#,
        )
        .unwrap();
        assert_eq!(config.user_service.route, "http://users.internal:8081");
        assert_eq!(config.user_service.timeout_ms, 750);
        assert_eq!(config.statistics.group, "Statistics");
    }
}
