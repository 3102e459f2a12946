//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (facades reference existing groups)
//! - Validate value ranges (bounds and timeouts > 0, URLs parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GuardConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GuardConfig;

/// One semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("group name must not be empty")]
    EmptyGroupName,
    #[error("duplicate group \"{0}\"")]
    DuplicateGroup(String),
    #[error("group \"{0}\": max_concurrent must be at least 1")]
    ZeroConcurrency(String),
    #[error("group \"{0}\": default_timeout_ms must be at least 1")]
    ZeroGroupTimeout(String),
    #[error("{section}: timeout_ms must be at least 1")]
    ZeroFacadeTimeout { section: &'static str },
    #[error("{section}: references unknown group \"{group}\"")]
    UnknownGroup {
        section: &'static str,
        group: String,
    },
    #[error("{section}: invalid URL \"{value}\": {reason}")]
    InvalidUrl {
        section: &'static str,
        value: String,
        reason: String,
    },
    #[error("statistics: routing_key must not be empty")]
    EmptyRoutingKey,
    #[error("observability: invalid metrics_address \"{0}\"")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for group in &config.groups {
        if group.name.is_empty() {
            errors.push(ValidationError::EmptyGroupName);
        } else if !seen.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup(group.name.clone()));
        }
        if group.max_concurrent == 0 {
            errors.push(ValidationError::ZeroConcurrency(group.name.clone()));
        }
        if group.default_timeout_ms == 0 {
            errors.push(ValidationError::ZeroGroupTimeout(group.name.clone()));
        }
    }

    check_base_url("user_service", &config.user_service.route, &mut errors);
    if !seen.contains(config.user_service.group.as_str()) {
        errors.push(ValidationError::UnknownGroup {
            section: "user_service",
            group: config.user_service.group.clone(),
        });
    }
    if config.user_service.timeout_ms == 0 {
        errors.push(ValidationError::ZeroFacadeTimeout {
            section: "user_service",
        });
    }

    check_base_url("statistics", &config.statistics.broker_url, &mut errors);
    if !seen.contains(config.statistics.group.as_str()) {
        errors.push(ValidationError::UnknownGroup {
            section: "statistics",
            group: config.statistics.group.clone(),
        });
    }
    if config.statistics.timeout_ms == 0 {
        errors.push(ValidationError::ZeroFacadeTimeout {
            section: "statistics",
        });
    }
    if config.statistics.routing_key.is_empty() {
        errors.push(ValidationError::EmptyRoutingKey);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(section: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError::InvalidUrl {
            section,
            value: value.to_string(),
            reason: "not a base URL".to_string(),
        }),
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::InvalidUrl {
                section,
                value: value.to_string(),
                reason: format!("unsupported scheme \"{}\"", url.scheme()),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUrl {
            section,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GuardConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_problem() {
        let mut config = GuardConfig::default();
        config.groups[0].max_concurrent = 0;
        config.groups[0].default_timeout_ms = 0;
        config.user_service.route = "not a url".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroConcurrency("User".to_string())));
        assert!(errors.contains(&ValidationError::ZeroGroupTimeout("User".to_string())));
    }

    #[test]
    fn facade_must_reference_a_defined_group() {
        let mut config = GuardConfig::default();
        config.user_service.group = "Missing".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownGroup {
                section: "user_service",
                group: "Missing".to_string(),
            }]
        );
    }

    #[test]
    fn duplicate_groups_are_reported() {
        let mut config = GuardConfig::default();
        let dup = config.groups[0].clone();
        config.groups.push(dup);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateGroup("User".to_string())));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let mut config = GuardConfig::default();
        config.statistics.broker_url = "amqp://localhost:5672".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidUrl {
                section: "statistics",
                ..
            }
        ));
    }

    #[test]
    fn metrics_address_is_only_checked_when_enabled() {
        let mut config = GuardConfig::default();
        config.observability.metrics_address = "nonsense".to_string();
        assert_eq!(validate_config(&config), Ok(()));

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidMetricsAddress("nonsense".to_string())]
        );
    }
}
