//! User service client.
//!
//! # Responsibilities
//! - Fetch user records from the user service under the "User" group's bounds
//! - Degrade to "not premium" when the user service is slow or failing
//! - Propagate caller faults (bad ids) unchanged
//!
//! The downstream contract follows the bulletin-board user service: a GET to
//! `{route}/api/v1.0/users/{id}` answering `{"premiumUser": bool}`.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::command::{Command, Outcome};
use crate::config::{ConfigError, UserServiceConfig, ValidationError};
use crate::context::{CorrelationId, X_CORRELATION_ID};
use crate::failure::{CommandError, RemoteError};
use crate::isolation::{IsolationPool, PoolRegistry};

const GET_USER_KEY: &str = "User.getById";

/// Payload returned by the user service.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "premiumUser")]
    pub premium_user: bool,
}

/// Guarded client for the user service.
#[derive(Debug, Clone)]
pub struct UserServiceClient {
    http: reqwest::Client,
    route: Url,
    pool: Arc<IsolationPool>,
    timeout: Duration,
}

impl UserServiceClient {
    /// Builds a client from validated configuration.
    ///
    /// Fails when the route does not parse as a base URL or the configured
    /// group has no pool in the registry.
    pub fn new(
        config: &UserServiceConfig,
        registry: &PoolRegistry,
        http: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        let route: Url = config.route.parse().map_err(|e: url::ParseError| {
            ConfigError::Validation(vec![ValidationError::InvalidUrl {
                section: "user_service",
                value: config.route.clone(),
                reason: e.to_string(),
            }])
        })?;
        if route.cannot_be_a_base() {
            return Err(ConfigError::Validation(vec![ValidationError::InvalidUrl {
                section: "user_service",
                value: config.route.clone(),
                reason: "not a base URL".to_string(),
            }]));
        }
        let pool = registry.get(&config.group).ok_or_else(|| {
            ConfigError::Validation(vec![ValidationError::UnknownGroup {
                section: "user_service",
                group: config.group.clone(),
            }])
        })?;
        Ok(Self {
            http,
            route,
            pool,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// Whether the given user has premium status.
    ///
    /// Dependency faults (timeout, 5xx, transport, pool rejection) degrade
    /// to `Ok(false)` so one slow user service never blocks the caller's
    /// page. A 4xx from the user service means the id itself was bad and is
    /// returned as an error.
    pub async fn is_premium_user(
        &self,
        id: &str,
        correlation: CorrelationId,
    ) -> Result<bool, CommandError> {
        let url = self.endpoint(id);
        let http = self.http.clone();
        let operation = move || async move {
            tracing::info!(url = %url, correlation_id = %correlation, "Requesting user record");
            let response = http
                .get(url)
                .header(X_CORRELATION_ID, correlation.to_string())
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(RemoteError::Status {
                    code: status.as_u16(),
                    detail,
                });
            }
            let user: User = response.json().await?;
            tracing::info!(
                correlation_id = %correlation,
                premium = user.premium_user,
                "Received user record"
            );
            Ok(user.premium_user)
        };

        let command = Command::new(GET_USER_KEY, correlation, operation)
            .with_timeout(self.timeout)
            .with_fallback(|| false);

        match self.pool.submit(command).await {
            Outcome::Success(premium) => Ok(premium),
            Outcome::FallbackApplied { value, cause } => {
                tracing::warn!(
                    user_id = %id,
                    correlation_id = %correlation,
                    cause = %cause,
                    "User service degraded, treating user as non-premium"
                );
                Ok(value)
            }
            Outcome::Failed(err) => Err(err),
        }
    }

    fn endpoint(&self, id: &str) -> Url {
        let mut url = self.route.clone();
        url.path_segments_mut()
            .expect("user service route is a base URL")
            .pop_if_empty()
            .extend(["api", "v1.0", "users", id]);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(route: &str) -> UserServiceClient {
        let config = UserServiceConfig {
            route: route.to_string(),
            ..UserServiceConfig::default()
        };
        let registry = PoolRegistry::from_config(&crate::config::GuardConfig::default().groups);
        UserServiceClient::new(&config, &registry, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn endpoint_appends_the_users_path() {
        let client = client("http://localhost:8081");
        assert_eq!(
            client.endpoint("42").as_str(),
            "http://localhost:8081/api/v1.0/users/42"
        );
    }

    #[test]
    fn endpoint_respects_a_route_prefix() {
        let client = client("http://localhost:8081/tenant-a/");
        assert_eq!(
            client.endpoint("42").as_str(),
            "http://localhost:8081/tenant-a/api/v1.0/users/42"
        );
    }

    #[test]
    fn endpoint_escapes_unsafe_ids() {
        let client = client("http://localhost:8081");
        assert_eq!(
            client.endpoint("a/b").as_str(),
            "http://localhost:8081/api/v1.0/users/a%2Fb"
        );
    }

    #[test]
    fn construction_rejects_a_bad_route() {
        let config = UserServiceConfig {
            route: "not a url".to_string(),
            ..UserServiceConfig::default()
        };
        let registry = PoolRegistry::from_config(&crate::config::GuardConfig::default().groups);
        let result = UserServiceClient::new(&config, &registry, reqwest::Client::new());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn construction_rejects_an_unknown_group() {
        let config = UserServiceConfig {
            group: "Missing".to_string(),
            ..UserServiceConfig::default()
        };
        let registry = PoolRegistry::from_config(&crate::config::GuardConfig::default().groups);
        let result = UserServiceClient::new(&config, &registry, reqwest::Client::new());
        match result {
            Err(ConfigError::Validation(errors)) => assert_eq!(
                errors,
                vec![ValidationError::UnknownGroup {
                    section: "user_service",
                    group: "Missing".to_string(),
                }]
            ),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn user_payload_decodes_the_wire_field_name() {
        let user: User = serde_json::from_str(r#"{"premiumUser": true}"#).unwrap();
        assert!(user.premium_user);
    }
}
