//! Statistics event publisher.
//!
//! # Responsibilities
//! - Publish advertisement-view events to the statistics broker
//! - Keep the publish off the caller's path: the read path must not slow
//!   down or fail because the broker is unavailable
//!
//! Events are posted to the broker's HTTP ingestion endpoint under the
//! configured routing key, with the advertisement id as the body. A lost
//! event degrades the statistics, not the product, so dependency faults are
//! logged and swallowed.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use url::Url;

use crate::command::{Command, Outcome};
use crate::config::{ConfigError, StatisticsConfig, ValidationError};
use crate::context::{CorrelationId, X_CORRELATION_ID};
use crate::failure::RemoteError;
use crate::isolation::{IsolationPool, PoolRegistry};

const AD_SHOWN_KEY: &str = "Statistics.adIsShown";

/// Guarded publisher for advertisement-view events.
#[derive(Debug, Clone)]
pub struct StatisticsServiceClient {
    http: reqwest::Client,
    publish_url: Url,
    pool: Arc<IsolationPool>,
    timeout: Duration,
}

impl StatisticsServiceClient {
    /// Builds a publisher from validated configuration.
    pub fn new(
        config: &StatisticsConfig,
        registry: &PoolRegistry,
        http: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        let broker: Url = config.broker_url.parse().map_err(|e: url::ParseError| {
            ConfigError::Validation(vec![ValidationError::InvalidUrl {
                section: "statistics",
                value: config.broker_url.clone(),
                reason: e.to_string(),
            }])
        })?;
        if broker.cannot_be_a_base() {
            return Err(ConfigError::Validation(vec![ValidationError::InvalidUrl {
                section: "statistics",
                value: config.broker_url.clone(),
                reason: "not a base URL".to_string(),
            }]));
        }
        let mut publish_url = broker;
        publish_url
            .path_segments_mut()
            .expect("broker URL is a base URL")
            .pop_if_empty()
            .extend(["publish", config.routing_key.as_str()]);
        let pool = registry.get(&config.group).ok_or_else(|| {
            ConfigError::Validation(vec![ValidationError::UnknownGroup {
                section: "statistics",
                group: config.group.clone(),
            }])
        })?;
        Ok(Self {
            http,
            publish_url,
            pool,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// Record that an advertisement was shown.
    ///
    /// Fire and forget: the publish runs on a spawned task and this call
    /// returns immediately, whatever the broker is doing. Must be called
    /// from within a Tokio runtime. The handle can be awaited when the
    /// caller needs the publish to have settled; dropping it detaches the
    /// task.
    pub fn advertisement_is_shown(&self, id: u64, correlation: CorrelationId) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            let _ = client.publish(id, correlation).await;
        })
    }

    /// Runs one publish under the statistics pool's bounds.
    ///
    /// No fallback exists for a lost event; failures are logged here and
    /// carried in the returned outcome.
    async fn publish(&self, id: u64, correlation: CorrelationId) -> Outcome<()> {
        let http = self.http.clone();
        let url = self.publish_url.clone();
        let operation = move || async move {
            tracing::info!(
                ad_id = id,
                correlation_id = %correlation,
                "Publishing advertisement view event"
            );
            let response = http
                .post(url)
                .header(X_CORRELATION_ID, correlation.to_string())
                .body(id.to_string())
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
            Ok(())
        };

        let command = Command::new(AD_SHOWN_KEY, correlation, operation).with_timeout(self.timeout);
        let outcome = self.pool.submit(command).await;
        if let Outcome::Failed(err) = &outcome {
            tracing::warn!(
                ad_id = id,
                correlation_id = %correlation,
                cause = %err.kind(),
                error = %err,
                "Dropped advertisement view event"
            );
        }
        outcome
    }
}
