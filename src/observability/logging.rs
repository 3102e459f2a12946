//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem once at startup
//! - Configure the log level from config, overridable via `RUST_LOG`
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log lines carry fields (group, key, correlation_id) instead of
//!   interpolated strings

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to this
/// crate only. Call once per process.
pub fn init_logging(config: &ObservabilityConfig) {
    let default_directive = format!("outbound_guard={}", config.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_directive)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
