//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define the guard's metrics (outcomes, latency, fallbacks, occupancy)
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `guard_commands_total` (counter): terminal outcomes by group and kind
//! - `guard_command_duration_seconds` (histogram): submission-to-terminal latency
//! - `guard_fallbacks_total` (counter): fallbacks applied, by group and cause
//! - `guard_rejections_total` (counter): pool rejections by group
//! - `guard_pool_occupancy` (gauge): admitted, not yet terminal commands
//!
//! # Design Decisions
//! - Recording functions never fail; with no recorder installed they are no-ops
//! - Labels are limited to group/outcome to keep cardinality flat

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on the given address.
///
/// Must run inside a Tokio runtime. A failed install is logged and the
/// process continues without exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one terminal command outcome and its latency.
pub fn record_command(group: &str, outcome: &str, start: Instant) {
    counter!(
        "guard_commands_total",
        "group" => group.to_owned(),
        "outcome" => outcome.to_owned()
    )
    .increment(1);
    histogram!("guard_command_duration_seconds", "group" => group.to_owned())
        .record(start.elapsed().as_secs_f64());
}

/// Record one applied fallback.
pub fn record_fallback(group: &str, cause: &str) {
    counter!(
        "guard_fallbacks_total",
        "group" => group.to_owned(),
        "cause" => cause.to_owned()
    )
    .increment(1);
}

/// Record one pool rejection.
pub fn record_rejection(group: &str) {
    counter!("guard_rejections_total", "group" => group.to_owned()).increment(1);
}

/// Record the current occupancy of a pool.
pub fn record_pool_occupancy(group: &str, occupied: usize) {
    gauge!("guard_pool_occupancy", "group" => group.to_owned()).set(occupied as f64);
}
