//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pools and clients produce:
//!     → logging.rs (structured log events, correlation id on every line)
//!     → metrics.rs (counters, gauges, histograms per command group)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Failure is never silent: every terminal command state is logged and counted
//! - Correlation ID flows through all subsystems
//! - Metric updates are cheap enough for the hot path

pub mod logging;
pub mod metrics;
