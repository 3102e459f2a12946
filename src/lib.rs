//! Resilient outbound-call core.
//!
//! Wraps calls to remote dependencies in commands that are isolated per
//! dependency group, bounded in latency, and able to degrade to a fallback
//! value instead of failing the caller.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌────────────────────────────────────────────────┐
//!                       │                 OUTBOUND GUARD                 │
//!                       │                                                │
//!   caller              │  ┌──────────┐      ┌──────────────────────┐    │
//!   ────────────────────┼─▶│ clients  │─────▶│ isolation            │    │
//!   is_premium_user(..) │  │ user/    │      │  registry ─▶ pool    │    │     downstream
//!   advertisement_is_   │  │ stats    │      │  occupancy gate      │────┼───▶ services
//!   shown(..)           │  └────┬─────┘      │  running gate        │    │
//!                       │       │            │  timeout + fallback  │    │
//!                       │       ▼            └──────────┬───────────┘    │
//!                       │  ┌──────────┐      ┌──────────▼───────────┐    │
//!                       │  │ command  │      │ failure              │    │
//!                       │  │ Outcome  │      │ classify / taxonomy  │    │
//!                       │  └──────────┘      └──────────────────────┘    │
//!                       │                                                │
//!                       │  ┌──────────────────────────────────────────┐  │
//!                       │  │          Cross-Cutting Concerns          │  │
//!                       │  │  ┌────────┐  ┌─────────┐  ┌───────────┐  │  │
//!                       │  │  │ config │  │ context │  │ observa-  │  │  │
//!                       │  │  │        │  │ corr-id │  │ bility    │  │  │
//!                       │  │  └────────┘  └─────────┘  └───────────┘  │  │
//!                       │  └──────────────────────────────────────────┘  │
//!                       └────────────────────────────────────────────────┘
//! ```
//!
//! The guarantees: a caller waits at most queue admission plus the
//! effective timeout, a misbehaving dependency can only exhaust its own
//! group's slots, caller faults are never masked by fallbacks, and no
//! failure is silent.

// Core subsystems
pub mod command;
pub mod failure;
pub mod isolation;

// Dependency facades
pub mod clients;

// Cross-cutting concerns
pub mod config;
pub mod context;
pub mod observability;

pub use clients::{StatisticsServiceClient, UserServiceClient};
pub use command::{Command, Outcome};
pub use config::{load_config, GuardConfig};
pub use context::{CorrelationId, X_CORRELATION_ID};
pub use failure::{classify, CommandError, FailureKind, RemoteError};
pub use isolation::{IsolationPool, PoolRegistry};
