//! Guarded command abstraction.
//!
//! # Responsibilities
//! - Bundle one outbound operation with its identity (group key), timeout
//!   override, correlation id, and optional fallback
//! - Represent the terminal outcome of a submission, fallback included
//!
//! A command is a value. Building one performs no I/O; nothing happens until
//! it is submitted to the isolation pool of its group:
//!
//! ```text
//!   Command::new(..) --> pool.submit(..) --> Outcome::Success(value)
//!                                        |-> Outcome::FallbackApplied { .. }
//!                                        |-> Outcome::Failed(error)
//! ```

use std::future::Future;
use std::time::Duration;

use crate::context::CorrelationId;
use crate::failure::{CommandError, FailureKind, RemoteError};

/// One outbound operation, ready for submission to an isolation pool.
///
/// `Op` is called at most once, after admission, and its future is raced
/// against the effective timeout. The fallback, when present, is also called
/// at most once, and only for dependency faults.
pub struct Command<T, Op> {
    pub(crate) key: &'static str,
    pub(crate) timeout: Option<Duration>,
    pub(crate) correlation: CorrelationId,
    pub(crate) operation: Op,
    pub(crate) fallback: Option<Box<dyn FnOnce() -> T + Send>>,
}

impl<T, Op> Command<T, Op> {
    /// Creates a command with no timeout override and no fallback.
    ///
    /// `key` names the logical operation ("User.getById") and shows up in
    /// every log line and metric the submission produces.
    pub fn new<Fut>(key: &'static str, correlation: CorrelationId, operation: Op) -> Self
    where
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        Self {
            key,
            timeout: None,
            correlation,
            operation,
            fallback: None,
        }
    }

    /// Overrides the group's default timeout for this command only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Installs the value to fall back to when the dependency fails.
    ///
    /// The fallback never runs for caller faults.
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn correlation(&self) -> CorrelationId {
        self.correlation
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Terminal result of one submission.
///
/// A degraded success is kept distinct from a real one so callers can tell
/// a served fallback from a served value without re-deriving it from logs.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    /// The operation produced a value inside its window.
    Success(T),
    /// The dependency failed and the fallback supplied the value.
    FallbackApplied { value: T, cause: FailureKind },
    /// The submission failed and no fallback absorbed it.
    Failed(CommandError),
}

impl<T> Outcome<T> {
    /// Collapses the outcome for callers that treat a fallback value like
    /// any other value.
    pub fn into_result(self) -> Result<T, CommandError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::FallbackApplied { value, .. } => Ok(value),
            Outcome::Failed(err) => Err(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The failure kind the fallback absorbed, when one did.
    pub fn fallback_cause(&self) -> Option<FailureKind> {
        match self {
            Outcome::FallbackApplied { cause, .. } => Some(*cause),
            _ => None,
        }
    }
}
