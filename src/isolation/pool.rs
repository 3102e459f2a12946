//! Per-group isolation pool.
//!
//! # Responsibilities
//! - Bound how much of the process one dependency group may occupy
//! - Enforce the execution window of each admitted command
//! - Classify failures and apply the fallback exactly once
//!
//! One pool guards one command group. Admission runs through two gates:
//!
//! ```text
//!   submit(command)
//!        |                 capacity = max_concurrent + max_queued
//!        v
//!   occupancy gate ---full---> Rejected        (fallback eligible)
//!        |
//!        v
//!   running gate  ---busy---> parked until a running slot frees
//!        |
//!        v
//!   operation() raced against the timeout
//!        |
//!        +--> value          -> Success
//!        +--> RemoteError    -> classified -> fallback? -> FallbackApplied | Failed
//!        +--> window elapsed -> Timeout    -> fallback? -> FallbackApplied | Failed
//! ```
//!
//! The occupancy gate caps submissions that are admitted at all; the running
//! gate caps how many of those execute concurrently. Both slots are released
//! when the submission reaches a terminal outcome, timeouts and rejections
//! included. The execution window opens when the operation starts, so time
//! spent parked in the queue is not charged against the command.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::time;

use crate::command::{Command, Outcome};
use crate::config::GroupConfig;
use crate::context::CorrelationId;
use crate::failure::{classify, CommandError, RemoteError};
use crate::observability::metrics;

/// Bulkhead for one command group.
#[derive(Debug)]
pub struct IsolationPool {
    name: String,
    max_concurrent: usize,
    max_queued: usize,
    /// max_concurrent + max_queued. Submissions beyond this are rejected.
    capacity: usize,
    default_timeout: Duration,
    /// Bounds commands that are actually executing.
    running: Semaphore,
    /// Counts commands admitted and not yet terminal (running or queued).
    occupancy: AtomicUsize,
}

impl IsolationPool {
    pub fn new(config: &GroupConfig) -> Self {
        Self {
            name: config.name.clone(),
            max_concurrent: config.max_concurrent,
            max_queued: config.max_queued,
            capacity: config.max_concurrent + config.max_queued,
            default_timeout: Duration::from_millis(config.default_timeout_ms),
            running: Semaphore::new(config.max_concurrent),
            occupancy: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn max_queued(&self) -> usize {
        self.max_queued
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Commands currently admitted and not yet terminal.
    pub fn in_flight(&self) -> usize {
        self.occupancy.load(Ordering::Relaxed)
    }

    /// Try to claim an occupancy slot. Fails without waiting when the pool
    /// is at capacity.
    fn try_occupy(self: &Arc<Self>) -> Option<PoolSlot> {
        let mut prev = self.occupancy.load(Ordering::Relaxed);
        loop {
            if prev >= self.capacity {
                return None;
            }
            match self.occupancy.compare_exchange_weak(
                prev,
                prev + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(x) => prev = x,
            }
        }
        metrics::record_pool_occupancy(&self.name, prev + 1);
        Some(PoolSlot { pool: self.clone() })
    }

    /// Runs one command under this pool's bounds and returns its terminal
    /// outcome.
    ///
    /// The call parks while the group is at its concurrency bound but still
    /// under capacity, fails fast with a rejection once capacity is reached,
    /// and otherwise resolves to exactly one of the three [`Outcome`]
    /// variants. Failure is never silent: every terminal state is logged and
    /// counted under the group's name.
    pub async fn submit<T, Op, Fut>(self: &Arc<Self>, command: Command<T, Op>) -> Outcome<T>
    where
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let timeout = command.timeout.unwrap_or(self.default_timeout);
        let key = command.key;
        let correlation = command.correlation;

        tracing::info!(
            group = %self.name,
            key = %key,
            correlation_id = %correlation,
            timeout_ms = timeout.as_millis() as u64,
            "Submitting command"
        );
        let start = Instant::now();

        let _slot = match self.try_occupy() {
            Some(slot) => slot,
            None => {
                metrics::record_rejection(&self.name);
                let err = CommandError::Rejected {
                    group: self.name.clone(),
                };
                return self.resolve_failure(key, correlation, start, command.fallback, err);
            }
        };

        let _permit = self
            .running
            .acquire()
            .await
            .expect("isolation pool semaphore closed");

        let executing = Instant::now();
        match time::timeout(timeout, (command.operation)()).await {
            Ok(Ok(value)) => {
                tracing::info!(
                    group = %self.name,
                    key = %key,
                    correlation_id = %correlation,
                    elapsed_ms = executing.elapsed().as_millis() as u64,
                    "Command succeeded"
                );
                metrics::record_command(&self.name, "success", start);
                Outcome::Success(value)
            }
            Ok(Err(raw)) => {
                let err = classify(raw);
                self.resolve_failure(key, correlation, start, command.fallback, err)
            }
            Err(_) => {
                let err = CommandError::Timeout {
                    elapsed_ms: executing.elapsed().as_millis() as u64,
                };
                self.resolve_failure(key, correlation, start, command.fallback, err)
            }
        }
    }

    /// [`submit`](Self::submit) for callers that treat a fallback value like
    /// any other value.
    pub async fn execute<T, Op, Fut>(
        self: &Arc<Self>,
        command: Command<T, Op>,
    ) -> Result<T, CommandError>
    where
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        self.submit(command).await.into_result()
    }

    /// Logs and counts a terminal failure, then applies the fallback when
    /// the failure class allows one.
    fn resolve_failure<T>(
        &self,
        key: &'static str,
        correlation: CorrelationId,
        start: Instant,
        fallback: Option<Box<dyn FnOnce() -> T + Send>>,
        err: CommandError,
    ) -> Outcome<T> {
        let kind = err.kind();
        match &err {
            CommandError::CallerFault { status, .. } => {
                tracing::error!(
                    group = %self.name,
                    key = %key,
                    correlation_id = %correlation,
                    status = *status,
                    "Command failed: downstream rejected the request"
                );
            }
            CommandError::Timeout { elapsed_ms } => {
                tracing::error!(
                    group = %self.name,
                    key = %key,
                    correlation_id = %correlation,
                    elapsed_ms = *elapsed_ms,
                    "Command timed out"
                );
            }
            CommandError::ServerError { status, .. } => {
                tracing::warn!(
                    group = %self.name,
                    key = %key,
                    correlation_id = %correlation,
                    status = *status,
                    "Command failed: downstream server error"
                );
            }
            CommandError::Transport { detail } => {
                tracing::warn!(
                    group = %self.name,
                    key = %key,
                    correlation_id = %correlation,
                    error = %detail,
                    "Command failed: transport error"
                );
            }
            CommandError::Rejected { .. } => {
                tracing::warn!(
                    group = %self.name,
                    key = %key,
                    correlation_id = %correlation,
                    "Command rejected: isolation pool saturated"
                );
            }
        }
        metrics::record_command(&self.name, kind.as_str(), start);

        if kind.is_dependency_fault() {
            if let Some(fallback) = fallback {
                let value = fallback();
                tracing::info!(
                    group = %self.name,
                    key = %key,
                    correlation_id = %correlation,
                    cause = %kind,
                    "Fallback applied"
                );
                metrics::record_fallback(&self.name, kind.as_str());
                return Outcome::FallbackApplied { value, cause: kind };
            }
        }
        Outcome::Failed(err)
    }
}

/// RAII guard for one occupancy slot.
#[derive(Debug)]
struct PoolSlot {
    pool: Arc<IsolationPool>,
}

impl Drop for PoolSlot {
    fn drop(&mut self) {
        let occupied = self.pool.occupancy.fetch_sub(1, Ordering::Relaxed) - 1;
        metrics::record_pool_occupancy(&self.pool.name, occupied);
    }
}
