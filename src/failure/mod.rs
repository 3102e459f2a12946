//! Failure taxonomy for guarded outbound calls.
//!
//! Operations report what physically went wrong as a [`RemoteError`]. The
//! command layer turns that, together with its own timeout and admission
//! verdicts, into a [`CommandError`] whose [`FailureKind`] drives the one
//! decision that matters downstream: caller faults propagate untouched,
//! dependency faults are eligible for a fallback.
//!
//! ```text
//!   RemoteError ----classify----> CommandError ----kind----> FailureKind
//!   (what the wire            (terminal verdict,         (fallback
//!    reported)                 plus Timeout/Rejected      eligibility)
//!                              added by the pool)
//! ```

use thiserror::Error;

/// Raw failure reported by an operation closure.
///
/// This is the vocabulary of the wire: a response that arrived with a bad
/// status, a connection that never produced one, or a body that arrived but
/// could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The downstream service answered with a non-success HTTP status.
    #[error("downstream returned status {code}: {detail}")]
    Status { code: u16, detail: String },
    /// The request never completed: connect refused, reset, DNS failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response arrived but its body was not what the caller expected.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

/// Terminal failure of a guarded command.
///
/// Exactly one of these is produced per failed submission, after the
/// operation outcome has been classified and before any fallback runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The downstream service judged the request itself invalid (4xx).
    /// Never masked by a fallback; the caller must see it.
    #[error("downstream rejected the request with status {status}: {detail}")]
    CallerFault { status: u16, detail: String },
    /// The operation did not finish inside the configured window.
    #[error("command timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },
    /// The downstream service failed on its side (5xx and other
    /// non-success, non-4xx statuses).
    #[error("downstream server error {status}: {detail}")]
    ServerError { status: u16, detail: String },
    /// The call never produced a classified response, or produced one that
    /// could not be decoded.
    #[error("transport failure: {detail}")]
    Transport { detail: String },
    /// The isolation pool for the command group was already full.
    #[error("isolation pool \"{group}\" is saturated")]
    Rejected { group: String },
}

impl CommandError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CommandError::CallerFault { .. } => FailureKind::CallerFault,
            CommandError::Timeout { .. } => FailureKind::Timeout,
            CommandError::ServerError { .. } => FailureKind::ServerError,
            CommandError::Transport { .. } => FailureKind::Transport,
            CommandError::Rejected { .. } => FailureKind::Rejected,
        }
    }

    /// True when the request itself was at fault and must be surfaced to
    /// the caller unchanged.
    pub fn is_caller_fault(&self) -> bool {
        self.kind() == FailureKind::CallerFault
    }

    /// True when the dependency (or our patience with it) failed, which is
    /// the only class of failure a fallback may absorb.
    pub fn is_dependency_fault(&self) -> bool {
        self.kind().is_dependency_fault()
    }
}

/// Coarse label for a [`CommandError`], used in logs and metrics and for
/// the fallback decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    CallerFault,
    Timeout,
    ServerError,
    Transport,
    Rejected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::CallerFault => "caller_fault",
            FailureKind::Timeout => "timeout",
            FailureKind::ServerError => "server_error",
            FailureKind::Transport => "transport",
            FailureKind::Rejected => "rejected",
        }
    }

    pub fn is_dependency_fault(&self) -> bool {
        !matches!(self, FailureKind::CallerFault)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a raw operation failure onto the terminal taxonomy.
///
/// Statuses in the 4xx range are the caller's problem. Every other status,
/// and everything that prevented a status from arriving at all, counts
/// against the dependency.
pub fn classify(raw: RemoteError) -> CommandError {
    match raw {
        RemoteError::Status { code, detail } if (400..=499).contains(&code) => {
            CommandError::CallerFault {
                status: code,
                detail,
            }
        }
        RemoteError::Status { code, detail } => CommandError::ServerError {
            status: code,
            detail,
        },
        RemoteError::Transport(detail) => CommandError::Transport { detail },
        RemoteError::Decode(detail) => CommandError::Transport { detail },
    }
}
