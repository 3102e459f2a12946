//! Request correlation.
//!
//! Every guarded call carries a [`CorrelationId`] so that log lines emitted
//! by the caller, the command layer, and the downstream service can be
//! stitched back together. The id is forwarded to downstream services in the
//! `X-CorrelationID` header.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header used to propagate the correlation id to downstream services.
pub const X_CORRELATION_ID: &str = "X-CorrelationID";

/// Identifier tying one caller-visible operation to every outbound call and
/// log line it produces.
///
/// Freshly generated ids are random v4 UUIDs. Ids received from an upstream
/// caller can be parsed with [`FromStr`] so the chain stays intact across
/// service boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CorrelationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
