//! Guarded dependency clients.
//!
//! Each client wraps one downstream dependency behind the command layer:
//! callers see plain domain methods and never touch commands, pools, or the
//! failure taxonomy directly.
//!
//! ```text
//! caller ──> UserServiceClient::is_premium_user ──> pool "User" ──> user service
//! caller ──> StatisticsServiceClient::advertisement_is_shown
//!                        └─(spawned)──> pool "Statistics" ──> event broker
//! ```

pub mod statistics;
pub mod user;

pub use statistics::StatisticsServiceClient;
pub use user::{User, UserServiceClient};
