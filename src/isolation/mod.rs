//! Bulkhead isolation.
//!
//! Each dependency group gets its own bounded pool so a stalled or
//! saturated dependency can only exhaust its own slots, never the whole
//! process. Pools are created once at startup by the [`PoolRegistry`] and
//! shared from there.

pub mod pool;
pub mod registry;

pub use pool::IsolationPool;
pub use registry::PoolRegistry;
