//! Pool registry.
//!
//! # Responsibilities
//! - Build one [`IsolationPool`] per configured command group at startup
//! - Hand out shared pool handles by group name
//!
//! The registry is built once from validated configuration and never
//! mutated afterwards; clients hold `Arc` handles for the lifetime of the
//! process.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GroupConfig;
use crate::isolation::IsolationPool;

/// All isolation pools of the process, keyed by group name.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: HashMap<String, Arc<IsolationPool>>,
}

impl PoolRegistry {
    pub fn from_config(groups: &[GroupConfig]) -> Self {
        let mut pools = HashMap::new();
        for group in groups {
            tracing::info!(
                group = %group.name,
                max_concurrent = group.max_concurrent,
                max_queued = group.max_queued,
                default_timeout_ms = group.default_timeout_ms,
                "Registering isolation pool"
            );
            let pool = Arc::new(IsolationPool::new(group));
            if pools.insert(group.name.clone(), pool).is_some() {
                tracing::warn!(group = %group.name, "Duplicate group definition, keeping the last one");
            }
        }
        Self { pools }
    }

    pub fn get(&self, group: &str) -> Option<Arc<IsolationPool>> {
        self.pools.get(group).cloned()
    }

    pub fn all_pools(&self) -> Vec<Arc<IsolationPool>> {
        self.pools.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str) -> GroupConfig {
        GroupConfig {
            name: name.to_string(),
            max_concurrent: 3,
            max_queued: 1,
            default_timeout_ms: 500,
        }
    }

    #[test]
    fn builds_one_pool_per_group() {
        let registry = PoolRegistry::from_config(&[group("User"), group("Statistics")]);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("User").is_some());
        assert!(registry.get("Statistics").is_some());
        assert!(registry.get("Billing").is_none());
    }

    #[test]
    fn pools_carry_their_group_settings() {
        let registry = PoolRegistry::from_config(&[group("User")]);
        let pool = registry.get("User").unwrap();
        assert_eq!(pool.name(), "User");
        assert_eq!(pool.max_concurrent(), 3);
        assert_eq!(pool.max_queued(), 1);
        assert_eq!(pool.default_timeout(), std::time::Duration::from_millis(500));
    }

    #[test]
    fn handles_point_at_the_same_pool() {
        let registry = PoolRegistry::from_config(&[group("User")]);
        let a = registry.get("User").unwrap();
        let b = registry.get("User").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn last_duplicate_wins() {
        let mut second = group("User");
        second.max_concurrent = 9;
        let registry = PoolRegistry::from_config(&[group("User"), second]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("User").unwrap().max_concurrent(), 9);
    }
}
