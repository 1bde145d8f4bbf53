//! Identifier pools.
//!
//! A pool is a bounded, ordered list of identifiers that many records draw
//! from: either pre-generated for one table (simulated users) or collected
//! from a parent table's output (foreign keys). Pools are immutable once
//! built and cross the parent/child barrier as `Arc<IdPool>`.

use crate::samplers::{pick, skewed_index};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;

/// Size of a per-run identifier pool for `count` records.
pub fn pool_size(count: u64) -> usize {
    (count / 10).max(100) as usize
}

/// Immutable list of identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct IdPool<T = String> {
    name: String,
    ids: Vec<T>,
}

impl<T> IdPool<T> {
    pub fn new(name: impl Into<String>, ids: Vec<T>) -> Self {
        Self {
            name: name.into(),
            ids,
        }
    }

    /// Build a pool of `size` ids, one `draw` call per id, in order.
    pub fn generate<R, F>(name: impl Into<String>, size: usize, rng: &mut R, mut draw: F) -> Self
    where
        R: RngCore + ?Sized,
        F: FnMut(&mut R) -> T,
    {
        let ids = (0..size).map(|_| draw(rng)).collect();
        Self::new(name, ids)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[T] {
        &self.ids
    }

    fn ensure_ready(&self) {
        assert!(
            !self.ids.is_empty(),
            "generation invariant violated: identifier pool '{}' is empty",
            self.name
        );
    }

    /// Uniform pick.
    pub fn pick<R: RngCore + ?Sized>(&self, rng: &mut R) -> &T {
        self.ensure_ready();
        pick(&self.ids, rng)
    }

    /// Popularity-skewed pick; earlier ids are more popular for `skew > 1`.
    pub fn pick_skewed<R: RngCore + ?Sized>(&self, skew: f64, rng: &mut R) -> &T {
        self.ensure_ready();
        &self.ids[skewed_index(self.ids.len(), skew, rng)]
    }
}

/// Parent-table pools available to a child table's synthesizer.
#[derive(Debug, Clone, Default)]
pub struct SharedPools {
    pools: HashMap<String, Arc<IdPool>>,
}

impl SharedPools {
    pub fn insert(&mut self, table: impl Into<String>, pool: Arc<IdPool>) {
        self.pools.insert(table.into(), pool);
    }

    pub fn get(&self, table: &str) -> Option<&Arc<IdPool>> {
        self.pools.get(table)
    }

    /// Pool of a parent table that must already have been generated.
    ///
    /// Panics if the parent is missing: that means a child table was
    /// scheduled before its parent, which is a programming error.
    pub fn require(&self, table: &str) -> &Arc<IdPool> {
        match self.pools.get(table) {
            Some(pool) => pool,
            None => panic!(
                "generation invariant violated: identifier pool for table '{table}' is not ready"
            ),
        }
    }

    /// Keep only the listed tables.
    pub fn subset(&self, tables: &[&str]) -> SharedPools {
        SharedPools {
            pools: self
                .pools
                .iter()
                .filter(|(name, _)| tables.contains(&name.as_str()))
                .map(|(name, pool)| (name.clone(), Arc::clone(pool)))
                .collect(),
        }
    }
}
