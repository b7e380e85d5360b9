//! Lazy descriptor computation with wholesale invalidation.
//!
//! Descriptors are cheap individually but the downstream distance matrix
//! is O(N^2), so the store tracks exactly one question: does the cached
//! set still correspond to the current chains and point count? Anything
//! stale is replaced as a whole; there is no per-chain patching.

use crate::resample::DescriptorSet;
use crate::Chain;

/// Store for the collection's descriptor set.
#[derive(Debug, Default)]
pub struct DescriptorStore {
    set: Option<DescriptorSet>,
    dirty: bool,
}

impl DescriptorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            set: None,
            dirty: true,
        }
    }

    /// Mark the cached set as stale (chains or point count changed).
    pub fn invalidate(&mut self) {
        self.set = None;
        self.dirty = true;
    }

    /// Whether the cached set needs recomputation.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Ensure the set matches the given chains and point count,
    /// recomputing when stale.
    pub fn ensure_computed(&mut self, chains: &[Chain], n_points: usize) -> &DescriptorSet {
        let stale = self.dirty
            || self
                .set
                .as_ref()
                .map_or(true, |set| set.n_points() != n_points);

        if stale {
            self.set = None;
            self.dirty = false;
        }

        self.set
            .get_or_insert_with(|| DescriptorSet::extract(chains, n_points))
    }

    /// The cached set, if current.
    pub fn get(&self) -> Option<&DescriptorSet> {
        if self.dirty {
            None
        } else {
            self.set.as_ref()
        }
    }
}
