//! # Pattern Engine
//!
//! Convenience layer tying the pipeline together: chains in, descriptors,
//! distance matrix, clustering and search out, with derived artifacts
//! cached and invalidated wholesale.
//!
//! ## Architecture
//!
//! - `DescriptorStore` - lazy descriptor extraction with staleness tracking
//! - the matrix and clustering are cached inline and follow the
//!   descriptors: chains or point-count changes drop everything
//!   downstream, a threshold change drops only the clustering
//!
//! All heavy lifting stays in the pure modules; the engine only decides
//! when to recompute.

pub mod descriptor_store;

pub use descriptor_store::DescriptorStore;

use log::info;

use crate::cluster::Clustering;
use crate::distance::DistanceMatrix;
use crate::resample::DescriptorSet;
use crate::search;
use crate::{Chain, MatchConfig, PitchPoint, SearchOutcome};

/// Summary counts for diagnostics and UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    /// Chains currently loaded
    pub chain_count: usize,
    /// Chains that produced a valid descriptor
    pub descriptor_count: usize,
    /// Clusters in the current partition, if one is computed
    pub cluster_count: Option<usize>,
}

/// Owns a chain collection and serves descriptor, clustering and search
/// queries over it.
///
/// # Example
/// ```
/// use chainmatch::{Chain, PatternEngine, PitchPoint};
///
/// let mut engine = PatternEngine::new();
/// engine.load_chains(vec![
///     Chain::new(vec![PitchPoint::new(0.0, 0.0), PitchPoint::new(10.0, 0.0)]),
///     Chain::new(vec![PitchPoint::new(0.0, 1.0), PitchPoint::new(10.0, 1.0)]),
/// ]);
///
/// let clustering = engine.cluster(40.0);
/// assert_eq!(clustering.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct PatternEngine {
    chains: Vec<Chain>,
    config: MatchConfig,
    descriptors: DescriptorStore,
    matrix: Option<DistanceMatrix>,
    clustering: Option<Clustering>,
}

impl PatternEngine {
    /// Create an engine with default configuration and no chains.
    pub fn new() -> Self {
        Self {
            chains: Vec::new(),
            config: MatchConfig::default(),
            descriptors: DescriptorStore::new(),
            matrix: None,
            clustering: None,
        }
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: MatchConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Replace the chain collection, dropping all derived artifacts.
    pub fn load_chains(&mut self, chains: Vec<Chain>) {
        info!("[Engine] Loaded {} chains", chains.len());
        self.chains = chains;
        self.invalidate_derived();
    }

    /// Append chains to the collection, dropping all derived artifacts.
    pub fn add_chains(&mut self, chains: impl IntoIterator<Item = Chain>) {
        self.chains.extend(chains);
        self.invalidate_derived();
    }

    /// The loaded chain collection.
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// The active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Replace the configuration. Derived artifacts are dropped; search
    /// picks the new settings up immediately.
    pub fn set_config(&mut self, config: MatchConfig) {
        self.config = config;
        self.invalidate_derived();
    }

    /// Change the descriptor point count, dropping descriptors, matrix
    /// and clustering.
    pub fn set_descriptor_points(&mut self, n_points: u32) {
        if self.config.descriptor_points != n_points {
            self.config.descriptor_points = n_points;
            self.invalidate_derived();
        }
    }

    /// Descriptors for the current collection, computing them if needed.
    pub fn descriptor_set(&mut self) -> &DescriptorSet {
        self.descriptors
            .ensure_computed(&self.chains, self.config.descriptor_points as usize)
    }

    /// The pairwise descriptor distance matrix, computing it if needed.
    pub fn distance_matrix(&mut self) -> &DistanceMatrix {
        if self.matrix.is_none() {
            let set = self
                .descriptors
                .ensure_computed(&self.chains, self.config.descriptor_points as usize);
            self.matrix = Some(DistanceMatrix::from_descriptors(set));
        }

        self.matrix
            .get_or_insert_with(DistanceMatrix::default)
    }

    /// Partition the collection at the given threshold.
    ///
    /// Reuses the cached partition when the threshold is unchanged;
    /// otherwise recomputes from the (possibly cached) matrix. Prior
    /// partitions are discarded, never patched.
    pub fn cluster(&mut self, threshold: f64) -> &Clustering {
        let reusable = self
            .clustering
            .as_ref()
            .map_or(false, |c| c.threshold() == threshold);

        if !reusable {
            self.distance_matrix();
            let set = self
                .descriptors
                .ensure_computed(&self.chains, self.config.descriptor_points as usize);
            let matrix = self
                .matrix
                .get_or_insert_with(DistanceMatrix::default);
            let clustering = Clustering::compute(matrix, set, threshold);
            info!(
                "[Engine] Clustered {} descriptors into {} clusters at threshold {threshold}",
                set.len(),
                clustering.len()
            );
            self.clustering = Some(clustering);
        }

        self.clustering
            .get_or_insert_with(Clustering::default)
    }

    /// The current partition, if one has been computed.
    pub fn clustering(&self) -> Option<&Clustering> {
        self.clustering.as_ref()
    }

    /// The genuine leader trajectory of a cluster, for display.
    pub fn representative(&self, cluster_id: usize) -> Option<&[PitchPoint]> {
        self.clustering
            .as_ref()?
            .representative(cluster_id, &self.chains)
    }

    /// Rank the collection against a query trajectory.
    ///
    /// Uses the parallel scan when the `parallel` feature is enabled; the
    /// observable ordering is identical either way.
    pub fn search(&self, query: &[PitchPoint], top_k: usize) -> SearchOutcome {
        #[cfg(feature = "parallel")]
        {
            search::search_parallel(query, &self.chains, top_k, &self.config)
        }

        #[cfg(not(feature = "parallel"))]
        {
            search::search(query, &self.chains, top_k, &self.config)
        }
    }

    /// Summary counts for diagnostics.
    pub fn stats(&mut self) -> EngineStats {
        let descriptor_count = self.descriptor_set().len();
        EngineStats {
            chain_count: self.chains.len(),
            descriptor_count,
            cluster_count: self.clustering.as_ref().map(Clustering::len),
        }
    }

    fn invalidate_derived(&mut self) {
        self.descriptors.invalidate();
        self.matrix = None;
        self.clustering = None;
    }
}
