//! Deterministic leader clustering over the descriptor distance matrix.
//!
//! Single greedy pass in ascending index order: the first unvisited chain
//! opens a cluster and becomes its leader, then absorbs every unvisited
//! chain within the threshold of the leader. Membership is leader-relative
//! only; two members of the same cluster can be further apart than the
//! threshold. The visitation order is part of the contract: two runs over
//! identical data and threshold produce bit-identical partitions.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::resample::DescriptorSet;
use crate::{Chain, PitchPoint};

/// A group of mutually similar chains.
///
/// `members` holds original collection indices in insertion order; the
/// first member is the leader the others were gathered around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Id assigned in creation order (0, 1, 2, ...)
    pub id: usize,
    /// Original collection indices; `members[0]` is the leader
    pub members: Vec<usize>,
}

impl Cluster {
    /// Original collection index of this cluster's leader.
    pub fn leader(&self) -> Option<usize> {
        self.members.first().copied()
    }

    /// Number of chains in the cluster.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A complete partition of the valid-descriptor subset of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    clusters: Vec<Cluster>,
    threshold: f64,
}

impl Clustering {
    /// Partition a descriptor set using its pairwise distance matrix.
    ///
    /// Every chain that produced a descriptor lands in exactly one
    /// cluster. A changed threshold requires a fresh call; results are
    /// never updated incrementally.
    pub fn compute(matrix: &DistanceMatrix, set: &DescriptorSet, threshold: f64) -> Self {
        let n = matrix.size();
        debug_assert_eq!(n, set.len(), "matrix and descriptor set out of sync");

        let mut visited = vec![false; n];
        let mut clusters = Vec::new();

        for i in 0..n {
            if visited[i] {
                continue;
            }

            visited[i] = true;
            let mut members = vec![set.source_indices()[i]];

            let row = matrix.row(i);
            for (j, &distance) in row.iter().enumerate() {
                if !visited[j] && distance < threshold {
                    visited[j] = true;
                    members.push(set.source_indices()[j]);
                }
            }

            clusters.push(Cluster {
                id: clusters.len(),
                members,
            });
        }

        debug!(
            "[Cluster] Partitioned {} descriptors into {} clusters at threshold {threshold}",
            n,
            clusters.len()
        );

        Self {
            clusters,
            threshold,
        }
    }

    /// All clusters in creation (id) order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Clusters ordered largest first, ties by id. Display order only;
    /// ids stay stable.
    pub fn clusters_by_size(&self) -> Vec<&Cluster> {
        let mut ordered: Vec<&Cluster> = self.clusters.iter().collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then(a.id.cmp(&b.id)));
        ordered
    }

    /// Look up a cluster by id.
    pub fn get(&self, cluster_id: usize) -> Option<&Cluster> {
        self.clusters.get(cluster_id)
    }

    /// The genuine trajectory of a cluster's leader, for display.
    ///
    /// Always a real observed chain, never a computed average; an averaged
    /// path may not correspond to anything that actually happened on the
    /// pitch. Returns `None` for unknown ids or empty clusters.
    pub fn representative<'a>(
        &self,
        cluster_id: usize,
        chains: &'a [Chain],
    ) -> Option<&'a [PitchPoint]> {
        let leader = self.get(cluster_id)?.leader()?;
        chains.get(leader).map(|chain| chain.coords.as_slice())
    }

    /// The threshold this partition was computed with.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the partition holds no clusters.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
