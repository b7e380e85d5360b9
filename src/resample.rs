//! Arc-length resampling of chains into fixed-length shape descriptors.
//!
//! Chains vary wildly in point count; descriptors do not. Each chain is
//! resampled to a fixed number of points, evenly spaced along its arc
//! length, and flattened into a `2 * n` vector so the whole collection can
//! be compared with uniform-dimension Euclidean distances.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{cumulative_lengths, point_at_arc_length};
use crate::{Chain, PitchPoint};

/// A fixed-length shape vector derived from one chain.
///
/// Values are interleaved `x0, y0, x1, y1, ...`; the length is
/// `2 * n_points` and constant across a [`DescriptorSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    values: Vec<f64>,
}

impl Descriptor {
    /// The flattened descriptor values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values (twice the resampled point count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the descriptor holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resample a coordinate sequence to exactly `n_points`, evenly spaced by
/// arc length, and flatten the result into a descriptor.
///
/// Returns `None` for sequences with fewer than 2 points or zero total
/// path length (all points coincident). These are legitimate skips, not
/// errors; such chains stay eligible for direct search.
///
/// The first and last output points equal the first and last input points.
///
/// # Example
/// ```
/// use chainmatch::{resample, PitchPoint};
///
/// let line = vec![PitchPoint::new(0.0, 0.0), PitchPoint::new(30.0, 40.0)];
/// let descriptor = resample(&line, 6).unwrap();
/// assert_eq!(descriptor.len(), 12);
/// ```
pub fn resample(coords: &[PitchPoint], n_points: usize) -> Option<Descriptor> {
    if coords.len() < 2 || n_points == 0 {
        return None;
    }

    let cumulative = cumulative_lengths(coords);
    let total = *cumulative.last()?;

    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let mut values = Vec::with_capacity(2 * n_points);

    if n_points == 1 {
        values.push(coords[0].x);
        values.push(coords[0].y);
        return Some(Descriptor { values });
    }

    let step = total / (n_points - 1) as f64;
    for i in 0..n_points {
        // Pin the last target to the exact total so rounding never lands past it
        let target = if i == n_points - 1 {
            total
        } else {
            i as f64 * step
        };
        let point = point_at_arc_length(coords, &cumulative, target);
        values.push(point.x);
        values.push(point.y);
    }

    Some(Descriptor { values })
}

/// Descriptors for every resamplable chain in a collection, plus the map
/// back to original collection indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    descriptors: Vec<Descriptor>,
    source_indices: Vec<usize>,
    n_points: usize,
}

impl DescriptorSet {
    /// Extract descriptors from a chain collection.
    ///
    /// Chains that cannot be resampled (fewer than 2 points, zero path
    /// length) are left out; `source_indices` records which original
    /// index each surviving descriptor came from.
    pub fn extract(chains: &[Chain], n_points: usize) -> Self {
        let mut descriptors = Vec::with_capacity(chains.len());
        let mut source_indices = Vec::with_capacity(chains.len());

        for (idx, chain) in chains.iter().enumerate() {
            if let Some(descriptor) = resample(&chain.coords, n_points) {
                descriptors.push(descriptor);
                source_indices.push(idx);
            }
        }

        let skipped = chains.len() - descriptors.len();
        if skipped > 0 {
            debug!(
                "[Descriptors] Extracted {} descriptors, skipped {} degenerate chains",
                descriptors.len(),
                skipped
            );
        }

        Self {
            descriptors,
            source_indices,
            n_points,
        }
    }

    /// The extracted descriptors, in original collection order.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Original collection index of descriptor `i`.
    pub fn source_index(&self, i: usize) -> Option<usize> {
        self.source_indices.get(i).copied()
    }

    /// Map from descriptor positions to original collection indices.
    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    /// The resampled point count the set was built with.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Number of descriptors in the set.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the set holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
