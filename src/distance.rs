//! Distance primitives for descriptors and raw coordinate sequences.
//!
//! This module provides the two metrics the rest of the crate builds on:
//! - Euclidean distance over fixed-length descriptors, and the dense
//!   pairwise matrix used by clustering
//! - Dynamic time warping (DTW) over raw sequences of any length, with a
//!   corridor-bounded approximation for long inputs
//!
//! Both are pure functions with no shared state.

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ChainMatchError, Result};
use crate::geometry::point_distance;
use crate::resample::DescriptorSet;
use crate::PitchPoint;

// ============================================================================
// Euclidean / descriptor distances
// ============================================================================

/// L2 distance between two equal-length descriptor vectors.
///
/// Descriptor lengths are uniform by construction; a mismatch means the
/// pipeline itself is broken, so this fails fast rather than guessing.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "descriptor length mismatch ({} vs {})",
        a.len(),
        b.len()
    );

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Dense pairwise distance matrix over a descriptor set.
///
/// Square, symmetric, zero diagonal. Entry `(i, j)` is the Euclidean
/// distance between descriptors `i` and `j` (descriptor positions, not
/// original collection indices). Replaced wholesale whenever the
/// descriptor set changes; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute the full pairwise matrix for a descriptor set.
    ///
    /// The upper triangle is computed once and mirrored, so parallel and
    /// serial builds produce identical matrices.
    pub fn from_descriptors(set: &DescriptorSet) -> Self {
        let n = set.len();
        let descriptors = set.descriptors();
        let mut data = vec![0.0; n * n];

        #[cfg(feature = "parallel")]
        {
            let rows: Vec<Vec<f64>> = (0..n)
                .into_par_iter()
                .map(|i| {
                    ((i + 1)..n)
                        .map(|j| euclidean(descriptors[i].values(), descriptors[j].values()))
                        .collect()
                })
                .collect();

            for (i, row) in rows.into_iter().enumerate() {
                for (offset, d) in row.into_iter().enumerate() {
                    let j = i + 1 + offset;
                    data[i * n + j] = d;
                    data[j * n + i] = d;
                }
            }
        }

        #[cfg(not(feature = "parallel"))]
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean(descriptors[i].values(), descriptors[j].values());
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        debug!("[Matrix] Computed {n}x{n} descriptor distance matrix");

        Self { size: n, data }
    }

    /// Distance between descriptors `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.size && j < self.size,
            "matrix index ({i}, {j}) out of range for size {}",
            self.size
        );
        self.data[i * self.size + j]
    }

    /// Row `i` of the matrix: distances from descriptor `i` to all others.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

// ============================================================================
// Alignment distance (DTW)
// ============================================================================

/// Exact alignment distance between two coordinate sequences.
///
/// Classic dynamic time warping: the minimum total Euclidean cost of a
/// monotone pairing from `(0, 0)` to `(last, last)` with moves advance-a,
/// advance-b, advance-both. Tolerant of different lengths and local speed
/// variation; O(n*m) time. This is the correctness baseline for
/// [`alignment_distance`].
///
/// Errors with [`ChainMatchError::EmptySequence`] if either side is empty.
pub fn alignment_distance_exact(a: &[PitchPoint], b: &[PitchPoint]) -> Result<f64> {
    check_non_empty(a, b)?;

    // Rolling single row: no path needed for the exact distance
    let m = b.len();
    let mut prev = vec![f64::INFINITY; m];
    let mut curr = vec![f64::INFINITY; m];

    for (i, pa) in a.iter().enumerate() {
        for (j, pb) in b.iter().enumerate() {
            let cost = point_distance(pa, pb);
            let best = if i == 0 && j == 0 {
                0.0
            } else {
                let up = if i > 0 { prev[j] } else { f64::INFINITY };
                let left = if j > 0 { curr[j - 1] } else { f64::INFINITY };
                let diag = if i > 0 && j > 0 { prev[j - 1] } else { f64::INFINITY };
                up.min(left).min(diag)
            };
            curr[j] = cost + best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    Ok(prev[m - 1])
}

/// Approximate alignment distance with a bounded search corridor.
///
/// FastDTW-style multiresolution scheme: both sequences are recursively
/// coarsened by neighbor averaging down to a small base case, the base
/// case is solved exactly, and the warp path is projected back up one
/// level at a time, re-solving within a corridor of `radius` cells around
/// the projection instead of the full matrix. Near-linear in sequence
/// length, and never below the exact distance (it searches a subset of
/// paths).
///
/// `radius` widens the corridor: larger values are slower and closer to
/// the exact result. There is no universally right value; callers tune it
/// via [`MatchConfig::dtw_radius`](crate::MatchConfig::dtw_radius).
///
/// Errors with [`ChainMatchError::EmptySequence`] if either side is empty.
pub fn alignment_distance(a: &[PitchPoint], b: &[PitchPoint], radius: usize) -> Result<f64> {
    check_non_empty(a, b)?;
    let (distance, _) = fastdtw(a, b, radius);
    Ok(distance)
}

fn check_non_empty(a: &[PitchPoint], b: &[PitchPoint]) -> Result<()> {
    if a.is_empty() {
        return Err(ChainMatchError::EmptySequence { side: "left" });
    }
    if b.is_empty() {
        return Err(ChainMatchError::EmptySequence { side: "right" });
    }
    Ok(())
}

/// Search corridor for the windowed dynamic program: a half-open column
/// range per row of `a`.
struct Window {
    rows: Vec<(usize, usize)>,
}

impl Window {
    /// Unrestricted window covering the full cost matrix.
    fn full(n: usize, m: usize) -> Self {
        Self {
            rows: vec![(0, m); n],
        }
    }

    /// Corridor around a coarse warp path, projected to the next finer
    /// resolution and inflated by `radius` cells in every direction.
    fn expand(coarse_path: &[(usize, usize)], n: usize, m: usize, radius: usize) -> Self {
        let mut rows = vec![(usize::MAX, 0usize); n];
        let r = radius as isize;

        for &(ci, cj) in coarse_path {
            let row_lo = ((2 * ci) as isize - r).max(0) as usize;
            let row_hi = (((2 * ci + 1) as isize + r) as usize).min(n - 1);
            let col_lo = ((2 * cj) as isize - r).max(0) as usize;
            let col_hi = (((2 * cj + 1) as isize + r) as usize).min(m - 1);

            for row in &mut rows[row_lo..=row_hi] {
                row.0 = row.0.min(col_lo);
                row.1 = row.1.max(col_hi + 1);
            }
        }

        // An odd-length tail row can fall outside the projection; give it
        // its predecessor's range
        for i in 1..n {
            if rows[i].0 == usize::MAX {
                rows[i] = rows[i - 1];
            }
        }

        // The corridor must contain both endpoints of the alignment
        rows[0].0 = 0;
        rows[n - 1].1 = m;

        Self { rows }
    }
}

/// Solve the dynamic program restricted to a window, returning the
/// accumulated distance and the optimal warp path.
fn dtw_windowed(a: &[PitchPoint], b: &[PitchPoint], window: &Window) -> (f64, Vec<(usize, usize)>) {
    let n = a.len();
    let m = b.len();

    // Per-row slices of accumulated cost, offset by the window's column lo
    let mut acc: Vec<Vec<f64>> = window
        .rows
        .iter()
        .map(|&(lo, hi)| vec![f64::INFINITY; hi - lo])
        .collect();

    let cell = |acc: &[Vec<f64>], i: usize, j: usize| -> f64 {
        let (lo, hi) = window.rows[i];
        if j < lo || j >= hi {
            return f64::INFINITY;
        }
        acc[i][j - lo]
    };

    for i in 0..n {
        let (lo, hi) = window.rows[i];
        for j in lo..hi {
            let cost = point_distance(&a[i], &b[j]);
            let best = if i == 0 && j == 0 {
                0.0
            } else {
                let diag = if i > 0 && j > 0 {
                    cell(&acc, i - 1, j - 1)
                } else {
                    f64::INFINITY
                };
                let up = if i > 0 { cell(&acc, i - 1, j) } else { f64::INFINITY };
                let left = if j > 0 { cell(&acc, i, j - 1) } else { f64::INFINITY };
                diag.min(up).min(left)
            };
            if best.is_finite() {
                acc[i][j - lo] = cost + best;
            }
        }
    }

    let distance = cell(&acc, n - 1, m - 1);

    // Trace the path back by re-inspecting predecessors, diagonal first
    let mut path = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n - 1, m - 1);
    path.push((i, j));
    while i > 0 || j > 0 {
        let mut next = (i, j);
        let mut best = f64::INFINITY;
        if i > 0 && j > 0 {
            let d = cell(&acc, i - 1, j - 1);
            if d < best {
                best = d;
                next = (i - 1, j - 1);
            }
        }
        if i > 0 {
            let d = cell(&acc, i - 1, j);
            if d < best {
                best = d;
                next = (i - 1, j);
            }
        }
        if j > 0 {
            let d = cell(&acc, i, j - 1);
            if d < best {
                best = d;
                next = (i, j - 1);
            }
        }
        if !best.is_finite() {
            break;
        }
        (i, j) = next;
        path.push((i, j));
    }
    path.reverse();

    (distance, path)
}

/// Halve a sequence by averaging neighbor pairs (odd tail dropped).
fn reduce_by_half(points: &[PitchPoint]) -> Vec<PitchPoint> {
    points
        .chunks_exact(2)
        .map(|pair| {
            PitchPoint::new(
                (pair[0].x + pair[1].x) / 2.0,
                (pair[0].y + pair[1].y) / 2.0,
            )
        })
        .collect()
}

/// Multiresolution DTW: exact at the coarsest level, corridor-restricted
/// on the way back up.
fn fastdtw(a: &[PitchPoint], b: &[PitchPoint], radius: usize) -> (f64, Vec<(usize, usize)>) {
    let min_size = radius + 2;
    if a.len() < min_size || b.len() < min_size {
        return dtw_windowed(a, b, &Window::full(a.len(), b.len()));
    }

    let half_a = reduce_by_half(a);
    let half_b = reduce_by_half(b);
    let (_, coarse_path) = fastdtw(&half_a, &half_b, radius);
    let window = Window::expand(&coarse_path, a.len(), b.len(), radius);

    dtw_windowed(a, b, &window)
}
