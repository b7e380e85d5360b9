//! # Chain Matcher
//!
//! Similarity search and clustering for ball-possession trajectories.
//!
//! This library provides:
//! - Length-invariant trajectory comparison using dynamic time warping (DTW)
//! - A corridor-bounded DTW approximation for long sequences
//! - Fixed-length shape descriptors via arc-length resampling
//! - Deterministic leader clustering for pattern discovery
//! - Query-by-trajectory search with stable ranking
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel distance computation with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use chainmatch::{Chain, MatchConfig, PitchPoint, search};
//!
//! // A small database of possession chains
//! let chains = vec![
//!     Chain::new(vec![
//!         PitchPoint::new(0.0, 0.0),
//!         PitchPoint::new(10.0, 10.0),
//!         PitchPoint::new(20.0, 20.0),
//!     ]),
//!     Chain::new(vec![
//!         PitchPoint::new(0.0, 0.0),
//!         PitchPoint::new(10.0, 0.0),
//!         PitchPoint::new(20.0, 0.0),
//!     ]),
//! ];
//!
//! // Rank chains against a hand-drawn query
//! let query = vec![
//!     PitchPoint::new(0.0, 0.0),
//!     PitchPoint::new(10.0, 10.0),
//!     PitchPoint::new(20.0, 20.0),
//! ];
//!
//! let outcome = search(&query, &chains, 5, &MatchConfig::default());
//! assert_eq!(outcome.matches[0].chain_index, 0);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{ChainMatchError, OptionExt, Result};

// Planar geometry helpers (distance, arc length, interpolation)
pub mod geometry;

// Arc-length resampling into fixed-length descriptors
pub mod resample;
pub use resample::{resample, Descriptor, DescriptorSet};

// Distance primitives (Euclidean, DTW) and the pairwise matrix
pub mod distance;
pub use distance::{alignment_distance, alignment_distance_exact, euclidean, DistanceMatrix};

// Deterministic leader clustering
pub mod cluster;
pub use cluster::{Cluster, Clustering};

// Query-by-trajectory search
pub mod search;
pub use search::search;
#[cfg(feature = "parallel")]
pub use search::search_parallel;

// Engine tying chains, descriptors, matrix and clustering together
pub mod engine;
pub use engine::{DescriptorStore, EngineStats, PatternEngine};

// ============================================================================
// Core Types
// ============================================================================

/// A 2D position on the pitch.
///
/// # Example
/// ```
/// use chainmatch::PitchPoint;
/// let point = PitchPoint::new(52.5, 34.0); // centre spot
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
}

impl PitchPoint {
    /// Create a new pitch point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Metadata attached to a chain by the event parser.
///
/// The core never interprets these fields; they are carried through to
/// search results and cluster representatives unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainMeta {
    /// Team in possession for the whole chain
    pub team_id: Option<i64>,
    /// Display label for the source match (e.g. "Netherlands vs Argentina")
    pub match_name: String,
    /// Game clock at the end of the chain (e.g. "63:12")
    pub timestamp: String,
}

/// An ordered sequence of ball-possession positions plus inert metadata.
///
/// Chains are produced by an external parsing collaborator and are never
/// mutated by this library.
///
/// # Example
/// ```
/// use chainmatch::{Chain, PitchPoint};
///
/// let chain = Chain::new(vec![
///     PitchPoint::new(10.0, 30.0),
///     PitchPoint::new(25.0, 40.0),
/// ]);
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    /// Ordered ball positions
    pub coords: Vec<PitchPoint>,
    /// Passthrough metadata from the parser
    #[serde(default)]
    pub meta: ChainMeta,
}

impl Chain {
    /// Create a chain with empty metadata.
    pub fn new(coords: Vec<PitchPoint>) -> Self {
        Self {
            coords,
            meta: ChainMeta::default(),
        }
    }

    /// Create a chain with parser metadata attached.
    pub fn with_meta(coords: Vec<PitchPoint>, meta: ChainMeta) -> Self {
        Self { coords, meta }
    }

    /// Number of positions in the chain.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the chain has no positions.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// Configuration for descriptor extraction and trajectory alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of resampled points per shape descriptor.
    /// Descriptors have `2 * descriptor_points` values. Default: 10
    pub descriptor_points: u32,

    /// Corridor half-width for the approximate alignment distance.
    /// Larger values trade runtime for accuracy; the exact dynamic program
    /// is the correctness baseline. Default: 1
    pub dtw_radius: u32,

    /// Translate both sequences so their first points sit at the origin
    /// before alignment. When false, chains are compared at their absolute
    /// pitch locations. Default: false
    pub translate_to_origin: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            descriptor_points: 10,
            dtw_radius: 1,
            translate_to_origin: false,
        }
    }
}

/// A single ranked result from [`search`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Index of the chain in the original collection
    pub chain_index: usize,
    /// Alignment distance to the query (lower = closer)
    pub distance: f64,
    /// The matched chain, payload included
    pub chain: Chain,
}

/// Result of ranking a chain collection against a query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Matches ordered ascending by distance; ties keep collection order
    pub matches: Vec<PatternMatch>,
    /// Chains excluded because they had no coordinates or their distance
    /// could not be computed
    pub skipped: usize,
}
