//! Unified error handling for chain matching operations.
//!
//! Degenerate chains (too short, zero path length) are not errors; the
//! pipeline skips them and moves on. Errors here mark broken internal
//! invariants or inputs the caller promised not to pass.

use thiserror::Error;

/// Errors that can occur during chain matching operations.
#[derive(Debug, Error)]
pub enum ChainMatchError {
    /// A sequence had fewer points than the operation requires.
    #[error("sequence has {point_count} points, need at least {minimum_required}")]
    InsufficientPoints {
        point_count: usize,
        minimum_required: usize,
    },

    /// An empty sequence reached the alignment primitive.
    #[error("alignment distance requires non-empty sequences ({side} side was empty)")]
    EmptySequence { side: &'static str },

    /// A distance computation produced a non-finite value.
    #[error("non-finite distance between query and chain {chain_index}")]
    NonFiniteDistance { chain_index: usize },
}

/// Result type alias for chain matching operations.
pub type Result<T> = std::result::Result<T, ChainMatchError>;

/// Extension trait for converting `Option` into chain matching errors.
pub trait OptionExt<T> {
    /// Convert `None` into an `InsufficientPoints` error.
    fn ok_or_insufficient_points(self, point_count: usize, minimum_required: usize) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(self, point_count: usize, minimum_required: usize) -> Result<T> {
        self.ok_or(ChainMatchError::InsufficientPoints {
            point_count,
            minimum_required,
        })
    }
}
