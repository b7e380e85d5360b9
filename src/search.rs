//! Query-by-trajectory search over a chain collection.
//!
//! Each chain is scored against the query with the alignment distance and
//! the collection is ranked ascending. Chains that cannot be scored (no
//! coordinates, or a non-finite distance from pathological input) are
//! dropped silently; only their count is reported back.

use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::distance::alignment_distance;
use crate::error::{ChainMatchError, Result};
use crate::geometry::translate_to_origin;
use crate::{Chain, MatchConfig, PatternMatch, PitchPoint, SearchOutcome};

/// Rank a chain collection against a query trajectory.
///
/// Results are sorted ascending by distance; equal distances keep the
/// original collection order, so the ranking is a total order and stable
/// across runs. The list is truncated to `top_k`.
///
/// An empty query yields an empty outcome. Interactive callers typically
/// require two or more query points before invoking this at all, but that
/// minimum is caller policy; a single-point query is valid here.
///
/// # Example
/// ```
/// use chainmatch::{search, Chain, MatchConfig, PitchPoint};
///
/// let chains = vec![Chain::new(vec![
///     PitchPoint::new(0.0, 0.0),
///     PitchPoint::new(20.0, 20.0),
/// ])];
/// let query = vec![PitchPoint::new(0.0, 0.0), PitchPoint::new(20.0, 20.0)];
///
/// let outcome = search(&query, &chains, 1, &MatchConfig::default());
/// assert_eq!(outcome.matches.len(), 1);
/// assert!(outcome.matches[0].distance < 1e-9);
/// ```
pub fn search(
    query: &[PitchPoint],
    chains: &[Chain],
    top_k: usize,
    config: &MatchConfig,
) -> SearchOutcome {
    if query.is_empty() {
        return SearchOutcome::default();
    }

    let query = frame(query, config);

    let scored: Vec<Result<PatternMatch>> = chains
        .iter()
        .enumerate()
        .map(|(idx, chain)| score_chain(&query, idx, chain, config))
        .collect();

    finish(scored, top_k)
}

/// Parallel variant of [`search`]: scores chains across rayon workers,
/// then applies the same deterministic ordering. Observable results are
/// identical to the serial version.
#[cfg(feature = "parallel")]
pub fn search_parallel(
    query: &[PitchPoint],
    chains: &[Chain],
    top_k: usize,
    config: &MatchConfig,
) -> SearchOutcome {
    if query.is_empty() {
        return SearchOutcome::default();
    }

    let query = frame(query, config);

    let scored: Vec<Result<PatternMatch>> = chains
        .par_iter()
        .enumerate()
        .map(|(idx, chain)| score_chain(&query, idx, chain, config))
        .collect();

    finish(scored, top_k)
}

/// Apply the configured coordinate frame to a sequence.
fn frame(points: &[PitchPoint], config: &MatchConfig) -> Vec<PitchPoint> {
    if config.translate_to_origin {
        translate_to_origin(points)
    } else {
        points.to_vec()
    }
}

/// Score one chain against the query; an `Err` marks a chain the ranking
/// must skip.
fn score_chain(
    query: &[PitchPoint],
    idx: usize,
    chain: &Chain,
    config: &MatchConfig,
) -> Result<PatternMatch> {
    if chain.coords.is_empty() {
        return Err(ChainMatchError::InsufficientPoints {
            point_count: 0,
            minimum_required: 1,
        });
    }

    let coords = frame(&chain.coords, config);
    let distance = alignment_distance(query, &coords, config.dtw_radius as usize)?;

    if !distance.is_finite() {
        return Err(ChainMatchError::NonFiniteDistance { chain_index: idx });
    }

    Ok(PatternMatch {
        chain_index: idx,
        distance,
        chain: chain.clone(),
    })
}

/// Sort, count skips, truncate. Shared by both search variants so the
/// ordering contract never depends on worker completion order.
fn finish(scored: Vec<Result<PatternMatch>>, top_k: usize) -> SearchOutcome {
    let total = scored.len();
    let mut matches: Vec<PatternMatch> = scored.into_iter().filter_map(|r| r.ok()).collect();
    let skipped = total - matches.len();

    // Input is in collection order, so a stable sort on distance alone
    // leaves ties ranked by original index
    matches.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(top_k);

    if skipped > 0 {
        debug!("[Search] Ranked {} chains, skipped {skipped}", total - skipped);
    }

    SearchOutcome { matches, skipped }
}
