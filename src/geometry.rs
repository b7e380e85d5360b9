//! Planar geometry helpers (distance, arc length, interpolation).
//!
//! Event providers deliver pitch coordinates on a flat metric grid, so all
//! distances here are plain Euclidean.

use crate::PitchPoint;

/// Euclidean distance between two pitch points.
pub fn point_distance(a: &PitchPoint, b: &PitchPoint) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Total length of a polyline.
pub fn path_length(points: &[PitchPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| point_distance(&w[0], &w[1]))
        .sum()
}

/// Cumulative arc lengths along a polyline.
/// Returns a vector where entry `i` is the distance from the start to point `i`;
/// entry 0 is always 0.
pub fn cumulative_lengths(points: &[PitchPoint]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    lengths.push(0.0);

    for i in 1..points.len() {
        let segment = point_distance(&points[i - 1], &points[i]);
        lengths.push(lengths[i - 1] + segment);
    }

    lengths
}

/// Find the point at a specific arc length along a polyline.
/// Interpolates linearly when the target falls inside a segment.
///
/// `cumulative` must be the output of [`cumulative_lengths`] for `points`.
pub fn point_at_arc_length(
    points: &[PitchPoint],
    cumulative: &[f64],
    target: f64,
) -> PitchPoint {
    if points.is_empty() {
        return PitchPoint::new(0.0, 0.0);
    }
    if target <= 0.0 {
        return points[0];
    }

    let total = *cumulative.last().unwrap_or(&0.0);
    if target >= total {
        return *points.last().unwrap_or(&points[0]);
    }

    // Binary search for the segment containing the target length
    let idx = match cumulative.partition_point(|&d| d < target).checked_sub(1) {
        Some(i) => i,
        None => return points[0],
    };

    if idx >= points.len() - 1 {
        return points[points.len() - 1];
    }

    let seg_start = cumulative[idx];
    let seg_end = cumulative[idx + 1];
    let seg_length = seg_end - seg_start;

    // Coincident breakpoints produce a zero-length segment
    if seg_length <= f64::EPSILON {
        return points[idx];
    }

    let ratio = (target - seg_start) / seg_length;
    let p1 = &points[idx];
    let p2 = &points[idx + 1];

    PitchPoint::new(p1.x + ratio * (p2.x - p1.x), p1.y + ratio * (p2.y - p1.y))
}

/// Translate a sequence so its first point sits at the origin.
///
/// Used when comparing trajectory shapes independent of pitch location.
/// Returns an empty vector for empty input.
pub fn translate_to_origin(points: &[PitchPoint]) -> Vec<PitchPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let (ox, oy) = (first.x, first.y);
    points
        .iter()
        .map(|p| PitchPoint::new(p.x - ox, p.y - oy))
        .collect()
}
