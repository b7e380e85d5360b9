//! Tests for resample module

use chainmatch::{resample, Chain, DescriptorSet, PitchPoint};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn descriptor_points(values: &[f64]) -> Vec<PitchPoint> {
    values
        .chunks_exact(2)
        .map(|pair| PitchPoint::new(pair[0], pair[1]))
        .collect()
}

#[test]
fn test_straight_line_evenly_spaced() {
    // 3-4-5 line of total length 50, resampled to 6 points
    let line = vec![PitchPoint::new(0.0, 0.0), PitchPoint::new(30.0, 40.0)];
    let descriptor = resample(&line, 6).unwrap();
    assert_eq!(descriptor.len(), 12);

    let points = descriptor_points(descriptor.values());

    // Consecutive gaps are each total / (n - 1) = 10
    for pair in points.windows(2) {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        let gap = (dx * dx + dy * dy).sqrt();
        assert!(approx_eq(gap, 10.0, 1e-9), "gap was {gap}");
    }
}

#[test]
fn test_endpoints_preserved() {
    let chain = vec![
        PitchPoint::new(5.0, 7.0),
        PitchPoint::new(20.0, 11.0),
        PitchPoint::new(42.0, 3.0),
    ];
    let descriptor = resample(&chain, 10).unwrap();
    let points = descriptor_points(descriptor.values());

    assert_eq!(points[0], chain[0]);
    let last = points.last().unwrap();
    assert!(approx_eq(last.x, 42.0, 1e-9));
    assert!(approx_eq(last.y, 3.0, 1e-9));
}

#[test]
fn test_uneven_input_spacing_is_normalized() {
    // Input points bunched near the start; output spacing depends only on
    // arc length
    let chain = vec![
        PitchPoint::new(0.0, 0.0),
        PitchPoint::new(1.0, 0.0),
        PitchPoint::new(10.0, 0.0),
    ];
    let descriptor = resample(&chain, 5).unwrap();
    let points = descriptor_points(descriptor.values());

    for (i, p) in points.iter().enumerate() {
        assert!(approx_eq(p.x, i as f64 * 2.5, 1e-9), "x[{i}] was {}", p.x);
        assert!(approx_eq(p.y, 0.0, 1e-9));
    }
}

#[test]
fn test_coincident_points_yield_no_descriptor() {
    let stuck = vec![PitchPoint::new(4.0, 4.0); 8];
    assert!(resample(&stuck, 10).is_none());
}

#[test]
fn test_too_short_yields_no_descriptor() {
    assert!(resample(&[], 10).is_none());
    assert!(resample(&[PitchPoint::new(1.0, 2.0)], 10).is_none());
}

#[test]
fn test_descriptor_length_uniform_across_collection() {
    let chains = [
        vec![PitchPoint::new(0.0, 0.0), PitchPoint::new(10.0, 0.0)],
        vec![
            PitchPoint::new(0.0, 0.0),
            PitchPoint::new(3.0, 1.0),
            PitchPoint::new(7.0, 2.0),
            PitchPoint::new(15.0, 9.0),
        ],
    ];

    for coords in &chains {
        let descriptor = resample(coords, 10).unwrap();
        assert_eq!(descriptor.len(), 20);
    }
}

#[test]
fn test_extract_records_source_indices() {
    let chains = vec![
        Chain::new(vec![PitchPoint::new(0.0, 0.0), PitchPoint::new(10.0, 0.0)]),
        Chain::new(vec![PitchPoint::new(1.0, 1.0)]), // too short
        Chain::new(vec![PitchPoint::new(2.0, 2.0); 4]), // zero path length
        Chain::new(vec![PitchPoint::new(0.0, 5.0), PitchPoint::new(10.0, 5.0)]),
    ];

    let set = DescriptorSet::extract(&chains, 10);

    assert_eq!(set.len(), 2);
    assert_eq!(set.source_indices(), &[0, 3]);
    assert_eq!(set.source_index(1), Some(3));
    assert_eq!(set.source_index(2), None);
    assert_eq!(set.n_points(), 10);
}

#[test]
fn test_extract_empty_collection() {
    let set = DescriptorSet::extract(&[], 10);
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
}
