//! Tests for core types

use chainmatch::{Chain, ChainMeta, MatchConfig, PitchPoint};

#[test]
fn test_pitch_point_finite() {
    assert!(PitchPoint::new(52.5, 34.0).is_finite());
    assert!(!PitchPoint::new(f64::NAN, 0.0).is_finite());
    assert!(!PitchPoint::new(0.0, f64::INFINITY).is_finite());
}

#[test]
fn test_chain_len() {
    let chain = Chain::new(vec![PitchPoint::new(0.0, 0.0), PitchPoint::new(1.0, 1.0)]);
    assert_eq!(chain.len(), 2);
    assert!(!chain.is_empty());
    assert!(Chain::new(vec![]).is_empty());
}

#[test]
fn test_match_config_defaults() {
    let config = MatchConfig::default();
    assert_eq!(config.descriptor_points, 10);
    assert_eq!(config.dtw_radius, 1);
    assert!(!config.translate_to_origin);
}

#[test]
fn test_chain_serde_round_trip() {
    let chain = Chain::with_meta(
        vec![PitchPoint::new(10.0, 30.0), PitchPoint::new(25.0, 40.0)],
        ChainMeta {
            team_id: Some(42),
            match_name: "Netherlands vs Argentina".to_string(),
            timestamp: "12:03".to_string(),
        },
    );

    let json = serde_json::to_string(&chain).unwrap();
    let back: Chain = serde_json::from_str(&json).unwrap();
    assert_eq!(back, chain);
}

#[test]
fn test_chain_deserializes_without_meta() {
    // Payload fields are optional on the wire
    let json = r#"{"coords":[{"x":1.0,"y":2.0},{"x":3.0,"y":4.0}]}"#;
    let chain: Chain = serde_json::from_str(json).unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.meta, ChainMeta::default());
}
