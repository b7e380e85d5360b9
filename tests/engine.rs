//! Tests for engine module

use chainmatch::{Chain, MatchConfig, PatternEngine, PitchPoint};

fn level_chain(y: f64) -> Chain {
    Chain::new(vec![PitchPoint::new(0.0, y), PitchPoint::new(10.0, y)])
}

fn loaded_engine() -> PatternEngine {
    let mut engine = PatternEngine::new();
    engine.load_chains(vec![
        level_chain(0.0),
        level_chain(1.0),
        level_chain(200.0),
    ]);
    engine
}

#[test]
fn test_end_to_end_clustering() {
    let mut engine = loaded_engine();

    let clustering = engine.cluster(40.0);
    assert_eq!(clustering.len(), 2);

    let clustering = engine.cluster(1000.0);
    assert_eq!(clustering.len(), 1);
    assert_eq!(clustering.get(0).unwrap().leader(), Some(0));
}

#[test]
fn test_cached_partition_reused_for_same_threshold() {
    let mut engine = loaded_engine();

    engine.cluster(40.0);
    let first = engine.clustering().unwrap().clone();

    // Same threshold: the cached partition must come back unchanged
    let again = engine.cluster(40.0);
    assert_eq!(first.clusters(), again.clusters());
    assert_eq!(again.threshold(), 40.0);
}

#[test]
fn test_threshold_change_recomputes_partition() {
    let mut engine = loaded_engine();

    assert_eq!(engine.cluster(40.0).len(), 2);
    assert_eq!(engine.cluster(1000.0).len(), 1);
    assert_eq!(engine.clustering().unwrap().threshold(), 1000.0);
}

#[test]
fn test_loading_chains_drops_derived_artifacts() {
    let mut engine = loaded_engine();
    engine.cluster(40.0);
    assert!(engine.clustering().is_some());

    engine.load_chains(vec![level_chain(5.0), level_chain(6.0)]);
    assert!(engine.clustering().is_none());

    assert_eq!(engine.cluster(40.0).len(), 1);
}

#[test]
fn test_descriptor_point_change_drops_derived_artifacts() {
    let mut engine = loaded_engine();
    engine.cluster(40.0);

    engine.set_descriptor_points(16);
    assert!(engine.clustering().is_none());

    let set = engine.descriptor_set();
    assert_eq!(set.n_points(), 16);
    assert_eq!(set.descriptors()[0].len(), 32);

    // Unchanged value is a no-op and keeps the caches
    engine.cluster(40.0);
    engine.set_descriptor_points(16);
    assert!(engine.clustering().is_some());
}

#[test]
fn test_add_chains_invalidates() {
    let mut engine = loaded_engine();
    engine.cluster(40.0);

    engine.add_chains(vec![level_chain(201.0)]);
    assert!(engine.clustering().is_none());

    // The new chain joins the outlier's cluster
    let clustering = engine.cluster(40.0);
    assert_eq!(clustering.len(), 2);
    assert_eq!(clustering.get(1).unwrap().members, vec![2, 3]);
}

#[test]
fn test_representative_returns_leader_coords() {
    let mut engine = loaded_engine();
    engine.cluster(40.0);

    let rep = engine.representative(0).unwrap();
    assert_eq!(rep, engine.chains()[0].coords.as_slice());

    assert!(engine.representative(42).is_none());
}

#[test]
fn test_representative_without_clustering_is_none() {
    let engine = loaded_engine();
    assert!(engine.representative(0).is_none());
}

#[test]
fn test_search_through_engine() {
    let engine = loaded_engine();

    let query = vec![PitchPoint::new(0.0, 0.5), PitchPoint::new(10.0, 0.5)];
    let outcome = engine.search(&query, 2);

    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.matches[0].chain_index, 0);
    assert_eq!(outcome.matches[1].chain_index, 1);
}

#[test]
fn test_stats() {
    let mut engine = PatternEngine::new();
    engine.load_chains(vec![
        level_chain(0.0),
        Chain::new(vec![PitchPoint::new(1.0, 1.0)]), // no descriptor
        level_chain(3.0),
    ]);

    let stats = engine.stats();
    assert_eq!(stats.chain_count, 3);
    assert_eq!(stats.descriptor_count, 2);
    assert_eq!(stats.cluster_count, None);

    engine.cluster(40.0);
    let stats = engine.stats();
    assert_eq!(stats.cluster_count, Some(1));
}

#[test]
fn test_custom_config() {
    let config = MatchConfig {
        descriptor_points: 8,
        dtw_radius: 3,
        translate_to_origin: false,
    };
    let mut engine = PatternEngine::with_config(config.clone());
    engine.load_chains(vec![level_chain(0.0)]);

    assert_eq!(engine.config(), &config);
    assert_eq!(engine.descriptor_set().n_points(), 8);
}

#[test]
fn test_empty_engine_is_well_behaved() {
    let mut engine = PatternEngine::new();

    assert_eq!(engine.cluster(40.0).len(), 0);
    assert!(engine.search(&[PitchPoint::new(0.0, 0.0)], 5).matches.is_empty());
    assert_eq!(engine.stats().chain_count, 0);
}
