//! Shared fixtures for integration tests.

use std::path::PathBuf;

use placeroute_lib::{CompleteGraph, PlaceGraph, PlaceId, PlaceSet};

/// Path to fixtures directory used by tests (place and vehicle files).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Complete graph over the bundled landmark dataset.
#[allow(dead_code)]
pub fn builtin_graph() -> CompleteGraph {
    CompleteGraph::new(PlaceSet::builtin())
}

/// The two places with the largest great-circle separation.
#[allow(dead_code)]
pub fn most_distant_pair(graph: &CompleteGraph) -> (PlaceId, PlaceId) {
    let places = graph.places();
    let mut best = (places[0].id, places[0].id, 0.0);
    for (i, a) in places.iter().enumerate() {
        for b in &places[i + 1..] {
            let d = a.distance_to(b);
            if d > best.2 {
                best = (a.id, b.id, d);
            }
        }
    }
    (best.0, best.1)
}
