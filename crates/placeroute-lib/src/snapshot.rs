//! Copy-on-write publication of graph snapshots.
//!
//! Searches hold an `Arc` to the graph they started with. Reloading a dataset
//! builds a fresh graph and swaps the pointer, so in-flight searches never
//! observe a half-updated place list.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::graph::{CompleteGraph, PlaceGraph};
use crate::places::PlaceSet;

/// Shared holder of the current graph snapshot.
#[derive(Debug, Clone)]
pub struct GraphStore {
    current: Arc<RwLock<Arc<CompleteGraph>>>,
}

impl GraphStore {
    pub fn new(places: PlaceSet) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(CompleteGraph::new(places)))),
        }
    }

    /// The graph as of now; stays valid after later publishes.
    pub fn snapshot(&self) -> Arc<CompleteGraph> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replace the current graph with one built from `places`.
    ///
    /// Returns the previous snapshot.
    pub fn publish(&self, places: PlaceSet) -> Arc<CompleteGraph> {
        let next = Arc::new(CompleteGraph::new(places));
        let count = next.len();
        let previous = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, next)
        };
        info!(places = count, "published new place graph snapshot");
        previous
    }
}
