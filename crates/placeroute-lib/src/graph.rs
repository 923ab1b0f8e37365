use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::slice;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::places::{Place, PlaceId, PlaceSet};

/// Position of a place within a graph, assigned in dataset order.
pub type NodeIndex = usize;

/// Graph variants supported by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMode {
    /// Every pair of distinct places is joined by a great-circle edge.
    Complete,
    /// Only explicitly declared edges exist.
    Adjacency,
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            GraphMode::Complete => "complete",
            GraphMode::Adjacency => "adjacency",
        };
        f.write_str(value)
    }
}

/// Explicit edge within an [`AdjacencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeIndex,
    pub distance: f64,
}

/// Read-only view of places plus neighbour enumeration.
///
/// Path search is written against this trait so it does not care whether the
/// edges are implicit (complete graph) or declared (adjacency graph).
pub trait PlaceGraph: Send + Sync {
    /// Which variant produced this graph.
    fn mode(&self) -> GraphMode;

    /// All places in node-index order.
    fn places(&self) -> &[Place];

    /// Node index of the place with the given id.
    fn index_of(&self, id: PlaceId) -> Option<NodeIndex>;

    /// Outgoing `(neighbour, weight)` pairs of `node`, in a stable order.
    fn neighbours(&self, node: NodeIndex) -> Neighbours<'_>;

    fn len(&self) -> usize {
        self.places().len()
    }

    fn is_empty(&self) -> bool {
        self.places().is_empty()
    }

    /// Place stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds.
    fn place(&self, index: NodeIndex) -> &Place {
        &self.places()[index]
    }

    /// Lookup a place by identifier.
    fn find(&self, id: PlaceId) -> Result<&Place> {
        self.index_of(id)
            .map(|index| self.place(index))
            .ok_or(Error::PlaceNotFound { id })
    }
}

/// Iterator over the neighbours of a single node.
pub struct Neighbours<'a> {
    places: &'a [Place],
    origin: NodeIndex,
    targets: Targets<'a>,
}

enum Targets<'a> {
    All(Range<NodeIndex>),
    Listed(slice::Iter<'a, Edge>),
}

impl Iterator for Neighbours<'_> {
    type Item = (NodeIndex, f64);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.targets {
            Targets::All(range) => {
                let target = range.find(|&candidate| candidate != self.origin)?;
                let distance = self.places[self.origin].distance_to(&self.places[target]);
                Some((target, distance))
            }
            Targets::Listed(edges) => edges.next().map(|edge| (edge.target, edge.distance)),
        }
    }
}

fn build_index(places: &[Place]) -> HashMap<PlaceId, NodeIndex> {
    places
        .iter()
        .enumerate()
        .map(|(index, place)| (place.id, index))
        .collect()
}

/// Complete graph: each place neighbours every other place.
///
/// Cheap to clone; the place list is shared.
#[derive(Debug, Clone)]
pub struct CompleteGraph {
    places: Arc<[Place]>,
    index: Arc<HashMap<PlaceId, NodeIndex>>,
}

impl CompleteGraph {
    pub fn new(places: PlaceSet) -> Self {
        let places: Arc<[Place]> = places.into_vec().into();
        let index = Arc::new(build_index(&places));
        Self { places, index }
    }

    /// Validate raw places and build a graph from them.
    pub fn from_places(places: Vec<Place>) -> Result<Self> {
        PlaceSet::new(places).map(Self::new)
    }
}

impl PlaceGraph for CompleteGraph {
    fn mode(&self) -> GraphMode {
        GraphMode::Complete
    }

    fn places(&self) -> &[Place] {
        &self.places
    }

    fn index_of(&self, id: PlaceId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    fn neighbours(&self, node: NodeIndex) -> Neighbours<'_> {
        Neighbours {
            places: &self.places,
            origin: node,
            targets: Targets::All(0..self.places.len()),
        }
    }
}

/// Graph with explicitly declared edges, weighted by great-circle length.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    places: Arc<[Place]>,
    index: Arc<HashMap<PlaceId, NodeIndex>>,
    adjacency: Vec<Vec<Edge>>,
}

impl AdjacencyGraph {
    /// Start a graph with no edges.
    pub fn new(places: PlaceSet) -> Self {
        let places: Arc<[Place]> = places.into_vec().into();
        let index = Arc::new(build_index(&places));
        let adjacency = vec![Vec::new(); places.len()];
        Self {
            places,
            index,
            adjacency,
        }
    }

    /// Connect two places in both directions.
    pub fn connect(&mut self, a: PlaceId, b: PlaceId) -> Result<()> {
        self.connect_directed(a, b)?;
        self.connect_directed(b, a)
    }

    /// Add a one-way edge from `from` to `to`.
    ///
    /// Self-loops are ignored and repeated edges are stored once.
    pub fn connect_directed(&mut self, from: PlaceId, to: PlaceId) -> Result<()> {
        let source = self
            .index_of(from)
            .ok_or(Error::PlaceNotFound { id: from })?;
        let target = self.index_of(to).ok_or(Error::PlaceNotFound { id: to })?;
        if source == target {
            return Ok(());
        }

        let edges = &mut self.adjacency[source];
        if edges.iter().any(|edge| edge.target == target) {
            return Ok(());
        }
        let distance = self.places[source].distance_to(&self.places[target]);
        edges.push(Edge { target, distance });
        Ok(())
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}

impl PlaceGraph for AdjacencyGraph {
    fn mode(&self) -> GraphMode {
        GraphMode::Adjacency
    }

    fn places(&self) -> &[Place] {
        &self.places
    }

    fn index_of(&self, id: PlaceId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    fn neighbours(&self, node: NodeIndex) -> Neighbours<'_> {
        let edges = self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]);
        Neighbours {
            places: &self.places,
            origin: node,
            targets: Targets::Listed(edges.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> PlaceSet {
        PlaceSet::new(vec![
            Place::new(10, "A", 0.0, 0.0),
            Place::new(20, "B", 0.0, 1.0),
            Place::new(30, "C", 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn complete_graph_skips_self_and_keeps_order() {
        let graph = CompleteGraph::new(triangle());
        let neighbours: Vec<_> = graph.neighbours(1).map(|(n, _)| n).collect();
        assert_eq!(neighbours, vec![0, 2]);
    }

    #[test]
    fn complete_graph_weights_are_symmetric() {
        let graph = CompleteGraph::new(triangle());
        let ab = graph.neighbours(0).find(|(n, _)| *n == 1).unwrap().1;
        let ba = graph.neighbours(1).find(|(n, _)| *n == 0).unwrap().1;
        assert_eq!(ab, ba);
        assert!(ab > 0.0);
    }

    #[test]
    fn find_reports_missing_ids() {
        let graph = CompleteGraph::new(triangle());
        assert_eq!(graph.find(20).unwrap().name, "B");
        assert!(matches!(
            graph.find(99),
            Err(Error::PlaceNotFound { id: 99 })
        ));
    }

    #[test]
    fn single_place_graph_has_no_neighbours() {
        let graph = CompleteGraph::from_places(vec![Place::new(1, "Solo", 0.0, 0.0)]).unwrap();
        assert_eq!(graph.neighbours(0).count(), 0);
    }

    #[test]
    fn adjacency_graph_only_lists_declared_edges() {
        let mut graph = AdjacencyGraph::new(triangle());
        graph.connect(10, 20).unwrap();
        graph.connect_directed(20, 30).unwrap();
        graph.connect_directed(20, 30).unwrap();
        graph.connect(10, 10).unwrap();

        assert_eq!(graph.edge_count(), 3);
        let from_b: Vec<_> = graph.neighbours(1).map(|(n, _)| n).collect();
        assert_eq!(from_b, vec![0, 2]);
        assert_eq!(graph.neighbours(2).count(), 0);
        assert_eq!(graph.mode(), GraphMode::Adjacency);
    }

    #[test]
    fn adjacency_graph_rejects_unknown_endpoints() {
        let mut graph = AdjacencyGraph::new(triangle());
        assert!(matches!(
            graph.connect(10, 99),
            Err(Error::PlaceNotFound { id: 99 })
        ));
    }
}
