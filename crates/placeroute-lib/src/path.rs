//! Shortest-path search over a [`PlaceGraph`].
//!
//! A* uses the great-circle distance to the goal as its heuristic. Every edge
//! weight is itself a great-circle distance, so by the triangle inequality the
//! heuristic never overestimates and the returned path is optimal. Dijkstra is
//! the same search with a zero heuristic.
//!
//! Frontier selection uses a binary heap with lazy reinsertion: an improved
//! node is pushed again and outdated heap entries are discarded when popped.
//! Nodes with equal `f` score are expanded in ascending node index (dataset
//! order), which makes results reproducible.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{NodeIndex, PlaceGraph};
use crate::places::{Place, PlaceId};

/// Improvements smaller than this (in km) are treated as floating-point noise.
const IMPROVEMENT_EPSILON_KM: f64 = 1e-9;

/// Cooperative cancellation flag shared between a caller and a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Budgets checked once per frontier iteration.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// Maximum number of nodes expanded before giving up.
    pub max_expansions: Option<usize>,
    /// Wall-clock budget for the whole search.
    pub time_budget: Option<Duration>,
    /// Token observed for cooperative cancellation.
    pub cancel: Option<CancelToken>,
}

impl SearchLimits {
    /// No budget and no cancellation.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Path returned by a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    /// Places from start to goal inclusive.
    pub places: Vec<Place>,
    /// Sum of edge weights along the path.
    pub distance_km: f64,
    /// Nodes expanded before the goal was reached.
    pub expansions: usize,
}

/// Heuristic used to order the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Great-circle distance to the goal (A*).
    GreatCircle,
    /// Always zero (Dijkstra).
    Zero,
}

/// Run A* between two place ids.
pub fn find_route_a_star<G: PlaceGraph + ?Sized>(
    graph: &G,
    start: PlaceId,
    goal: PlaceId,
    limits: &SearchLimits,
) -> Result<FoundPath> {
    find_route(graph, start, goal, Heuristic::GreatCircle, limits)
}

/// Run Dijkstra's algorithm between two place ids.
pub fn find_route_dijkstra<G: PlaceGraph + ?Sized>(
    graph: &G,
    start: PlaceId,
    goal: PlaceId,
    limits: &SearchLimits,
) -> Result<FoundPath> {
    find_route(graph, start, goal, Heuristic::Zero, limits)
}

/// Resolve both endpoints and search between them.
///
/// Unknown ids fail with [`Error::InvalidNode`] before any search work.
/// `start == goal` yields the single-node path; rejecting it is a policy of
/// the planning layer.
pub fn find_route<G: PlaceGraph + ?Sized>(
    graph: &G,
    start: PlaceId,
    goal: PlaceId,
    heuristic: Heuristic,
    limits: &SearchLimits,
) -> Result<FoundPath> {
    let start_index = graph
        .index_of(start)
        .ok_or(Error::InvalidNode { id: start })?;
    let goal_index = graph.index_of(goal).ok_or(Error::InvalidNode { id: goal })?;

    let mut state = SearchState::new(graph.len());
    let outcome = state.run(graph, start_index, goal_index, heuristic, limits);

    match &outcome {
        Ok(found) => debug!(
            start,
            goal,
            ?heuristic,
            hops = found.places.len().saturating_sub(1),
            distance_km = found.distance_km,
            expansions = found.expansions,
            "route search finished"
        ),
        Err(err) => debug!(start, goal, ?heuristic, error = %err, "route search failed"),
    }

    outcome
}

#[derive(Debug, Clone, Copy)]
struct NodeRecord {
    g_score: f64,
    f_score: f64,
    predecessor: Option<NodeIndex>,
}

impl NodeRecord {
    const UNVISITED: Self = Self {
        g_score: f64::INFINITY,
        f_score: f64::INFINITY,
        predecessor: None,
    };
}

/// Per-search arena of node records, indexed by [`NodeIndex`].
struct SearchState {
    records: Vec<NodeRecord>,
    open: BinaryHeap<AStarEntry>,
    expansions: usize,
}

impl SearchState {
    fn new(node_count: usize) -> Self {
        Self {
            records: vec![NodeRecord::UNVISITED; node_count],
            open: BinaryHeap::new(),
            expansions: 0,
        }
    }

    fn run<G: PlaceGraph + ?Sized>(
        &mut self,
        graph: &G,
        start: NodeIndex,
        goal: NodeIndex,
        heuristic: Heuristic,
        limits: &SearchLimits,
    ) -> Result<FoundPath> {
        let goal_place = graph.place(goal);
        let estimate = |node: NodeIndex| match heuristic {
            Heuristic::GreatCircle => graph.place(node).distance_to(goal_place),
            Heuristic::Zero => 0.0,
        };
        let started = limits.time_budget.map(|_| Instant::now());

        let start_f = estimate(start);
        self.records[start] = NodeRecord {
            g_score: 0.0,
            f_score: start_f,
            predecessor: None,
        };
        self.open.push(AStarEntry::new(start, 0.0, start_f));

        while let Some(entry) = self.open.pop() {
            let record = self.records[entry.node];
            if entry.estimate.0 > record.f_score {
                continue;
            }

            if entry.node == goal {
                return Ok(FoundPath {
                    places: self.reconstruct(graph, goal),
                    distance_km: record.g_score,
                    expansions: self.expansions,
                });
            }

            self.check_limits(limits, started)?;
            self.expansions += 1;

            for (next, weight) in graph.neighbours(entry.node) {
                let tentative_g = record.g_score + weight;
                if tentative_g + IMPROVEMENT_EPSILON_KM < self.records[next].g_score {
                    let f_score = tentative_g + estimate(next);
                    self.records[next] = NodeRecord {
                        g_score: tentative_g,
                        f_score,
                        predecessor: Some(entry.node),
                    };
                    self.open.push(AStarEntry::new(next, tentative_g, f_score));
                }
            }
        }

        Err(Error::NoPathFound {
            start: graph.place(start).id,
            goal: goal_place.id,
        })
    }

    fn check_limits(&self, limits: &SearchLimits, started: Option<Instant>) -> Result<()> {
        if limits
            .cancel
            .as_ref()
            .is_some_and(CancelToken::is_cancelled)
        {
            return Err(Error::SearchCancelled {
                expansions: self.expansions,
            });
        }

        let over_expansions = limits
            .max_expansions
            .is_some_and(|max| self.expansions >= max);
        let over_time = match (limits.time_budget, started) {
            (Some(budget), Some(started)) => started.elapsed() > budget,
            _ => false,
        };
        if over_expansions || over_time {
            return Err(Error::SearchTimeout {
                expansions: self.expansions,
            });
        }

        Ok(())
    }

    fn reconstruct<G: PlaceGraph + ?Sized>(&self, graph: &G, goal: NodeIndex) -> Vec<Place> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(node) = current {
            path.push(graph.place(node).clone());
            current = self.records[node].predecessor;
        }
        path.reverse();
        path
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeIndex,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: NodeIndex, cost: f64, estimate: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(estimate),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate, then the
        // lowest node index.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.cost.cmp(&self.cost))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AdjacencyGraph, CompleteGraph};
    use crate::places::PlaceSet;

    fn line() -> PlaceSet {
        PlaceSet::new(vec![
            Place::new(1, "West", 0.0, 0.0),
            Place::new(2, "Middle", 0.0, 1.0),
            Place::new(3, "East", 0.0, 2.0),
            Place::new(4, "North", 1.0, 1.0),
        ])
        .unwrap()
    }

    fn ids(found: &FoundPath) -> Vec<PlaceId> {
        found.places.iter().map(|p| p.id).collect()
    }

    #[test]
    fn heap_pops_lowest_estimate_then_lowest_index() {
        let mut heap = BinaryHeap::new();
        heap.push(AStarEntry::new(5, 1.0, 3.0));
        heap.push(AStarEntry::new(2, 1.0, 3.0));
        heap.push(AStarEntry::new(9, 1.0, 1.0));
        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![9, 2, 5]);
    }

    #[test]
    fn stale_entries_never_cause_a_second_expansion() {
        let graph = CompleteGraph::new(PlaceSet::builtin());
        let ids: Vec<PlaceId> = graph.places().iter().map(|p| p.id).collect();
        for &start in &ids {
            for &goal in ids.iter().filter(|&&goal| goal != start) {
                let limits = SearchLimits::unbounded();
                let a_star = find_route_a_star(&graph, start, goal, &limits).unwrap();
                let dijkstra = find_route_dijkstra(&graph, start, goal, &limits).unwrap();
                assert!(a_star.expansions < graph.len());
                assert!(dijkstra.expansions < graph.len());
            }
        }
    }

    #[test]
    fn complete_graph_returns_direct_edge() {
        let graph = CompleteGraph::new(line());
        let found = find_route_a_star(&graph, 1, 3, &SearchLimits::unbounded()).unwrap();
        assert_eq!(ids(&found), vec![1, 3]);
        let direct = graph.find(1).unwrap().distance_to(graph.find(3).unwrap());
        assert_eq!(found.distance_km, direct);
    }

    #[test]
    fn adjacency_graph_routes_through_declared_edges() {
        let mut graph = AdjacencyGraph::new(line());
        graph.connect(1, 2).unwrap();
        graph.connect(2, 3).unwrap();
        graph.connect(1, 4).unwrap();
        graph.connect(4, 3).unwrap();

        let found = find_route_a_star(&graph, 1, 3, &SearchLimits::unbounded()).unwrap();
        assert_eq!(ids(&found), vec![1, 2, 3]);

        let dijkstra = find_route_dijkstra(&graph, 1, 3, &SearchLimits::unbounded()).unwrap();
        assert_eq!(ids(&dijkstra), ids(&found));
        assert!((dijkstra.distance_km - found.distance_km).abs() < 1e-9);
    }

    #[test]
    fn disconnected_goal_reports_no_path() {
        let mut graph = AdjacencyGraph::new(line());
        graph.connect(1, 2).unwrap();
        let err = find_route_a_star(&graph, 1, 3, &SearchLimits::unbounded()).unwrap_err();
        assert!(matches!(err, Error::NoPathFound { start: 1, goal: 3 }));
    }

    #[test]
    fn one_way_edges_are_respected() {
        let mut graph = AdjacencyGraph::new(line());
        graph.connect_directed(1, 3).unwrap();
        assert!(find_route_a_star(&graph, 1, 3, &SearchLimits::unbounded()).is_ok());
        assert!(matches!(
            find_route_a_star(&graph, 3, 1, &SearchLimits::unbounded()),
            Err(Error::NoPathFound { .. })
        ));
    }

    #[test]
    fn unknown_endpoints_are_invalid_nodes() {
        let graph = CompleteGraph::new(line());
        let err = find_route_a_star(&graph, 99, 1, &SearchLimits::unbounded()).unwrap_err();
        assert!(matches!(err, Error::InvalidNode { id: 99 }));
        let err = find_route_a_star(&graph, 1, 98, &SearchLimits::unbounded()).unwrap_err();
        assert!(matches!(err, Error::InvalidNode { id: 98 }));
    }

    #[test]
    fn same_start_and_goal_is_single_node() {
        let graph = CompleteGraph::new(line());
        let found = find_route_a_star(&graph, 2, 2, &SearchLimits::unbounded()).unwrap();
        assert_eq!(ids(&found), vec![2]);
        assert_eq!(found.distance_km, 0.0);
        assert_eq!(found.expansions, 0);
    }

    #[test]
    fn expansion_budget_converts_to_timeout() {
        let mut graph = AdjacencyGraph::new(line());
        graph.connect(1, 2).unwrap();
        graph.connect(2, 3).unwrap();
        let limits = SearchLimits::unbounded().with_max_expansions(1);
        let err = find_route_a_star(&graph, 1, 3, &limits).unwrap_err();
        assert!(matches!(err, Error::SearchTimeout { expansions: 1 }));
    }

    #[test]
    fn cancelled_token_stops_search() {
        let graph = CompleteGraph::new(line());
        let token = CancelToken::new();
        token.cancel();
        let limits = SearchLimits::unbounded().with_cancel_token(token);
        let err = find_route_a_star(&graph, 1, 3, &limits).unwrap_err();
        assert!(matches!(err, Error::SearchCancelled { expansions: 0 }));
    }

    #[test]
    fn generous_time_budget_does_not_interfere() {
        let graph = CompleteGraph::new(line());
        let limits = SearchLimits::unbounded().with_time_budget(Duration::from_secs(60));
        assert!(find_route_a_star(&graph, 1, 4, &limits).is_ok());
    }
}
