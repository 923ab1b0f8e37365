//! Route planning strategies.
//!
//! Each [`RoutePlanner`] wraps one search algorithm so [`super::plan_route`]
//! can stay agnostic of which one the caller picked.

use crate::error::Result;
use crate::graph::PlaceGraph;
use crate::path::{find_route_a_star, find_route_dijkstra, FoundPath, SearchLimits};
use crate::places::PlaceId;

use super::RouteAlgorithm;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the pathfinding algorithm on the given graph.
    fn find_path(
        &self,
        graph: &dyn PlaceGraph,
        start: PlaceId,
        goal: PlaceId,
        limits: &SearchLimits,
    ) -> Result<FoundPath>;
}

/// A* planner guided by great-circle distance to the goal.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &dyn PlaceGraph,
        start: PlaceId,
        goal: PlaceId,
        limits: &SearchLimits,
    ) -> Result<FoundPath> {
        find_route_a_star(graph, start, goal, limits)
    }
}

/// Dijkstra planner; explores uniformly without a heuristic.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &dyn PlaceGraph,
        start: PlaceId,
        goal: PlaceId,
        limits: &SearchLimits,
    ) -> Result<FoundPath> {
        find_route_dijkstra(graph, start, goal, limits)
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn astar_planner_returns_correct_algorithm() {
        assert_eq!(AStarPlanner.algorithm(), RouteAlgorithm::AStar);
    }

    #[test]
    fn dijkstra_planner_returns_correct_algorithm() {
        assert_eq!(DijkstraPlanner.algorithm(), RouteAlgorithm::Dijkstra);
    }

    #[test]
    fn select_planner_chooses_correct_type() {
        for algorithm in [RouteAlgorithm::AStar, RouteAlgorithm::Dijkstra] {
            assert_eq!(select_planner(algorithm).algorithm(), algorithm);
        }
    }
}
