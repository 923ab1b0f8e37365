//! Route planning between two places.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported routing algorithms (A*, Dijkstra)
//! - [`RouteRequest`] - Start, goal, vehicle, and search limits
//! - [`RoutePlan`] - Planned route with its summary and per-hop legs
//! - [`plan_route`] - Main entry point for computing routes
//!
//! # Example
//!
//! ```
//! use placeroute_lib::{plan_route, CompleteGraph, PlaceSet, RouteRequest, VehicleProfile};
//!
//! let graph = CompleteGraph::new(PlaceSet::builtin());
//! let request = RouteRequest::a_star(1, 2, VehicleProfile::motorbike());
//! let plan = plan_route(&graph, &request)?;
//! assert_eq!(plan.hop_count(), 1);
//! # Ok::<(), placeroute_lib::Error>(())
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::graph::PlaceGraph;
use crate::path::SearchLimits;
use crate::places::{Place, PlaceId};
use crate::summary::{legs, summarize, RouteLeg, RouteSummary};
use crate::vehicle::VehicleProfile;

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum RouteAlgorithm {
    /// A* search (heuristic guided).
    #[default]
    #[serde(rename = "a-star")]
    AStar,
    /// Dijkstra's algorithm (no heuristic).
    #[serde(rename = "dijkstra")]
    Dijkstra,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::AStar => "a-star",
            RouteAlgorithm::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "a-star" | "astar" | "a*" => Ok(RouteAlgorithm::AStar),
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            other => Err(format!("unknown routing algorithm: {other}")),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: PlaceId,
    pub goal: PlaceId,
    pub vehicle: VehicleProfile,
    pub algorithm: RouteAlgorithm,
    pub limits: SearchLimits,
}

impl RouteRequest {
    /// Convenience constructor for unbounded A* routes.
    pub fn a_star(start: PlaceId, goal: PlaceId, vehicle: VehicleProfile) -> Self {
        Self {
            start,
            goal,
            vehicle,
            algorithm: RouteAlgorithm::AStar,
            limits: SearchLimits::unbounded(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub start: PlaceId,
    pub goal: PlaceId,
    pub vehicle: VehicleProfile,
    pub steps: Vec<Place>,
    pub legs: Vec<RouteLeg>,
    pub summary: RouteSummary,
    /// Nodes expanded by the search.
    pub expansions: usize,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Check that both endpoints exist and differ.
///
/// Unknown ids are reported before the same-place check so a typo never
/// masquerades as a same-place selection.
pub(crate) fn validate_endpoints(
    graph: &dyn PlaceGraph,
    start: PlaceId,
    goal: PlaceId,
) -> Result<()> {
    for id in [start, goal] {
        if graph.index_of(id).is_none() {
            return Err(Error::InvalidNode { id });
        }
    }
    if start == goal {
        return Err(Error::SameStartAndGoal { id: start });
    }
    Ok(())
}

/// Compute a route using the requested algorithm.
///
/// 1. Validates both endpoints (`InvalidNode`, `SameStartAndGoal`)
/// 2. Validates the vehicle speed (`InvalidVehicleProfile`)
/// 3. Runs the selected planner (`NoPathFound`, `SearchTimeout`, `SearchCancelled`)
/// 4. Summarises distance, duration, and waypoint count
pub fn plan_route(graph: &dyn PlaceGraph, request: &RouteRequest) -> Result<RoutePlan> {
    validate_endpoints(graph, request.start, request.goal)?;
    request.vehicle.validate()?;

    let planner = select_planner(request.algorithm);
    let found = planner.find_path(graph, request.start, request.goal, &request.limits)?;

    let summary = summarize(&found.places, &request.vehicle)?;
    let legs = legs(&found.places, &request.vehicle)?;

    info!(
        start = request.start,
        goal = request.goal,
        algorithm = %request.algorithm,
        vehicle = %request.vehicle.id,
        distance_km = summary.total_distance_km,
        duration_min = summary.total_duration_min,
        "planned route"
    );

    Ok(RoutePlan {
        algorithm: request.algorithm,
        start: request.start,
        goal: request.goal,
        vehicle: request.vehicle.clone(),
        steps: found.places,
        legs,
        summary,
        expansions: found.expansions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompleteGraph;
    use crate::places::PlaceSet;

    fn graph() -> CompleteGraph {
        CompleteGraph::new(PlaceSet::builtin())
    }

    #[test]
    fn route_plan_hop_count() {
        let plan = plan_route(&graph(), &RouteRequest::a_star(1, 5, VehicleProfile::car())).unwrap();
        assert_eq!(plan.hop_count(), 1);
        assert_eq!(plan.legs.len(), 1);
        assert_eq!(plan.summary.waypoint_count, 0);
    }

    #[test]
    fn same_start_and_goal_is_rejected() {
        let err = plan_route(&graph(), &RouteRequest::a_star(4, 4, VehicleProfile::car()))
            .unwrap_err();
        assert!(matches!(err, Error::SameStartAndGoal { id: 4 }));
    }

    #[test]
    fn unknown_id_wins_over_same_place() {
        let err = plan_route(&graph(), &RouteRequest::a_star(77, 77, VehicleProfile::car()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidNode { id: 77 }));
    }

    #[test]
    fn invalid_vehicle_is_rejected_before_search() {
        let vehicle = VehicleProfile::new("parked", "Parked", -1.0, "");
        let err = plan_route(&graph(), &RouteRequest::a_star(1, 2, vehicle)).unwrap_err();
        assert!(matches!(err, Error::InvalidVehicleProfile { .. }));
    }

    #[test]
    fn algorithm_parses_and_displays() {
        assert_eq!("A-Star".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::AStar));
        assert_eq!("dijkstra".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::Dijkstra));
        assert!("bfs".parse::<RouteAlgorithm>().is_err());
        assert_eq!(RouteAlgorithm::AStar.to_string(), "a-star");
    }
}
