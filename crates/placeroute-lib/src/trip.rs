//! Multi-stop trips.
//!
//! Stops are reordered to minimise the total great-circle distance of the
//! open tour `start -> stop -> ... -> stop` by trying every permutation, so
//! the number of stops is capped at [`MAX_TRIP_STOPS`]. Each consecutive pair
//! is then routed with the selected planner and priced against the request's
//! fare catalog, using the estimated road distance of each leg.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fare::{estimated_road_km, FareCatalog, TripFares};
use crate::graph::{NodeIndex, PlaceGraph};
use crate::path::SearchLimits;
use crate::places::{Place, PlaceId};
use crate::routing::{plan_route, RouteAlgorithm, RoutePlan, RouteRequest};
use crate::summary::{summarize, RouteSummary};
use crate::vehicle::VehicleProfile;

/// Largest stop count accepted by the exhaustive ordering (7! = 5040 tours).
pub const MAX_TRIP_STOPS: usize = 7;

/// Request to visit several stops starting from one place.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub start: PlaceId,
    pub stops: Vec<PlaceId>,
    pub vehicle: VehicleProfile,
    pub algorithm: RouteAlgorithm,
    pub limits: SearchLimits,
    /// Keep the caller's stop order instead of optimising it.
    pub keep_order: bool,
    pub fares: FareCatalog,
    /// Price flat fares at the student rate.
    pub student: bool,
}

impl TripRequest {
    pub fn new(start: PlaceId, stops: Vec<PlaceId>, vehicle: VehicleProfile) -> Self {
        Self {
            start,
            stops,
            vehicle,
            algorithm: RouteAlgorithm::AStar,
            limits: SearchLimits::unbounded(),
            keep_order: false,
            fares: FareCatalog::builtin(),
            student: false,
        }
    }

    pub fn keep_order(mut self, keep: bool) -> Self {
        self.keep_order = keep;
        self
    }

    pub fn with_fares(mut self, fares: FareCatalog) -> Self {
        self.fares = fares;
        self
    }

    pub fn student(mut self, student: bool) -> Self {
        self.student = student;
        self
    }
}

/// Planned trip: the chosen stop order and one route per leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub start: PlaceId,
    /// Stops in visiting order.
    pub order: Vec<PlaceId>,
    pub legs: Vec<RoutePlan>,
    /// Every place visited, start first, without repeating leg joins.
    pub steps: Vec<Place>,
    pub summary: RouteSummary,
    pub fares: TripFares,
}

/// Plan a trip through all requested stops.
pub fn plan_trip(graph: &dyn PlaceGraph, request: &TripRequest) -> Result<TripPlan> {
    if request.stops.is_empty() {
        return Err(Error::EmptyTrip);
    }
    if request.stops.len() > MAX_TRIP_STOPS {
        return Err(Error::TooManyStops {
            count: request.stops.len(),
            max: MAX_TRIP_STOPS,
        });
    }

    let start = graph
        .index_of(request.start)
        .ok_or(Error::InvalidNode { id: request.start })?;
    let mut seen = HashSet::from([request.start]);
    let mut stops = Vec::with_capacity(request.stops.len());
    for &id in &request.stops {
        let index = graph.index_of(id).ok_or(Error::InvalidNode { id })?;
        if !seen.insert(id) {
            return Err(Error::DuplicateStop { id });
        }
        stops.push(index);
    }
    request.vehicle.validate()?;

    let ordered = if request.keep_order {
        stops
    } else {
        optimize_stop_order(graph, start, &stops)
    };
    let order: Vec<PlaceId> = ordered.iter().map(|&i| graph.place(i).id).collect();
    debug!(start = request.start, ?order, "selected stop order");

    let mut legs = Vec::with_capacity(order.len());
    let mut from = request.start;
    for &to in &order {
        let leg_request = RouteRequest::a_star(from, to, request.vehicle.clone())
            .with_algorithm(request.algorithm)
            .with_limits(request.limits.clone());
        legs.push(plan_route(graph, &leg_request)?);
        from = to;
    }

    let mut steps: Vec<Place> = Vec::new();
    for leg in &legs {
        let skip = usize::from(!steps.is_empty());
        steps.extend(leg.steps.iter().skip(skip).cloned());
    }
    let summary = summarize(&steps, &request.vehicle)?;

    let road_km: Vec<f64> = legs
        .iter()
        .map(|leg| estimated_road_km(leg.summary.total_distance_km))
        .collect();
    let fares = request.fares.price_legs(&road_km, request.student);

    info!(
        start = request.start,
        stops = order.len(),
        distance_km = summary.total_distance_km,
        duration_min = summary.total_duration_min,
        cheapest = fares.totals.first().map(|quote| quote.option.as_str()),
        "planned trip"
    );

    Ok(TripPlan {
        start: request.start,
        order,
        legs,
        steps,
        summary,
        fares,
    })
}

/// Order `stops` to minimise the straight-line length of the open tour.
///
/// Permutations are visited in lexicographic order of the input positions and
/// only a strictly shorter tour replaces the best one, so ties keep the order
/// closest to the caller's.
pub fn optimize_stop_order(
    graph: &dyn PlaceGraph,
    start: NodeIndex,
    stops: &[NodeIndex],
) -> Vec<NodeIndex> {
    if stops.len() <= 1 {
        return stops.to_vec();
    }

    let tour_length = |perm: &[usize]| {
        let mut previous = graph.place(start);
        let mut total = 0.0;
        for &position in perm {
            let next = graph.place(stops[position]);
            total += previous.distance_to(next);
            previous = next;
        }
        total
    };

    let mut permutation: Vec<usize> = (0..stops.len()).collect();
    let mut best = permutation.clone();
    let mut best_length = tour_length(&permutation);

    while next_permutation(&mut permutation) {
        let length = tour_length(&permutation);
        if length < best_length {
            best_length = length;
            best.clone_from(&permutation);
        }
    }

    best.into_iter().map(|position| stops[position]).collect()
}

/// Advance to the next lexicographic permutation; `false` once exhausted.
fn next_permutation(values: &mut [usize]) -> bool {
    let Some(pivot) = values.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };
    let successor = values
        .iter()
        .rposition(|&value| value > values[pivot])
        .unwrap_or(pivot + 1);
    values.swap(pivot, successor);
    values[pivot + 1..].reverse();
    true
}
