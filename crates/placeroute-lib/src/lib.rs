//! placeroute library entry points.
//!
//! This crate loads a set of named places, builds a graph over them, and runs
//! A* to find the shortest great-circle route between two places, then
//! summarises it for a chosen vehicle. Multi-stop trips are also priced
//! against a catalog of ride-hailing and bus fares. Higher-level consumers
//! (the CLI) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod error;
pub mod fare;
pub mod geo;
pub mod graph;
pub mod output;
pub mod path;
pub mod places;
pub mod routing;
pub mod snapshot;
pub mod summary;
pub mod trip;
pub mod vehicle;

pub use dataset::{default_data_dir, load_fares, load_places, load_vehicles};
pub use error::{Error, Result};
pub use fare::{FareCatalog, FareKind, FareOption, FareQuote, TripFares};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use graph::{AdjacencyGraph, CompleteGraph, GraphMode, NodeIndex, PlaceGraph};
pub use output::{RouteOutput, RouteRenderMode, TripOutput};
pub use path::{find_route_a_star, find_route_dijkstra, CancelToken, FoundPath, SearchLimits};
pub use places::{Place, PlaceId, PlaceSet};
pub use routing::{plan_route, RouteAlgorithm, RoutePlan, RouteRequest};
pub use snapshot::GraphStore;
pub use summary::{summarize, RouteLeg, RouteSummary};
pub use trip::{plan_trip, TripPlan, TripRequest, MAX_TRIP_STOPS};
pub use vehicle::{VehicleCatalog, VehicleProfile, DEFAULT_VEHICLE_ID};
