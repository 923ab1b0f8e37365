use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use placeroute_lib::{
    plan_route, plan_trip, CompleteGraph, PlaceSet, RouteAlgorithm, RouteRequest, TripRequest,
    VehicleProfile,
};
use std::hint::black_box;

static GRAPH: Lazy<CompleteGraph> = Lazy::new(|| CompleteGraph::new(PlaceSet::builtin()));
static ASTAR_REQUEST: Lazy<RouteRequest> =
    Lazy::new(|| RouteRequest::a_star(17, 13, VehicleProfile::motorbike()));
static DIJKSTRA_REQUEST: Lazy<RouteRequest> = Lazy::new(|| {
    RouteRequest::a_star(17, 13, VehicleProfile::motorbike())
        .with_algorithm(RouteAlgorithm::Dijkstra)
});
static TRIP_REQUEST: Lazy<TripRequest> =
    Lazy::new(|| TripRequest::new(1, vec![20, 2, 15, 9, 6, 11, 4], VehicleProfile::car()));

fn benchmark_pathfinding(c: &mut Criterion) {
    let graph = &*GRAPH;

    c.bench_function("astar_builtin", |b| {
        let request = &*ASTAR_REQUEST;
        b.iter(|| {
            let plan = plan_route(graph, request).expect("route exists");
            black_box(plan.expansions)
        });
    });

    c.bench_function("dijkstra_builtin", |b| {
        let request = &*DIJKSTRA_REQUEST;
        b.iter(|| {
            let plan = plan_route(graph, request).expect("route exists");
            black_box(plan.expansions)
        });
    });

    c.bench_function("trip_seven_stops", |b| {
        let request = &*TRIP_REQUEST;
        b.iter(|| {
            let trip = plan_trip(graph, request).expect("trip exists");
            black_box(trip.summary.total_distance_km)
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
