//! Trip command handler for visiting several stops from one start.

use anyhow::{Context, Result};

use placeroute_cli::output::{render_trip, OutputFormat};
use placeroute_lib::{plan_trip, CompleteGraph, RouteAlgorithm, TripOutput, TripRequest};

use super::route::{resolve_id, search_limits};
use super::DataSources;

/// Arguments for the trip command.
#[derive(Debug, Clone)]
pub struct TripCommandArgs {
    pub from: String,
    /// Stops to visit, as ids or names.
    pub stops: Vec<String>,
    pub vehicle: String,
    pub algorithm: RouteAlgorithm,
    /// Visit stops in the order given instead of optimising.
    pub keep_order: bool,
    /// Quote flat fares at the student price.
    pub student: bool,
    pub max_expansions: Option<usize>,
    pub timeout_ms: Option<u64>,
}

/// Handle the trip subcommand.
pub fn handle_trip_command(
    sources: &DataSources,
    args: &TripCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let places = sources.places()?;
    let vehicle = sources.vehicle(&args.vehicle)?;
    let fares = sources.fares()?;
    let start = resolve_id(&places, &args.from)?;
    let stops = args
        .stops
        .iter()
        .map(|selector| resolve_id(&places, selector))
        .collect::<Result<Vec<_>>>()?;

    let graph = CompleteGraph::new(places);
    let mut request = TripRequest::new(start, stops, vehicle.clone())
        .keep_order(args.keep_order)
        .with_fares(fares)
        .student(args.student);
    request.algorithm = args.algorithm;
    request.limits = search_limits(args.max_expansions, args.timeout_ms);

    let plan = plan_trip(&graph, &request)
        .with_context(|| format!("failed to plan trip from {}", args.from))?;

    render_trip(&TripOutput::from_plan(&plan, &vehicle), format)?;
    Ok(())
}
