//! Route command handler for computing a path between two places.

use std::time::Duration;

use anyhow::{Context, Result};

use placeroute_cli::output::{render_route, OutputFormat};
use placeroute_lib::{
    plan_route, CompleteGraph, PlaceId, PlaceSet, RouteAlgorithm, RouteOutput, RouteRequest,
    SearchLimits,
};

use super::DataSources;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting place id or name.
    pub from: String,
    /// Destination place id or name.
    pub to: String,
    /// Vehicle profile id.
    pub vehicle: String,
    pub algorithm: RouteAlgorithm,
    /// Stop after this many node expansions.
    pub max_expansions: Option<usize>,
    /// Wall-clock budget in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl RouteCommandArgs {
    /// Search limits derived from the budget flags.
    pub fn limits(&self) -> SearchLimits {
        search_limits(self.max_expansions, self.timeout_ms)
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    sources: &DataSources,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let places = sources.places()?;
    let vehicle = sources.vehicle(&args.vehicle)?;
    let start = resolve_id(&places, &args.from)?;
    let goal = resolve_id(&places, &args.to)?;

    let graph = CompleteGraph::new(places);
    let request = RouteRequest::a_star(start, goal, vehicle)
        .with_algorithm(args.algorithm)
        .with_limits(args.limits());
    let plan = plan_route(&graph, &request)
        .with_context(|| format!("failed to plan route from {} to {}", args.from, args.to))?;

    render_route(&RouteOutput::from_plan(&plan), format)?;
    Ok(())
}

pub(crate) fn search_limits(
    max_expansions: Option<usize>,
    timeout_ms: Option<u64>,
) -> SearchLimits {
    let mut limits = SearchLimits::unbounded();
    if let Some(max) = max_expansions {
        limits = limits.with_max_expansions(max);
    }
    if let Some(ms) = timeout_ms {
        limits = limits.with_time_budget(Duration::from_millis(ms));
    }
    limits
}

/// Resolve an id or name given on the command line.
pub(crate) fn resolve_id(places: &PlaceSet, selector: &str) -> Result<PlaceId> {
    Ok(places.resolve(selector)?.id)
}
