use serde::Serialize;

use crate::error::{Error, Result};
use crate::places::{Place, PlaceId};
use crate::vehicle::VehicleProfile;

/// Distance, travel time, and intermediate stop count for a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    pub total_distance_km: f64,
    pub total_duration_min: f64,
    /// Places strictly between the start and the goal.
    pub waypoint_count: usize,
}

/// One hop of a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: PlaceId,
    pub to: PlaceId,
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Summarise an ordered path for the given vehicle.
///
/// A single-place path is zero distance and zero duration. The vehicle speed
/// must be positive, otherwise [`Error::InvalidVehicleProfile`] is returned.
pub fn summarize(path: &[Place], vehicle: &VehicleProfile) -> Result<RouteSummary> {
    vehicle.validate()?;
    if path.is_empty() {
        return Err(Error::EmptyRoutePlan);
    }

    let total_distance_km = path_distance_km(path);
    Ok(RouteSummary {
        total_distance_km,
        total_duration_min: vehicle.travel_minutes(total_distance_km)?,
        waypoint_count: path.len().saturating_sub(2),
    })
}

/// Per-hop breakdown of a path; empty for paths shorter than two places.
pub fn legs(path: &[Place], vehicle: &VehicleProfile) -> Result<Vec<RouteLeg>> {
    vehicle.validate()?;
    path.windows(2)
        .map(|pair| {
            let distance_km = pair[0].distance_to(&pair[1]);
            Ok(RouteLeg {
                from: pair[0].id,
                to: pair[1].id,
                distance_km,
                duration_min: vehicle.travel_minutes(distance_km)?,
            })
        })
        .collect()
}

/// Sum of great-circle distances between consecutive places.
pub fn path_distance_km(path: &[Place]) -> f64 {
    path.windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}
