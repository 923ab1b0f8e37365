//! Caller-facing route output.
//!
//! [`RouteOutput`] is the shape handed to a UI or API layer: the ordered
//! waypoints plus distance rounded to two decimals and duration rounded to the
//! nearest minute. Rendering helpers turn it into plain or rich text. Trip
//! output also carries the fare quotes for every leg and the per-option
//! totals, cheapest first.

use std::fmt::Write;

use serde::Serialize;

use crate::fare::{format_vnd, FareQuote};
use crate::places::Place;
use crate::routing::{RouteAlgorithm, RoutePlan};
use crate::trip::TripPlan;
use crate::vehicle::VehicleProfile;

/// Presentation style for turning an output into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// Vehicle details echoed back to the caller.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VehicleOutput {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub speed_kmh: f64,
}

impl From<&VehicleProfile> for VehicleOutput {
    fn from(vehicle: &VehicleProfile) -> Self {
        Self {
            id: vehicle.id.clone(),
            name: vehicle.display_name.clone(),
            icon: vehicle.icon.clone(),
            speed_kmh: vehicle.speed_kmh,
        }
    }
}

/// Structured representation of a planned route that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteOutput {
    pub algorithm: RouteAlgorithm,
    pub vehicle: VehicleOutput,
    pub waypoints: Vec<Place>,
    /// Kilometres, rounded to two decimals.
    pub distance_km: f64,
    /// Minutes, rounded to the nearest integer.
    pub duration_min: u64,
    pub waypoint_count: usize,
}

impl RouteOutput {
    pub fn from_plan(plan: &RoutePlan) -> Self {
        Self {
            algorithm: plan.algorithm,
            vehicle: VehicleOutput::from(&plan.vehicle),
            waypoints: plan.steps.clone(),
            distance_km: round_km(plan.summary.total_distance_km),
            duration_min: round_minutes(plan.summary.total_duration_min),
            waypoint_count: plan.summary.waypoint_count,
        }
    }

    /// Render the output using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({:.2} km, {} min by {}, algorithm: {})",
            endpoint_name(self.waypoints.first()),
            endpoint_name(self.waypoints.last()),
            self.distance_km,
            self.duration_min,
            self.vehicle.name,
            self.algorithm
        );
        for (index, place) in self.waypoints.iter().enumerate() {
            let _ = writeln!(buffer, "{:>3}: {} ({})", index, place.name, place.id);
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ ({:.2} km, {} min {} {}, algorithm: `{}`)",
            endpoint_name(self.waypoints.first()),
            endpoint_name(self.waypoints.last()),
            self.distance_km,
            self.duration_min,
            self.vehicle.icon,
            self.vehicle.name,
            self.algorithm
        );
        for (index, place) in self.waypoints.iter().enumerate() {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`) {:.4}, {:.4}",
                index, place.name, place.id, place.latitude, place.longitude
            );
        }
        buffer
    }
}

/// One leg of a trip in caller-facing form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripLegOutput {
    pub step: usize,
    pub from_name: String,
    pub to_name: String,
    pub distance_km: f64,
    pub duration_min: u64,
    /// Quotes for this leg, in fare catalog order.
    pub prices: Vec<FareQuote>,
}

/// Caller-facing trip summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripOutput {
    pub vehicle: VehicleOutput,
    pub optimized_order: Vec<String>,
    pub waypoints: Vec<Place>,
    pub segments: Vec<TripLegOutput>,
    pub distance_km: f64,
    pub duration_min: u64,
    pub waypoint_count: usize,
    /// Whole-trip cost per option, cheapest first.
    pub fare_totals: Vec<FareQuote>,
}

impl TripOutput {
    pub fn from_plan(plan: &TripPlan, vehicle: &VehicleProfile) -> Self {
        let segments = plan
            .legs
            .iter()
            .enumerate()
            .map(|(index, leg)| TripLegOutput {
                step: index + 1,
                from_name: endpoint_name(leg.steps.first()).to_string(),
                to_name: endpoint_name(leg.steps.last()).to_string(),
                distance_km: round_km(leg.summary.total_distance_km),
                duration_min: round_minutes(leg.summary.total_duration_min),
                prices: plan.fares.legs.get(index).cloned().unwrap_or_default(),
            })
            .collect();

        let optimized_order = plan
            .legs
            .iter()
            .map(|leg| endpoint_name(leg.steps.last()).to_string())
            .collect();

        Self {
            vehicle: VehicleOutput::from(vehicle),
            optimized_order,
            waypoints: plan.steps.clone(),
            segments,
            distance_km: round_km(plan.summary.total_distance_km),
            duration_min: round_minutes(plan.summary.total_duration_min),
            waypoint_count: plan.summary.waypoint_count,
            fare_totals: plan.fares.totals.clone(),
        }
    }

    /// Cheapest whole-trip option, if any fares were quoted.
    pub fn cheapest(&self) -> Option<&FareQuote> {
        self.fare_totals.first()
    }

    pub fn render(&self, mode: RouteRenderMode) -> String {
        let mut buffer = String::new();
        let start = endpoint_name(self.waypoints.first());
        match mode {
            RouteRenderMode::PlainText => {
                let _ = writeln!(
                    buffer,
                    "Trip: {} + {} stops ({:.2} km, {} min by {})",
                    start,
                    self.segments.len(),
                    self.distance_km,
                    self.duration_min,
                    self.vehicle.name
                );
                for segment in &self.segments {
                    let _ = writeln!(
                        buffer,
                        "{:>3}: {} -> {} ({:.2} km, {} min)",
                        segment.step,
                        segment.from_name,
                        segment.to_name,
                        segment.distance_km,
                        segment.duration_min
                    );
                }
                if !self.fare_totals.is_empty() {
                    let _ = writeln!(buffer, "Fares (cheapest first):");
                    for quote in &self.fare_totals {
                        let _ = writeln!(
                            buffer,
                            "  {}: {}",
                            quote.name,
                            format_vnd(quote.cost_vnd)
                        );
                    }
                }
            }
            RouteRenderMode::RichText => {
                let _ = writeln!(
                    buffer,
                    "**Trip** _from {}_ ({:.2} km, {} min {} {})",
                    start,
                    self.distance_km,
                    self.duration_min,
                    self.vehicle.icon,
                    self.vehicle.name
                );
                for segment in &self.segments {
                    let _ = writeln!(
                        buffer,
                        "* {:>2}. **{}** → **{}** ({:.2} km, {} min)",
                        segment.step,
                        segment.from_name,
                        segment.to_name,
                        segment.distance_km,
                        segment.duration_min
                    );
                }
                if !self.fare_totals.is_empty() {
                    let _ = writeln!(buffer, "**Fares**");
                    for quote in &self.fare_totals {
                        let _ = writeln!(
                            buffer,
                            "* {}: `{}`",
                            quote.name,
                            format_vnd(quote.cost_vnd)
                        );
                    }
                }
            }
        }
        buffer
    }
}

fn endpoint_name(place: Option<&Place>) -> &str {
    place.map(|p| p.name.as_str()).unwrap_or("<unknown>")
}

/// Round kilometres to two decimal places.
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Round minutes to the nearest whole minute.
pub fn round_minutes(duration_min: f64) -> u64 {
    duration_min.max(0.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompleteGraph;
    use crate::places::PlaceSet;
    use crate::routing::{plan_route, RouteRequest};
    use crate::trip::{plan_trip, TripRequest};

    fn plan() -> RoutePlan {
        let graph = CompleteGraph::new(PlaceSet::builtin());
        plan_route(&graph, &RouteRequest::a_star(1, 2, VehicleProfile::motorbike())).unwrap()
    }

    #[test]
    fn rounding_follows_display_precision() {
        assert_eq!(round_km(0.78764), 0.79);
        assert_eq!(round_km(12.345_1), 12.35);
        assert_eq!(round_minutes(1.575), 2);
        assert_eq!(round_minutes(0.4), 0);
    }

    #[test]
    fn output_serialises_waypoints_with_short_keys() {
        let output = RouteOutput::from_plan(&plan());
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["algorithm"], "a-star");
        assert_eq!(json["waypoint_count"], 0);
        assert_eq!(json["distance_km"], 0.79);
        assert_eq!(json["duration_min"], 2);
        assert_eq!(json["waypoints"][0]["id"], 1);
        assert_eq!(json["waypoints"][1]["lat"], 10.7797);
        assert_eq!(json["vehicle"]["id"], "motorbike");
    }

    #[test]
    fn plain_render_lists_each_waypoint() {
        let text = RouteOutput::from_plan(&plan()).render(RouteRenderMode::PlainText);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("Route: Bến Thành Market -> Nhà Thờ Đức Bà (0.79 km"));
        assert_eq!(lines[1], "  0: Bến Thành Market (1)");
        assert_eq!(lines[2], "  1: Nhà Thờ Đức Bà (2)");
    }

    fn trip_output() -> TripOutput {
        let graph = CompleteGraph::new(PlaceSet::builtin());
        let request = TripRequest::new(1, vec![13, 2], VehicleProfile::motorbike());
        let plan = plan_trip(&graph, &request).unwrap();
        TripOutput::from_plan(&plan, &request.vehicle)
    }

    #[test]
    fn trip_output_carries_leg_prices_and_sorted_totals() {
        let output = trip_output();
        for segment in &output.segments {
            assert_eq!(segment.prices.len(), 7);
        }
        assert_eq!(output.fare_totals.len(), 7);
        assert!(output
            .fare_totals
            .windows(2)
            .all(|pair| pair[0].cost_vnd <= pair[1].cost_vnd));

        let bus_total: u64 = output
            .segments
            .iter()
            .flat_map(|segment| &segment.prices)
            .filter(|quote| quote.option == "bus")
            .map(|quote| quote.cost_vnd)
            .sum();
        let bus = output
            .fare_totals
            .iter()
            .find(|quote| quote.option == "bus")
            .unwrap();
        assert_eq!(bus.cost_vnd, bus_total);
        assert_eq!(output.cheapest(), output.fare_totals.first());
    }

    #[test]
    fn trip_render_lists_fares_after_segments() {
        let text = trip_output().render(RouteRenderMode::PlainText);
        let fares_at = text.find("Fares (cheapest first):").unwrap();
        assert!(text.find("  2: ").unwrap() < fares_at);
        assert!(text.contains("  Xe Buýt: 14,000 VND"));

        let json = serde_json::to_value(trip_output()).unwrap();
        assert_eq!(json["fare_totals"][0]["option"], "bus");
        assert_eq!(json["segments"][0]["prices"][6]["cost_vnd"], 7_000);
    }

    #[test]
    fn rich_render_uses_markdown() {
        let text = RouteOutput::from_plan(&plan()).render(RouteRenderMode::RichText);
        assert!(text.starts_with("**Route**"));
        assert!(text.contains("`a-star`"));
    }
}
