//! Vehicles command handler for listing travel profiles.

use anyhow::Result;

use placeroute_cli::output::{render_json, OutputFormat};
use placeroute_lib::{VehicleProfile, DEFAULT_VEHICLE_ID};

use super::DataSources;

/// Handle the vehicles subcommand.
pub fn handle_vehicles_command(sources: &DataSources, format: OutputFormat) -> Result<()> {
    let catalog = sources.vehicles()?;
    let vehicles: Vec<&VehicleProfile> = catalog.iter().collect();

    if format == OutputFormat::Json {
        render_json(&vehicles)?;
        return Ok(());
    }

    if vehicles.is_empty() {
        println!("No vehicles available in catalog.");
        return Ok(());
    }

    println!("Available vehicles ({}):", vehicles.len());
    println!("{:<12} {:<16} {:>10}", "Id", "Name", "Speed");
    for vehicle in vehicles {
        let marker = if vehicle.id.eq_ignore_ascii_case(DEFAULT_VEHICLE_ID) {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<12} {:<16} {:>6.1} km/h {}{}",
            vehicle.id, vehicle.display_name, vehicle.speed_kmh, vehicle.icon, marker
        );
    }
    Ok(())
}
