//! Places command handler for listing and searching the dataset.

use anyhow::Result;
use serde::Serialize;

use placeroute_cli::output::{render_json, OutputFormat};
use placeroute_lib::{Place, PlaceSet};

use super::DataSources;

#[derive(Debug, Serialize)]
struct PlaceListing<'a> {
    count: usize,
    places: Vec<&'a Place>,
}

/// Handle the places subcommand.
///
/// With `search`, only names similar to the query are listed, best first.
pub fn handle_places_command(
    sources: &DataSources,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let places = sources.places()?;
    let selected = select(&places, search);

    if format == OutputFormat::Json {
        render_json(&PlaceListing {
            count: selected.len(),
            places: selected,
        })?;
        return Ok(());
    }

    if selected.is_empty() {
        println!("No places match.");
        return Ok(());
    }

    println!("Places ({}):", selected.len());
    println!("{:>6}  {:<34} {:>9} {:>10}", "Id", "Name", "Lat", "Lon");
    for place in selected {
        println!(
            "{:>6}  {:<34} {:>9.4} {:>10.4}",
            place.id, place.name, place.latitude, place.longitude
        );
    }
    Ok(())
}

fn select<'a>(places: &'a PlaceSet, search: Option<&str>) -> Vec<&'a Place> {
    match search {
        None => places.iter().collect(),
        Some(query) => places.fuzzy_name_matches(query, places.len()),
    }
}
