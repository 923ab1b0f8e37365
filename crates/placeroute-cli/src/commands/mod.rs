// Handlers for CLI subcommands. main.rs parses arguments and dispatches here.

pub mod places;
pub mod route;
pub mod trip;
pub mod vehicles;

use std::path::PathBuf;

use anyhow::{Context, Result};

use placeroute_lib::{
    load_fares, load_places, load_vehicles, FareCatalog, PlaceSet, VehicleCatalog, VehicleProfile,
};

/// Data file overrides shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct DataSources {
    pub places: Option<PathBuf>,
    pub vehicles: Option<PathBuf>,
    pub fares: Option<PathBuf>,
}

impl DataSources {
    pub fn places(&self) -> Result<PlaceSet> {
        load_places(self.places.as_deref()).context("failed to load place dataset")
    }

    pub fn vehicles(&self) -> Result<VehicleCatalog> {
        load_vehicles(self.vehicles.as_deref()).context("failed to load vehicle catalog")
    }

    pub fn fares(&self) -> Result<FareCatalog> {
        load_fares(self.fares.as_deref()).context("failed to load fare catalog")
    }

    /// Look up a vehicle profile by id in the configured catalog.
    pub fn vehicle(&self, id: &str) -> Result<VehicleProfile> {
        let catalog = self.vehicles()?;
        Ok(catalog.require(id)?.clone())
    }
}
