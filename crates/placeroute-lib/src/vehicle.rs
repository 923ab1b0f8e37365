//! Vehicle profiles and catalog loading.
//!
//! A profile only contributes its speed to route computation; the display
//! name and icon are carried through for presentation.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Identifier of the profile used when the caller does not pick one.
pub const DEFAULT_VEHICLE_ID: &str = "motorbike";

/// Travel mode with an average speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: String,
    pub display_name: String,
    pub speed_kmh: f64,
    #[serde(default)]
    pub icon: String,
}

impl VehicleProfile {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        speed_kmh: f64,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            speed_kmh,
            icon: icon.into(),
        }
    }

    /// Walking at 5 km/h.
    pub fn walk() -> Self {
        Self::new("walk", "Walking", 5.0, "🚶")
    }

    /// Motorbike at 30 km/h.
    pub fn motorbike() -> Self {
        Self::new("motorbike", "Motorbike", 30.0, "🏍️")
    }

    /// Car at 40 km/h.
    pub fn car() -> Self {
        Self::new("car", "Car", 40.0, "🚗")
    }

    /// Ensure the speed is positive and finite.
    pub fn validate(&self) -> Result<()> {
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(Error::InvalidVehicleProfile {
                name: self.id.clone(),
                message: format!("speed must be positive, got {} km/h", self.speed_kmh),
            });
        }
        Ok(())
    }

    /// Minutes needed to cover `distance_km`.
    pub fn travel_minutes(&self, distance_km: f64) -> Result<f64> {
        self.validate()?;
        Ok(distance_km / self.speed_kmh * 60.0)
    }
}

static BUILTIN_VEHICLES: Lazy<Vec<VehicleProfile>> = Lazy::new(|| {
    vec![
        VehicleProfile::walk(),
        VehicleProfile::motorbike(),
        VehicleProfile::car(),
    ]
});

/// Ordered collection of vehicle profiles keyed by case-insensitive id.
#[derive(Debug, Clone, Default)]
pub struct VehicleCatalog {
    vehicles: Vec<VehicleProfile>,
    by_id: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl VehicleCatalog {
    /// Catalog containing the walk, motorbike, and car presets.
    pub fn builtin() -> Self {
        let vehicles = BUILTIN_VEHICLES.clone();
        let by_id = vehicles
            .iter()
            .enumerate()
            .map(|(index, vehicle)| (normalize_id(&vehicle.id), index))
            .collect();
        Self {
            vehicles,
            by_id,
            source: None,
        }
    }

    /// Load a catalog from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        debug!(
            path = %path.display(),
            vehicles = catalog.len(),
            "loaded vehicle catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from CSV with `id,display_name,speed_kmh,icon` headers.
    ///
    /// The `icon` column is optional.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut catalog = Self::default();

        // Header is line 1.
        for (offset, result) in csv_reader.deserialize::<VehicleProfile>().enumerate() {
            let row = offset + 2;
            let vehicle = result.map_err(|err| Error::VehicleDataValidation {
                message: format!("row {row}: {err}"),
            })?;
            vehicle
                .validate()
                .map_err(|err| Error::VehicleDataValidation {
                    message: format!("row {row}: {err}"),
                })?;
            catalog.insert(vehicle)?;
        }

        Ok(catalog)
    }

    /// Add a profile, rejecting invalid speeds and duplicate ids.
    pub fn insert(&mut self, vehicle: VehicleProfile) -> Result<()> {
        vehicle.validate()?;
        let key = normalize_id(&vehicle.id);
        if self.by_id.contains_key(&key) {
            return Err(Error::DuplicateVehicle { name: vehicle.id });
        }
        self.by_id.insert(key, self.vehicles.len());
        self.vehicles.push(vehicle);
        Ok(())
    }

    /// Lookup a profile by id, ignoring case.
    pub fn get(&self, id: &str) -> Option<&VehicleProfile> {
        self.by_id
            .get(&normalize_id(id))
            .map(|&index| &self.vehicles[index])
    }

    /// Lookup a profile or fail with [`Error::UnknownVehicle`].
    pub fn require(&self, id: &str) -> Result<&VehicleProfile> {
        self.get(id).ok_or_else(|| Error::UnknownVehicle {
            name: id.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleProfile> {
        self.vehicles.iter()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// File this catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}
