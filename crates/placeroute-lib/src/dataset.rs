//! Locating and loading place and vehicle data.
//!
//! Resolution order for each file:
//! 1. Explicit path argument when provided.
//! 2. Environment variable (`PLACEROUTE_PLACES`, `PLACEROUTE_VEHICLES`,
//!    `PLACEROUTE_FARES`).
//! 3. `places.json`, `vehicles.csv`, or `fares.csv` in the platform data
//!    directory, if present.
//! 4. The data bundled with the library.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fare::FareCatalog;
use crate::places::PlaceSet;
use crate::vehicle::VehicleCatalog;

/// Environment variable overriding the place dataset path.
pub const PLACES_ENV_VAR: &str = "PLACEROUTE_PLACES";
/// Environment variable overriding the vehicle catalog path.
pub const VEHICLES_ENV_VAR: &str = "PLACEROUTE_VEHICLES";
/// Environment variable overriding the fare catalog path.
pub const FARES_ENV_VAR: &str = "PLACEROUTE_FARES";

const PLACES_FILENAME: &str = "places.json";
const VEHICLES_FILENAME: &str = "vehicles.csv";
const FARES_FILENAME: &str = "fares.csv";

/// Platform-specific directory searched for data files.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "placeroute", "placeroute")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Default location of the place dataset.
pub fn default_places_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(PLACES_FILENAME))
}

/// Default location of the vehicle catalog.
pub fn default_vehicles_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(VEHICLES_FILENAME))
}

/// Default location of the fare catalog.
pub fn default_fares_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(FARES_FILENAME))
}

/// Load places following the documented resolution order.
pub fn load_places(explicit: Option<&Path>) -> Result<PlaceSet> {
    let default = default_places_path().ok();
    match resolve_path(explicit, env::var_os(PLACES_ENV_VAR), default)? {
        Some(path) => {
            info!(path = %path.display(), "loading place dataset");
            PlaceSet::from_path(&path)
        }
        None => {
            debug!("using bundled place dataset");
            Ok(PlaceSet::builtin())
        }
    }
}

/// Load vehicle profiles following the documented resolution order.
pub fn load_vehicles(explicit: Option<&Path>) -> Result<VehicleCatalog> {
    let default = default_vehicles_path().ok();
    match resolve_path(explicit, env::var_os(VEHICLES_ENV_VAR), default)? {
        Some(path) => {
            info!(path = %path.display(), "loading vehicle catalog");
            VehicleCatalog::from_path(&path)
        }
        None => {
            debug!("using bundled vehicle presets");
            Ok(VehicleCatalog::builtin())
        }
    }
}

/// Load the fare catalog following the documented resolution order.
pub fn load_fares(explicit: Option<&Path>) -> Result<FareCatalog> {
    let default = default_fares_path().ok();
    match resolve_path(explicit, env::var_os(FARES_ENV_VAR), default)? {
        Some(path) => {
            info!(path = %path.display(), "loading fare catalog");
            FareCatalog::from_path(&path)
        }
        None => {
            debug!("using bundled fare catalog");
            Ok(FareCatalog::builtin())
        }
    }
}

/// Pick the file to load, or `None` for bundled data.
///
/// Explicit and environment paths must exist; the default path is optional.
fn resolve_path(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    default: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    let required = explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from));

    if let Some(path) = required {
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data file not found at {}", path.display()),
            )));
        }
        return Ok(Some(path));
    }

    Ok(default.filter(|path| path.exists()))
}
