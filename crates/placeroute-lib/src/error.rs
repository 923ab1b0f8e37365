use std::path::PathBuf;

use thiserror::Error;

use crate::places::PlaceId;

/// Convenient result alias for the placeroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a graph is built from a dataset with no places in it.
    #[error("place dataset is empty; at least one place is required")]
    EmptyDataset,

    /// Raised when two places in one dataset share an identifier.
    #[error("duplicate place id {id} in dataset")]
    DuplicatePlaceId { id: PlaceId },

    /// Raised when a place carries a latitude or longitude outside the valid range.
    #[error("place {id} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        id: PlaceId,
        latitude: f64,
        longitude: f64,
    },

    /// Raised when a graph lookup by identifier fails.
    #[error("place {id} not found in graph")]
    PlaceNotFound { id: PlaceId },

    /// Raised when a route endpoint does not reference a loaded place.
    #[error("invalid selection: place {id} is not in the current dataset")]
    InvalidNode { id: PlaceId },

    /// Raised when a place name could not be resolved against the dataset.
    #[error("unknown place name: {name}{}", format_suggestions(.suggestions))]
    UnknownPlace {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the start and goal of a route are the same place.
    #[error("start and destination are the same place ({id})")]
    SameStartAndGoal { id: PlaceId },

    /// Raised when the frontier is exhausted before the goal is reached.
    #[error("no route found between {start} and {goal}")]
    NoPathFound { start: PlaceId, goal: PlaceId },

    /// Raised when a search exceeds its expansion or time budget.
    #[error("route search exceeded its budget after {expansions} expansions")]
    SearchTimeout { expansions: usize },

    /// Raised when a search observes a cancelled token.
    #[error("route search was cancelled after {expansions} expansions")]
    SearchCancelled { expansions: usize },

    /// Raised when a computed route plan lacks any places.
    #[error("route plan was empty")]
    EmptyRoutePlan,

    /// Raised when a vehicle profile cannot produce a finite travel time.
    #[error("invalid vehicle profile '{name}': {message}")]
    InvalidVehicleProfile { name: String, message: String },

    /// Raised when a vehicle identifier is not present in the catalog.
    #[error("unknown vehicle profile: {name}")]
    UnknownVehicle { name: String },

    /// Raised when duplicate vehicle ids are encountered during catalog load.
    #[error("duplicate vehicle profile encountered: {name}")]
    DuplicateVehicle { name: String },

    /// Raised when vehicle data fails validation while loading.
    #[error("invalid vehicle data: {message}")]
    VehicleDataValidation { message: String },

    /// Raised when a fare option carries a negative or non-finite amount.
    #[error("invalid fare option '{name}': {message}")]
    InvalidFareOption { name: String, message: String },

    /// Raised when duplicate fare option ids are encountered during catalog load.
    #[error("duplicate fare option encountered: {name}")]
    DuplicateFareOption { name: String },

    /// Raised when fare data fails validation while loading.
    #[error("invalid fare data: {message}")]
    FareDataValidation { message: String },

    /// Raised when a trip is requested without any stops.
    #[error("trip requires at least one stop")]
    EmptyTrip,

    /// Raised when a trip has more stops than exhaustive ordering supports.
    #[error("trip has {count} stops; at most {max} are supported")]
    TooManyStops { count: usize, max: usize },

    /// Raised when a trip visits the same place twice or revisits its start.
    #[error("place {id} appears more than once in the trip")]
    DuplicateStop { id: PlaceId },

    /// Raised when a row of a place file cannot be parsed.
    #[error("invalid place data: {message}")]
    PlaceDataValidation { message: String },

    /// Raised when a place name matches more than one place.
    #[error("place name '{name}' is ambiguous; select one of ids {}", format_ids(.ids))]
    AmbiguousPlace { name: String, ids: Vec<PlaceId> },

    /// Raised when a place file has an extension we do not know how to read.
    #[error("unsupported place file format: {path}")]
    UnsupportedPlaceFormat { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for place data")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn format_ids(ids: &[PlaceId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
