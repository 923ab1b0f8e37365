//! Place datasets: loading, validation, and name lookup.
//!
//! A dataset is an ordered list of [`Place`] records. Order is preserved from
//! the source file because it drives neighbour enumeration and therefore the
//! search tie-break (see [`crate::path`]).

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Numeric identifier for a place.
pub type PlaceId = i64;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Named geographic point of interest.
///
/// Serialises as `{ "id", "name", "lat", "lon" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Place {
    pub fn new(id: PlaceId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Great-circle distance to another place in kilometres.
    pub fn distance_to(&self, other: &Place) -> f64 {
        self.coordinate().distance_to(&other.coordinate())
    }
}

/// Validated, ordered collection of places with unique identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSet {
    places: Vec<Place>,
}

impl PlaceSet {
    /// Validate and wrap a list of places.
    ///
    /// Fails on an empty list, duplicate ids, or out-of-range coordinates.
    pub fn new(places: Vec<Place>) -> Result<Self> {
        if places.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut seen = HashSet::with_capacity(places.len());
        for place in &places {
            if !seen.insert(place.id) {
                return Err(Error::DuplicatePlaceId { id: place.id });
            }
            if !place.coordinate().is_valid() {
                return Err(Error::InvalidCoordinate {
                    id: place.id,
                    latitude: place.latitude,
                    longitude: place.longitude,
                });
            }
        }

        Ok(Self { places })
    }

    /// The landmark dataset bundled with the library.
    pub fn builtin() -> Self {
        Self {
            places: BUILTIN_PLACES.clone(),
        }
    }

    /// Load places from a `.json` or `.csv` file, chosen by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let file = fs::File::open(path)?;
        let set = match extension.as_deref() {
            Some("json") => Self::from_json_reader(file)?,
            Some("csv") => Self::from_csv_reader(file)?,
            _ => {
                return Err(Error::UnsupportedPlaceFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        debug!(
            path = %path.display(),
            places = set.len(),
            "loaded place dataset"
        );
        Ok(set)
    }

    /// Load places from a JSON array of `{ id, name, lat, lon }` objects.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let places: Vec<Place> = serde_json::from_reader(reader)?;
        Self::new(places)
    }

    /// Load places from CSV with `id,name,lat,lon` headers.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut places = Vec::new();

        // Header is line 1.
        for (offset, result) in csv_reader.deserialize::<Place>().enumerate() {
            let row = offset + 2;
            places.push(result.map_err(|err| Error::PlaceDataValidation {
                message: format!("row {row}: {err}"),
            })?);
        }

        Self::new(places)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }

    pub fn as_slice(&self) -> &[Place] {
        &self.places
    }

    pub fn into_vec(self) -> Vec<Place> {
        self.places
    }

    /// Lookup a place by identifier.
    pub fn get(&self, id: PlaceId) -> Option<&Place> {
        self.places.iter().find(|place| place.id == id)
    }

    /// Places whose name matches `name`, ignoring case and surrounding
    /// whitespace, in dataset order.
    pub fn find_by_name(&self, name: &str) -> Vec<&Place> {
        let wanted = name.trim().to_lowercase();
        self.places
            .iter()
            .filter(|place| place.name.to_lowercase() == wanted)
            .collect()
    }

    /// Resolve a user-supplied selector: a numeric id or a place name.
    ///
    /// Unknown ids yield [`Error::InvalidNode`]; unknown names yield
    /// [`Error::UnknownPlace`] with up to three suggestions, and a name shared
    /// by several places yields [`Error::AmbiguousPlace`] with their ids.
    pub fn resolve(&self, selector: &str) -> Result<&Place> {
        if let Ok(id) = selector.trim().parse::<PlaceId>() {
            return self.get(id).ok_or(Error::InvalidNode { id });
        }

        match self.find_by_name(selector).as_slice() {
            [place] => Ok(*place),
            [] => {
                let mut suggestions: Vec<String> = Vec::new();
                for place in self.fuzzy_name_matches(selector, self.places.len()) {
                    if !suggestions.contains(&place.name) {
                        suggestions.push(place.name.clone());
                    }
                    if suggestions.len() == 3 {
                        break;
                    }
                }
                Err(Error::UnknownPlace {
                    name: selector.to_string(),
                    suggestions,
                })
            }
            matches => Err(Error::AmbiguousPlace {
                name: selector.trim().to_string(),
                ids: matches.iter().map(|place| place.id).collect(),
            }),
        }
    }

    /// Places with names most similar to `query`, best match first.
    ///
    /// Each place appears at most once; places sharing a name are ordered by id.
    pub fn fuzzy_name_matches(&self, query: &str, limit: usize) -> Vec<&Place> {
        let query = query.trim().to_lowercase();
        let mut scored: Vec<(f64, &Place)> = self
            .places
            .iter()
            .map(|place| {
                let score = strsim::jaro_winkler(&query, &place.name.to_lowercase());
                (score, place)
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| a.1.name.cmp(&b.1.name))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(_, place)| place)
            .collect()
    }
}

impl<'a> IntoIterator for &'a PlaceSet {
    type Item = &'a Place;
    type IntoIter = std::slice::Iter<'a, Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.iter()
    }
}

/// Twenty landmarks in central Ho Chi Minh City.
static BUILTIN_PLACES: Lazy<Vec<Place>> = Lazy::new(|| {
    [
        (1, "Bến Thành Market", 10.7727, 106.6980),
        (2, "Nhà Thờ Đức Bà", 10.7797, 106.6991),
        (3, "Bưu Điện Trung Tâm", 10.7798, 106.6997),
        (4, "Dinh Độc Lập", 10.7769, 106.6955),
        (5, "Chợ Bình Tây", 10.7502, 106.6392),
        (6, "Phố Đi Bộ Nguyễn Huệ", 10.7743, 106.7011),
        (7, "Bitexco Tower", 10.7716, 106.7039),
        (8, "Thảo Cầm Viên", 10.7878, 106.7057),
        (9, "Bảo Tàng Chứng Tích Chiến Tranh", 10.7796, 106.6919),
        (10, "Bến Nhà Rồng", 10.7675, 106.7073),
        (11, "Chợ Ân Đông", 10.7535, 106.6680),
        (12, "Chợ Tân Định", 10.7889, 106.6917),
        (13, "Làng Du Lịch Bình Quới", 10.8042, 106.7429),
        (14, "Công Viên Lê Văn Tám", 10.7830, 106.6872),
        (15, "Chợ Bà Chiểu", 10.8119, 106.6954),
        (16, "Vincom Center", 10.7828, 106.7005),
        (17, "Đầm Sen Park", 10.7649, 106.6376),
        (18, "Phố Tây Bùi Viện", 10.7666, 106.6925),
        (19, "TTTM Saigon Centre", 10.7822, 106.7016),
        (20, "Chùa Vĩnh Nghiêm", 10.7995, 106.6804),
    ]
    .into_iter()
    .map(|(id, name, lat, lon)| Place::new(id, name, lat, lon))
    .collect()
});
