//! Fare estimates for ride-hailing and bus options.
//!
//! Metered options charge `base_fare` for the first `base_distance_km`, then a
//! per-kilometre rate in three tiers: the next [`FIRST_TIER_KM`], the
//! [`SECOND_TIER_KM`] after that, and everything beyond. With the usual 2 km
//! base the tiers cover km 3 to 12, 13 to 25, and 26 onwards.
//!
//! Flat options (the bus) charge one ticket per leg, with an optional student
//! price, and a second ticket once the leg is longer than
//! [`FLAT_FARE_DOUBLING_KM`]. Every quote is rounded to the nearest 1,000 VND.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Kilometres billed at `per_km_first` once the base distance is used up.
pub const FIRST_TIER_KM: f64 = 10.0;
/// Kilometres billed at `per_km_second` after the first tier.
pub const SECOND_TIER_KM: f64 = 13.0;
/// Flat fares double on legs longer than this.
pub const FLAT_FARE_DOUBLING_KM: f64 = 15.0;
/// Ratio between road and great-circle distance used when pricing legs.
pub const ROAD_DISTANCE_FACTOR: f64 = 1.3;

const ROUNDING_VND: f64 = 1000.0;

/// How an option turns distance into a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FareKind {
    Metered,
    Flat,
}

/// One way of paying for a leg, priced in VND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareOption {
    pub id: String,
    pub display_name: String,
    pub kind: FareKind,
    pub base_fare: f64,
    #[serde(default)]
    pub base_distance_km: f64,
    #[serde(default)]
    pub per_km_first: f64,
    #[serde(default)]
    pub per_km_second: f64,
    #[serde(default)]
    pub per_km_rest: f64,
    /// Discounted flat fare for students; ignored by metered options.
    #[serde(default)]
    pub student_fare: Option<f64>,
}

impl FareOption {
    /// Metered option with a base fare and three per-kilometre tiers.
    pub fn metered(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base_fare: f64,
        base_distance_km: f64,
        tiers: [f64; 3],
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind: FareKind::Metered,
            base_fare,
            base_distance_km,
            per_km_first: tiers[0],
            per_km_second: tiers[1],
            per_km_rest: tiers[2],
            student_fare: None,
        }
    }

    /// Flat-ticket option with an optional student price.
    pub fn flat(
        id: impl Into<String>,
        display_name: impl Into<String>,
        fare: f64,
        student_fare: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind: FareKind::Flat,
            base_fare: fare,
            base_distance_km: 0.0,
            per_km_first: 0.0,
            per_km_second: 0.0,
            per_km_rest: 0.0,
            student_fare,
        }
    }

    /// Ensure every amount and distance is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("base_fare", self.base_fare),
            ("base_distance_km", self.base_distance_km),
            ("per_km_first", self.per_km_first),
            ("per_km_second", self.per_km_second),
            ("per_km_rest", self.per_km_rest),
            ("student_fare", self.student_fare.unwrap_or(0.0)),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidFareOption {
                    name: self.id.clone(),
                    message: format!("{field} must be non-negative, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Price of one leg of `distance_km`, rounded to the nearest 1,000 VND.
    pub fn quote(&self, distance_km: f64, student: bool) -> u64 {
        let distance_km = distance_km.max(0.0);
        let fare = match self.kind {
            FareKind::Metered => self.metered_fare(distance_km),
            FareKind::Flat => {
                let ticket = match (student, self.student_fare) {
                    (true, Some(discounted)) => discounted,
                    _ => self.base_fare,
                };
                if distance_km > FLAT_FARE_DOUBLING_KM {
                    ticket * 2.0
                } else {
                    ticket
                }
            }
        };
        round_fare(fare)
    }

    fn metered_fare(&self, distance_km: f64) -> f64 {
        let mut remaining = (distance_km - self.base_distance_km).max(0.0);
        let first = remaining.min(FIRST_TIER_KM);
        remaining -= first;
        let second = remaining.min(SECOND_TIER_KM);
        remaining -= second;

        self.base_fare
            + first * self.per_km_first
            + second * self.per_km_second
            + remaining * self.per_km_rest
    }
}

fn round_fare(fare: f64) -> u64 {
    ((fare / ROUNDING_VND).round() * ROUNDING_VND) as u64
}

/// Estimated road distance for a great-circle distance.
pub fn estimated_road_km(great_circle_km: f64) -> f64 {
    great_circle_km * ROAD_DISTANCE_FACTOR
}

/// Format an amount as `12,000 VND`.
pub fn format_vnd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{grouped} VND")
}

/// Price of one option for a leg or a whole trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FareQuote {
    pub option: String,
    pub name: String,
    pub cost_vnd: u64,
}

/// Per-leg quotes in catalog order and per-option trip totals, cheapest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripFares {
    pub legs: Vec<Vec<FareQuote>>,
    pub totals: Vec<FareQuote>,
}

static BUILTIN_FARES: Lazy<Vec<FareOption>> = Lazy::new(|| {
    vec![
        FareOption::metered("grab_bike", "GrabBike", 13_500.0, 2.0, [4_300.0; 3]),
        FareOption::metered("be_bike", "BeBike", 12_500.0, 2.0, [4_100.0; 3]),
        FareOption::metered("xanh_bike", "XanhSM Bike", 13_000.0, 2.0, [4_200.0; 3]),
        FareOption::metered(
            "grab_car",
            "GrabCar",
            29_000.0,
            2.0,
            [10_500.0, 12_500.0, 11_000.0],
        ),
        FareOption::metered(
            "be_car",
            "BeCar",
            27_000.0,
            2.0,
            [10_000.0, 12_000.0, 11_000.0],
        ),
        FareOption::metered(
            "xanh_car",
            "XanhSM Taxi",
            28_000.0,
            2.0,
            [10_000.0, 12_000.0, 11_000.0],
        ),
        FareOption::flat("bus", "Xe Buýt", 7_000.0, Some(3_000.0)),
    ]
});

/// Ordered collection of fare options keyed by case-insensitive id.
#[derive(Debug, Clone, Default)]
pub struct FareCatalog {
    options: Vec<FareOption>,
    by_id: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl FareCatalog {
    /// Bike, car, and bus options for Ho Chi Minh City.
    pub fn builtin() -> Self {
        let options = BUILTIN_FARES.clone();
        let by_id = options
            .iter()
            .enumerate()
            .map(|(index, option)| (normalize_id(&option.id), index))
            .collect();
        Self {
            options,
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
            options = catalog.len(),
            "loaded fare catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from CSV with `id,display_name,kind,base_fare,
    /// base_distance_km,per_km_first,per_km_second,per_km_rest,student_fare`
    /// headers. `student_fare` may be left empty.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut catalog = Self::default();

        // Header is line 1.
        for (offset, result) in csv_reader.deserialize::<FareOption>().enumerate() {
            let row = offset + 2;
            let option = result.map_err(|err| Error::FareDataValidation {
                message: format!("row {row}: {err}"),
            })?;
            option.validate().map_err(|err| Error::FareDataValidation {
                message: format!("row {row}: {err}"),
            })?;
            catalog.insert(option)?;
        }

        Ok(catalog)
    }

    /// Add an option, rejecting invalid amounts and duplicate ids.
    pub fn insert(&mut self, option: FareOption) -> Result<()> {
        option.validate()?;
        let key = normalize_id(&option.id);
        if self.by_id.contains_key(&key) {
            return Err(Error::DuplicateFareOption { name: option.id });
        }
        self.by_id.insert(key, self.options.len());
        self.options.push(option);
        Ok(())
    }

    /// Lookup an option by id, ignoring case.
    pub fn get(&self, id: &str) -> Option<&FareOption> {
        self.by_id
            .get(&normalize_id(id))
            .map(|&index| &self.options[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FareOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// File this catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Quote every option for one leg, in catalog order.
    pub fn quote_all(&self, distance_km: f64, student: bool) -> Vec<FareQuote> {
        self.options
            .iter()
            .map(|option| FareQuote {
                option: option.id.clone(),
                name: option.display_name.clone(),
                cost_vnd: option.quote(distance_km, student),
            })
            .collect()
    }

    /// Quote each leg and sum per option.
    ///
    /// Totals are sorted cheapest first; options with equal totals keep
    /// catalog order.
    pub fn price_legs(&self, leg_distances_km: &[f64], student: bool) -> TripFares {
        let legs: Vec<Vec<FareQuote>> = leg_distances_km
            .iter()
            .map(|&distance_km| self.quote_all(distance_km, student))
            .collect();

        let mut totals: Vec<FareQuote> = self
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| FareQuote {
                option: option.id.clone(),
                name: option.display_name.clone(),
                cost_vnd: legs.iter().map(|quotes| quotes[index].cost_vnd).sum(),
            })
            .collect();
        totals.sort_by_key(|quote| quote.cost_vnd);

        TripFares { legs, totals }
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepped() -> FareOption {
        FareOption::metered("cab", "Cab", 10_000.0, 2.0, [1_000.0, 2_000.0, 3_000.0])
    }

    fn bus() -> FareOption {
        FareOption::flat("bus", "Bus", 7_000.0, Some(3_000.0))
    }

    #[test]
    fn base_fare_covers_the_first_two_km() {
        assert_eq!(stepped().quote(0.0, false), 10_000);
        assert_eq!(stepped().quote(1.5, false), 10_000);
        assert_eq!(stepped().quote(2.0, false), 10_000);
    }

    #[test]
    fn tiers_switch_at_twelve_and_twenty_five_km() {
        let cab = stepped();
        assert_eq!(cab.quote(12.0, false), 20_000);
        assert_eq!(cab.quote(13.0, false), 22_000);
        assert_eq!(cab.quote(25.0, false), 46_000);
        assert_eq!(cab.quote(26.0, false), 49_000);
        assert_eq!(cab.quote(30.0, false), 61_000);
    }

    #[test]
    fn quotes_round_to_nearest_thousand() {
        assert_eq!(stepped().quote(2.4, false), 10_000);
        assert_eq!(stepped().quote(2.6, false), 11_000);
    }

    #[test]
    fn students_pay_the_discounted_bus_fare() {
        assert_eq!(bus().quote(5.0, false), 7_000);
        assert_eq!(bus().quote(5.0, true), 3_000);
        assert_eq!(stepped().quote(5.0, true), stepped().quote(5.0, false));
    }

    #[test]
    fn bus_fare_doubles_past_fifteen_km() {
        assert_eq!(bus().quote(15.0, false), 7_000);
        assert_eq!(bus().quote(15.1, false), 14_000);
        assert_eq!(bus().quote(15.1, true), 6_000);
    }

    #[test]
    fn trip_totals_sum_legs_cheapest_first() {
        let mut catalog = FareCatalog::default();
        catalog.insert(stepped()).unwrap();
        catalog.insert(bus()).unwrap();

        let fares = catalog.price_legs(&[12.0, 2.0], false);
        assert_eq!(fares.legs.len(), 2);
        assert_eq!(fares.legs[0][0].cost_vnd, 20_000);
        assert_eq!(fares.legs[1][0].cost_vnd, 10_000);

        let totals: Vec<_> = fares
            .totals
            .iter()
            .map(|quote| (quote.option.as_str(), quote.cost_vnd))
            .collect();
        assert_eq!(totals, vec![("bus", 14_000), ("cab", 30_000)]);
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = FareCatalog::builtin();
        assert_eq!(catalog.len(), 7);
        for option in catalog.iter() {
            option.validate().unwrap();
        }
        assert_eq!(catalog.get("BUS").unwrap().kind, FareKind::Flat);
        assert_eq!(catalog.get("grab_bike").unwrap().quote(2.0, false), 14_000);
    }

    #[test]
    fn csv_catalog_loads_with_optional_student_fare() {
        let csv = "id,display_name,kind,base_fare,base_distance_km,per_km_first,per_km_second,per_km_rest,student_fare\n\
                   moto,Moto,metered,12000,2,4000,4000,4000,\n\
                   bus,Bus,flat,6000,0,0,0,0,2000\n";
        let catalog = FareCatalog::from_reader(csv.as_bytes()).unwrap();
        let ids: Vec<_> = catalog.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["moto", "bus"]);
        assert_eq!(catalog.get("moto").unwrap().student_fare, None);
        assert_eq!(catalog.get("bus").unwrap().quote(1.0, true), 2_000);
    }

    #[test]
    fn csv_rejects_negative_rate_with_row_number() {
        let csv = "id,display_name,kind,base_fare,base_distance_km,per_km_first,per_km_second,per_km_rest,student_fare\n\
                   ok,Ok,metered,1000,2,1,1,1,\n\
                   bad,Bad,metered,1000,2,-5,1,1,\n";
        match FareCatalog::from_reader(csv.as_bytes()).unwrap_err() {
            Error::FareDataValidation { message } => assert!(message.starts_with("row 3")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_option_ids_are_rejected() {
        let mut catalog = FareCatalog::default();
        catalog.insert(bus()).unwrap();
        assert!(matches!(
            catalog.insert(FareOption::flat("BUS", "Other", 1.0, None)),
            Err(Error::DuplicateFareOption { .. })
        ));
    }

    #[test]
    fn vnd_amounts_group_thousands() {
        assert_eq!(format_vnd(0), "0 VND");
        assert_eq!(format_vnd(7_000), "7,000 VND");
        assert_eq!(format_vnd(1_234_000), "1,234,000 VND");
    }
}
