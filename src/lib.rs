#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Headless app core for PlacePicker: a fixed catalog of places sorted by
//! proximity to the user, a personal picked list, and removal guarded by an
//! auto-confirming countdown dialog.
//!
//! The core is platform independent. Shells drive it by feeding [`Event`]s
//! and executing capability requests (geolocation, timers, durable storage,
//! modal presentation); all state lives in [`Model`] and is mutated only in
//! [`App::update`].

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod event;
pub mod model;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use catalog::Catalog;
pub use event::Event;
pub use model::{LocationState, Model, RemovalDialog, ViewModel};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Total grace period before a pending removal auto-confirms.
pub const REMOVAL_TIMEOUT_MS: u64 = 3000;
/// Interval at which the countdown display updates.
pub const REMOVAL_TICK_MS: u64 = 10;

/// Durable storage key holding the JSON-encoded list of selected place ids.
pub const SELECTED_PLACES_KEY: &str = "selected_places";

pub const PICKED_TITLE: &str = "I'd like to visit ...";
pub const PICKED_FALLBACK: &str = "Select the places you would like to visit below.";
pub const AVAILABLE_TITLE: &str = "Available Places";
pub const AVAILABLE_FALLBACK: &str = "Awaiting location...";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(pub String);

impl PlaceId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable catalog record. Coordinates are stored raw; validation happens
/// at the point of use so a malformed entry degrades instead of poisoning
/// the whole catalog.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
}

/// A catalog place decorated with its computed distance from the sort origin.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SortedPlace {
    pub place: Place,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidatedCoordinate {
    lat: f64,
    lon: f64,
}

impl ValidatedCoordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lon(self) -> f64 {
        self.lon
    }
}

impl PartialEq for ValidatedCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lon.to_bits() == other.lon.to_bits()
    }
}

impl Eq for ValidatedCoordinate {}

impl TryFrom<(f64, f64)> for ValidatedCoordinate {
    type Error = CoordinateError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lon)
    }
}

/// Great-circle distance in meters. Inputs are validated coordinates, so the
/// result is always finite and non-negative.
#[must_use]
pub fn haversine_distance(p1: ValidatedCoordinate, p2: ValidatedCoordinate) -> f64 {
    const EPSILON: f64 = 1e-10;

    if (p1.lat - p2.lat).abs() < EPSILON && (p1.lon - p2.lon).abs() < EPSILON {
        return 0.0;
    }

    let lat1_rad = p1.lat.to_radians();
    let lat2_rad = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lon = (p2.lon - p1.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().asin();

    let result = EARTH_RADIUS_M * c;

    if result.is_finite() {
        result
    } else {
        f64::MAX
    }
}

/// Returns the catalog ordered nearest-first from `origin`. The output is a
/// permutation of the input: entries with invalid (non-finite or out-of-range)
/// coordinates get distance `f64::MAX` and sort to the end, keeping their
/// input order among themselves. The comparator never panics.
#[must_use]
pub fn sort_places_by_distance(places: &[Place], origin: ValidatedCoordinate) -> Vec<SortedPlace> {
    let mut sorted: Vec<SortedPlace> = places
        .iter()
        .map(|place| {
            let distance_m = ValidatedCoordinate::new(place.lat, place.lon)
                .map(|coord| haversine_distance(origin, coord))
                .unwrap_or(f64::MAX);
            SortedPlace {
                place: place.clone(),
                distance_m,
            }
        })
        .collect();

    sorted.sort_by(|a, b| {
        a.distance_m
            .partial_cmp(&b.distance_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    sorted
}

#[must_use]
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters < 0.0 {
        return "Unknown".to_string();
    }

    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else if meters < 10_000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{:.0} km", meters / 1000.0)
    }
}
