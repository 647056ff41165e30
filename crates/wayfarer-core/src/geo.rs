//! Map overlay boundary.
//!
//! The core hands markers to an external map renderer and receives nothing
//! back. Records without coordinates are simply not representable as markers
//! and are skipped.

use crate::models::{Category, Coordinates, Destination, DistanceUnit};

/// New York, the anchor used when a searched location is not in the table.
pub const DEFAULT_ANCHOR: Coordinates = Coordinates {
    lat: 40.7128,
    lng: -74.0060,
};

const CITY_ANCHORS: [(&str, Coordinates); 8] = [
    ("new york", DEFAULT_ANCHOR),
    (
        "london",
        Coordinates {
            lat: 51.5074,
            lng: -0.1278,
        },
    ),
    (
        "paris",
        Coordinates {
            lat: 48.8566,
            lng: 2.3522,
        },
    ),
    (
        "tokyo",
        Coordinates {
            lat: 35.6762,
            lng: 139.6503,
        },
    ),
    (
        "sydney",
        Coordinates {
            lat: -33.8688,
            lng: 151.2093,
        },
    ),
    (
        "barcelona",
        Coordinates {
            lat: 41.3851,
            lng: 2.1734,
        },
    ),
    (
        "rome",
        Coordinates {
            lat: 41.9028,
            lng: 12.4964,
        },
    ),
    (
        "dubai",
        Coordinates {
            lat: 25.2048,
            lng: 55.2708,
        },
    ),
];

/// Anchor coordinates for well-known cities, matched case-insensitively.
pub fn city_anchor(query: &str) -> Option<Coordinates> {
    let needle = query.trim().to_lowercase();
    CITY_ANCHORS
        .iter()
        .find(|(city, _)| *city == needle)
        .map(|(_, anchor)| *anchor)
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapMarker {
    pub name: String,
    pub category: Category,
    pub position: Coordinates,
    pub description: String,
}

pub fn markers_for(records: &[Destination]) -> Vec<MapMarker> {
    records
        .iter()
        .filter_map(|record| {
            let position = record.coordinates?;
            Some(MapMarker {
                name: record.name.clone(),
                category: record.category.clone(),
                position,
                description: record.description.clone(),
            })
        })
        .collect()
}

/// A distance measured in kilometers, convertible to the unit the user's
/// preferences ask for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distance {
    kilometers: f64,
}

const KILOMETERS_PER_MILE: f64 = 1.609_344;

impl Distance {
    pub fn from_kilometers(kilometers: f64) -> Self {
        Self { kilometers }
    }

    pub fn in_unit(self, unit: DistanceUnit) -> f64 {
        match unit {
            DistanceUnit::Kilometers => self.kilometers,
            DistanceUnit::Miles => self.kilometers / KILOMETERS_PER_MILE,
        }
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance via the haversine formula.
pub fn distance_between(a: Coordinates, b: Coordinates) -> Distance {
    let lat_delta = (b.lat - a.lat).to_radians();
    let lng_delta = (b.lng - a.lng).to_radians();

    let half_chord = (lat_delta / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (lng_delta / 2.0).sin().powi(2);
    let angular_distance = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    Distance::from_kilometers(EARTH_RADIUS_KM * angular_distance)
}
