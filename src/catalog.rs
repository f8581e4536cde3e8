//! The static place catalog: the read-only source of truth loaded once at
//! startup and never mutated. Entry order is the stable tie-break order used
//! by the distance sort.

use crate::{Place, PlaceId};

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    places: Vec<Place>,
}

impl Catalog {
    #[must_use]
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// The fixed catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_places())
    }

    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    #[must_use]
    pub fn get(&self, id: &PlaceId) -> Option<&Place> {
        self.places.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &PlaceId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn entry(id: &str, name: &str, image: &str, description: &str, lat: f64, lon: f64) -> Place {
    Place {
        id: PlaceId::new(id),
        name: name.to_string(),
        image: image.to_string(),
        description: description.to_string(),
        lat,
        lon,
    }
}

fn builtin_places() -> Vec<Place> {
    vec![
        entry(
            "p1",
            "Forest Waterfall",
            "forest-waterfall.jpg",
            "A tranquil waterfall hidden deep within a lush forest.",
            44.8654,
            15.5820,
        ),
        entry(
            "p2",
            "Sahara Desert Dunes",
            "desert-dunes.jpg",
            "Golden dunes stretching to the horizon under a vast sky.",
            25.0657,
            10.6120,
        ),
        entry(
            "p3",
            "Majestic Mountains",
            "majestic-mountains.jpg",
            "Snow-capped peaks towering above alpine meadows.",
            46.5586,
            8.5610,
        ),
        entry(
            "p4",
            "Caribbean Beach",
            "caribbean-beach.jpg",
            "White sand, turquoise water and palm trees swaying in the breeze.",
            18.2208,
            -66.5901,
        ),
        entry(
            "p5",
            "Ancient Temple",
            "ancient-temple.jpg",
            "Stone ruins of a sprawling temple complex reclaimed by the jungle.",
            13.4125,
            103.8670,
        ),
        entry(
            "p6",
            "Grand City Library",
            "city-library.jpg",
            "A historic reading room lined with endless shelves of books.",
            40.7532,
            -73.9822,
        ),
        entry(
            "p7",
            "Northern Lights Sky",
            "northern-lights.jpg",
            "Curtains of green aurora dancing over a frozen lake.",
            68.3497,
            18.8314,
        ),
        entry(
            "p8",
            "Highland Castle",
            "highland-castle.jpg",
            "A weathered castle overlooking mist-covered lochs.",
            57.3229,
            -4.4244,
        ),
        entry(
            "p9",
            "Roman Ruins",
            "roman-ruins.jpg",
            "Columns and arches from an empire two thousand years gone.",
            41.8902,
            12.4922,
        ),
        entry(
            "p10",
            "Japanese Garden",
            "japanese-garden.jpg",
            "Raked gravel, maple trees and a quiet koi pond.",
            35.0116,
            135.7681,
        ),
        entry(
            "p11",
            "Icelandic Waterfall",
            "icelandic-waterfall.jpg",
            "A thundering cascade framed by black volcanic rock.",
            63.6214,
            -19.9855,
        ),
        entry(
            "p12",
            "Amazon Riverboat",
            "amazon-riverboat.jpg",
            "Drifting past rainforest canopy alive with birdsong.",
            -3.4653,
            -62.2159,
        ),
    ]
}
