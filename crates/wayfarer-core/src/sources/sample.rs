//! Deterministic stand-in for a real destination search API.
//!
//! Every query yields the same eight records, named after the query and
//! spanning every category, so sessions and tests behave reproducibly.
//! Coordinates are offset from the city anchor table in [`crate::geo`].

use crate::geo;
use crate::models::{Category, Coordinates, CoreError, Destination, DestinationId, PriceTier};
use crate::sources::{DestinationSource, SearchQuery};

#[derive(Clone, Copy, Debug, Default)]
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl DestinationSource for SampleCatalog {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Destination>, CoreError> {
        Ok(sample_destinations(query.text.trim()))
    }
}

struct SampleSeed {
    name_suffix: &'static str,
    standalone_name: Option<&'static str>,
    category: Category,
    rating: f64,
    reviews: u64,
    description: &'static str,
    price_tier: PriceTier,
    opening_hours: Option<&'static str>,
    offset: (f64, f64),
}

const SEEDS: [SampleSeed; 8] = [
    SampleSeed {
        name_suffix: "National Museum",
        standalone_name: None,
        category: Category::Museum,
        rating: 4.6,
        reviews: 324,
        description: "Explore the rich history and culture of the region with interactive exhibits.",
        price_tier: PriceTier::Moderate,
        opening_hours: Some("9:00 AM - 5:00 PM"),
        offset: (0.01, 0.01),
    },
    SampleSeed {
        name_suffix: "Central Park",
        standalone_name: None,
        category: Category::Park,
        rating: 4.8,
        reviews: 892,
        description: "Beautiful urban park perfect for walking, picnicking, and outdoor activities.",
        price_tier: PriceTier::Budget,
        opening_hours: Some("6:00 AM - 10:00 PM"),
        offset: (-0.01, 0.01),
    },
    SampleSeed {
        name_suffix: "Historic District",
        standalone_name: None,
        category: Category::Attraction,
        rating: 4.5,
        reviews: 567,
        description: "Charming old town area with cobblestone streets and historic buildings.",
        price_tier: PriceTier::Budget,
        opening_hours: None,
        offset: (0.0, 0.015),
    },
    SampleSeed {
        name_suffix: "",
        standalone_name: Some("Local Cuisine Restaurant"),
        category: Category::Restaurant,
        rating: 4.7,
        reviews: 445,
        description: "Best traditional dishes and authentic local flavors.",
        price_tier: PriceTier::Moderate,
        opening_hours: Some("11:00 AM - 11:00 PM"),
        offset: (-0.005, -0.01),
    },
    SampleSeed {
        name_suffix: "Grand Hotel",
        standalone_name: None,
        category: Category::Hotel,
        rating: 4.9,
        reviews: 612,
        description: "5-star luxury hotel with modern amenities and stunning views.",
        price_tier: PriceTier::Premium,
        opening_hours: None,
        offset: (0.005, -0.01),
    },
    SampleSeed {
        name_suffix: "Boutique Inn",
        standalone_name: None,
        category: Category::Hotel,
        rating: 4.4,
        reviews: 289,
        description: "Cozy boutique hotel with personalized service and charm.",
        price_tier: PriceTier::Moderate,
        opening_hours: None,
        offset: (0.008, 0.004),
    },
    SampleSeed {
        name_suffix: "",
        standalone_name: Some("Art Gallery & Exhibition"),
        category: Category::Museum,
        rating: 4.3,
        reviews: 198,
        description: "Contemporary and classical art collections from local and international artists.",
        price_tier: PriceTier::Budget,
        opening_hours: Some("10:00 AM - 6:00 PM"),
        offset: (-0.012, -0.003),
    },
    SampleSeed {
        name_suffix: "Farmers Market",
        standalone_name: None,
        category: Category::Attraction,
        rating: 4.6,
        reviews: 534,
        description: "Fresh produce, local crafts, and street food from vendors.",
        price_tier: PriceTier::Budget,
        opening_hours: Some("8:00 AM - 2:00 PM"),
        offset: (0.002, 0.012),
    },
];

pub fn sample_destinations(location: &str) -> Vec<Destination> {
    let anchor = geo::city_anchor(location).unwrap_or(geo::DEFAULT_ANCHOR);

    SEEDS
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            let number = index as u64 + 1;
            let name = match seed.standalone_name {
                Some(name) => name.to_owned(),
                None => format!("{location} {}", seed.name_suffix),
            };
            Destination {
                id: DestinationId::Number(number),
                name,
                category: seed.category.clone(),
                location: location.to_owned(),
                rating: seed.rating,
                reviews: seed.reviews,
                description: seed.description.to_owned(),
                address: format!("{number} Main Street, {location}"),
                price_tier: Some(seed.price_tier),
                opening_hours: seed.opening_hours.map(str::to_owned),
                coordinates: Some(Coordinates {
                    lat: anchor.lat + seed.offset.0,
                    lng: anchor.lng + seed.offset.1,
                }),
            }
        })
        .collect()
}
