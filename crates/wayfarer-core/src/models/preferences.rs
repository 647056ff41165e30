use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
}

impl DistanceUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kilometers => "km",
            Self::Miles => "mi",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "km" => Ok(Self::Kilometers),
            "mi" => Ok(Self::Miles),
            _ => Err(()),
        }
    }
}

/// Thresholds applied to fresh result sets before the user touches the filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub min_rating: f64,
    pub max_price: Option<f64>,
    pub categories: Vec<String>,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            min_rating: 0.0,
            max_price: None,
            categories: Vec::new(),
        }
    }
}

/// User-tunable settings. Every field has a documented default, so a missing
/// or partial document always materializes into a complete value. Keys this
/// version does not know about are kept in `extra` and survive round-trips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub currency: String,
    pub language: String,
    pub distance_unit: DistanceUnit,
    pub default_filters: FilterDefaults,
    pub notifications: bool,
    pub auto_save_trips: bool,
    pub results_per_page: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            currency: "USD".to_owned(),
            language: "en".to_owned(),
            distance_unit: DistanceUnit::Kilometers,
            default_filters: FilterDefaults::default(),
            notifications: true,
            auto_save_trips: true,
            results_per_page: 12,
            extra: Map::new(),
        }
    }
}
