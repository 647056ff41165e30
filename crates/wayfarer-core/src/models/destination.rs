use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier as it arrives from data sources: some return integers,
/// some return opaque strings. Unique within a result set, not globally.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DestinationId {
    Number(u64),
    Text(String),
}

impl Display for DestinationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for DestinationId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DestinationId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    Attraction,
    Hotel,
    Restaurant,
    Museum,
    Park,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Attraction => "attraction",
            Self::Hotel => "hotel",
            Self::Restaurant => "restaurant",
            Self::Museum => "museum",
            Self::Park => "park",
            Self::Other(name) => name,
        }
    }

    pub fn matches(&self, other: &Category) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "attraction" => Self::Attraction,
            "hotel" => Self::Hotel,
            "restaurant" => Self::Restaurant,
            "museum" => Self::Museum,
            "park" => Self::Park,
            _ => Self::Other(value.to_owned()),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::from(raw.as_str()))
    }
}

/// Price tiers keep the dollar-sign form sources and documents use on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Premium,
}

impl PriceTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Premium => "$$$",
        }
    }
}

impl FromStr for PriceTier {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "$" => Ok(Self::Budget),
            "$$" => Ok(Self::Moderate),
            "$$$" => Ok(Self::Premium),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    pub category: Category,
    pub location: String,
    pub rating: f64,
    pub reviews: u64,
    pub description: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_tier: Option<PriceTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}
