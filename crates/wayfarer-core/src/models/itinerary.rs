use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{Category, DestinationId, PriceTier};

/// A destination reference carried inside an itinerary. Only the fields the
/// trip plan needs are snapshotted; the full record stays in the result set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub id: DestinationId,
    pub name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_tier: Option<PriceTier>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Unix milliseconds of the creation instant, unique enough for a
    /// single-user document.
    pub id: u64,
    pub location: String,
    pub items: Vec<ItineraryItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub estimated_days: u32,
}
