use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::Destination;

/// A destination the user saved, with its bookkeeping timestamps.
/// The destination fields are flattened so the persisted document reads
/// as "destination plus metadata" rather than a nested envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub destination: Destination,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited: Option<bool>,
}

/// Partial update applied to an existing favorite. Absent fields are left alone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FavoriteUpdate {
    pub notes: Option<String>,
    pub visited: Option<bool>,
}
