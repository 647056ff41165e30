//! Input and record validation.
//!
//! User-input checks return a typed [`InputError`] whose display text is the
//! message shown inline next to the offending field. Record-shape checks run
//! once at the data-source boundary: records that fail are dropped and
//! logged, never surfaced to the user.

use serde_json::Value;
use thiserror::Error;
use time::Date;
use time::macros::format_description;

use crate::models::Destination;

pub const MAX_BUDGET: f64 = 1_000_000.0;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum InputError {
    #[error("please enter a destination name")]
    EmptyDestination,
    #[error("destination must be at least 2 characters")]
    DestinationTooShort,
    #[error("destination can only contain letters, spaces, hyphens, and apostrophes")]
    DestinationCharset,
    #[error("please select a travel date")]
    MissingDate,
    #[error("travel date must use the YYYY-MM-DD format")]
    MalformedDate,
    #[error("travel date cannot be in the past")]
    DateInPast,
    #[error("please enter a valid budget amount")]
    BudgetNotPositive,
    #[error("budget amount is too high")]
    BudgetTooHigh,
    #[error("destination record is missing required fields")]
    IncompleteRecord,
    #[error("rating must be between 0 and 5")]
    RatingOutOfRange,
}

pub fn validate_destination_input(input: &str) -> Result<(), InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyDestination);
    }
    if trimmed.chars().count() < 2 {
        return Err(InputError::DestinationTooShort);
    }
    let allowed = |c: char| c.is_alphabetic() || c.is_whitespace() || c == '-' || c == '\'';
    if !input.chars().all(allowed) {
        return Err(InputError::DestinationCharset);
    }
    Ok(())
}

pub fn validate_budget(amount: f64) -> Result<(), InputError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(InputError::BudgetNotPositive);
    }
    if amount > MAX_BUDGET {
        return Err(InputError::BudgetTooHigh);
    }
    Ok(())
}

/// Time-of-day is deliberately ignored: a trip booked for today is valid
/// however late in the day it is submitted.
pub fn validate_travel_date(value: Option<&str>, today: Date) -> Result<(), InputError> {
    let Some(raw) = value else {
        return Err(InputError::MissingDate);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingDate);
    }
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(trimmed, &format).map_err(|_| InputError::MalformedDate)?;
    if date < today {
        return Err(InputError::DateInPast);
    }
    Ok(())
}

pub fn validate_rating(rating: f64) -> bool {
    (0.0..=5.0).contains(&rating)
}

/// Semantic checks on an already well-typed record. Used by the favorites
/// store before persisting and by the boundary filters below.
pub fn validate_destination(record: &Destination) -> Result<(), InputError> {
    let blank = |text: &str| text.trim().is_empty();
    if blank(&record.name)
        || blank(&record.location)
        || blank(&record.description)
        || blank(&record.address)
    {
        return Err(InputError::IncompleteRecord);
    }
    if !validate_rating(record.rating) {
        return Err(InputError::RatingOutOfRange);
    }
    Ok(())
}

/// Deserialize a raw JSON payload from a data source into destination
/// records, dropping anything malformed. A non-array payload yields nothing.
pub fn parse_destination_records(payload: &Value) -> Vec<Destination> {
    let Some(items) = payload.as_array() else {
        tracing::warn!("destination payload is not an array; dropping it");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let record = match serde_json::from_value::<Destination>(item.clone()) {
                Ok(record) => record,
                Err(error) => {
                    tracing::warn!(%error, "dropping destination record with missing or mistyped fields");
                    return None;
                }
            };
            match validate_destination(&record) {
                Ok(()) => Some(record),
                Err(reason) => {
                    tracing::warn!(id = %record.id, %reason, "dropping invalid destination record");
                    None
                }
            }
        })
        .collect()
}

/// Keep only records that pass semantic validation, logging the rest.
pub fn retain_valid(records: Vec<Destination>) -> Vec<Destination> {
    records
        .into_iter()
        .filter(|record| match validate_destination(record) {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(id = %record.id, %reason, "dropping invalid destination record");
                false
            }
        })
        .collect()
}
