//! Pure filter and sort transformations over destination result sets.
//!
//! Nothing in this module mutates its input or touches storage; callers get a
//! fresh `Vec` with the input's relative order preserved wherever the
//! comparison considers two records equal.

use std::cmp::Ordering;

use crate::models::{Category, Destination, PriceTier};

/// Category dimension of a filter. `All` leaves the result set untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CategoryFilter {
    All,
    Category(Category),
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Category(Category::from(value))
        }
    }
}

/// Optional criteria AND-ed onto the category filter. Each is applied only
/// when present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    pub min_rating: Option<f64>,
    pub location: Option<String>,
    pub price_tier: Option<PriceTier>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortField {
    Name,
    Category,
    Location,
    Rating,
    Reviews,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

pub fn filter_destinations(
    records: &[Destination],
    category: &CategoryFilter,
    criteria: &FilterCriteria,
) -> Vec<Destination> {
    records
        .iter()
        .filter(|record| matches_category(record, category))
        .filter(|record| {
            criteria
                .min_rating
                .is_none_or(|threshold| record.rating >= threshold)
        })
        .filter(|record| {
            criteria.location.as_deref().is_none_or(|needle| {
                let needle = needle.to_lowercase();
                record.location.to_lowercase().contains(&needle)
                    || record.name.to_lowercase().contains(&needle)
            })
        })
        .filter(|record| {
            criteria
                .price_tier
                .is_none_or(|tier| record.price_tier == Some(tier))
        })
        .cloned()
        .collect()
}

fn matches_category(record: &Destination, filter: &CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Category(category) => record.category.matches(category),
    }
}

/// Stable sort: records the comparator considers equal keep their relative
/// order from the input. String fields compare case-insensitively.
pub fn sort_destinations(
    records: &[Destination],
    field: SortField,
    order: SortOrder,
) -> Vec<Destination> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, field);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    sorted
}

fn compare_by_field(a: &Destination, b: &Destination, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::Category => compare_text(a.category.as_str(), b.category.as_str()),
        SortField::Location => compare_text(&a.location, &b.location),
        SortField::Rating => a.rating.total_cmp(&b.rating),
        SortField::Reviews => a.reviews.cmp(&b.reviews),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
