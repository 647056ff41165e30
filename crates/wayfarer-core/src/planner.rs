//! Search and itinerary session.
//!
//! A session moves through `Idle -> Searching -> { ResultsShown | ErrorShown }`;
//! a new validated submission re-enters `Searching` from either terminal
//! phase. Searches are serialized through `&mut self`, so two submissions can
//! never be in flight at once and the phase always reflects the most recently
//! issued search.

use std::sync::Arc;
use std::time::{Duration, Instant};

use time::OffsetDateTime;

use crate::catalog::{self, CategoryFilter, FilterCriteria, SortField, SortOrder};
use crate::models::{
    CoreError, CoreErrorKind, Destination, DestinationId, Itinerary, ItineraryItem,
};
use crate::sources::{DestinationSource, SearchQuery};
use crate::storage::StorageManager;
use crate::validate;

/// How long a transient banner stays visible before it self-clears.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Searching,
    ResultsShown,
    ErrorShown,
}

#[derive(Clone, Debug)]
struct Banner {
    text: String,
    raised_at: Instant,
}

pub struct PlannerSession {
    storage: Arc<StorageManager>,
    source: Arc<dyn DestinationSource>,
    phase: Phase,
    results: Vec<Destination>,
    visible: Vec<Destination>,
    location: Option<String>,
    itinerary_draft: Vec<ItineraryItem>,
    banner: Option<Banner>,
    banner_ttl: Duration,
}

impl PlannerSession {
    pub fn new(storage: Arc<StorageManager>, source: Arc<dyn DestinationSource>) -> Self {
        Self {
            storage,
            source,
            phase: Phase::Idle,
            results: Vec::new(),
            visible: Vec::new(),
            location: None,
            itinerary_draft: Vec::new(),
            banner: None,
            banner_ttl: BANNER_TTL,
        }
    }

    pub fn with_banner_ttl(mut self, ttl: Duration) -> Self {
        self.banner_ttl = ttl;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The last successful result set, before any filter is applied.
    pub fn results(&self) -> &[Destination] {
        &self.results
    }

    /// The result set as the user currently sees it, filters and sort applied.
    pub fn visible_results(&self) -> &[Destination] {
        &self.visible
    }

    /// The transient banner text, or None once it has aged out.
    pub fn banner(&self) -> Option<&str> {
        let banner = self.banner.as_ref()?;
        if banner.raised_at.elapsed() > self.banner_ttl {
            return None;
        }
        Some(&banner.text)
    }

    fn raise_banner(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner {
            text: text.into(),
            raised_at: Instant::now(),
        });
    }

    /// Runs a search for `input`. Invalid input is reported without leaving
    /// the current phase; a fetch failure lands in `ErrorShown` with a
    /// transient banner and leaves prior results and favorites untouched.
    pub async fn search(&mut self, input: &str) -> Result<&[Destination], CoreError> {
        if let Err(reason) = validate::validate_destination_input(input) {
            return Err(CoreError::invalid_input(reason.to_string()));
        }

        let query_text = input.trim().to_owned();
        self.phase = Phase::Searching;
        self.storage.add_search_query(&query_text);

        let source = Arc::clone(&self.source);
        let query = SearchQuery {
            text: query_text.clone(),
            issued_at: OffsetDateTime::now_utc(),
        };
        let fetched = tokio::task::spawn_blocking(move || source.search(&query))
            .await
            .map_err(|error| CoreError::fetch(format!("search task failed: {error}")));

        let records = match fetched.and_then(|result| result) {
            Ok(records) => validate::retain_valid(records),
            Err(error) => {
                tracing::warn!(query = %query_text, %error, "search fetch failed");
                self.phase = Phase::ErrorShown;
                self.raise_banner(format!("Could not load destinations: {}", error.message));
                return Err(error);
            }
        };

        self.storage
            .update_search_result_count(&query_text, records.len() as u64);

        // Zero results is still a successful search, rendered as an empty
        // state rather than an error.
        self.results = records;
        self.visible = self.results.clone();
        self.location = Some(query_text);
        self.phase = Phase::ResultsShown;
        self.banner = None;
        Ok(&self.results)
    }

    /// Filters the retained result set without re-fetching. Legal only while
    /// results are shown.
    pub fn apply_filter(
        &mut self,
        category: &CategoryFilter,
        criteria: &FilterCriteria,
    ) -> Result<&[Destination], CoreError> {
        self.require_results("filter")?;
        self.visible = catalog::filter_destinations(&self.results, category, criteria);
        Ok(&self.visible)
    }

    /// Sorts the currently visible results. Legal only while results are
    /// shown.
    pub fn apply_sort(
        &mut self,
        field: SortField,
        order: SortOrder,
    ) -> Result<&[Destination], CoreError> {
        self.require_results("sort")?;
        self.visible = catalog::sort_destinations(&self.visible, field, order);
        Ok(&self.visible)
    }

    fn require_results(&self, action: &str) -> Result<(), CoreError> {
        if self.phase != Phase::ResultsShown {
            return Err(CoreError::new(
                CoreErrorKind::InvalidTransition,
                format!("cannot {action} outside of shown results"),
            ));
        }
        Ok(())
    }

    // ---- itinerary ----

    pub fn itinerary_items(&self) -> &[ItineraryItem] {
        &self.itinerary_draft
    }

    /// Adds a destination from the current results to the in-progress
    /// itinerary. A second add of the same id is rejected with a notice.
    pub fn add_to_itinerary(&mut self, id: &DestinationId) -> Result<(), CoreError> {
        let Some(record) = self.results.iter().find(|record| &record.id == id) else {
            return Err(CoreError::not_found(format!(
                "destination '{id}' is not in the current results"
            )));
        };

        if self.itinerary_draft.iter().any(|item| &item.id == id) {
            let name = record.name.clone();
            self.raise_banner(format!("\"{name}\" is already in your itinerary"));
            return Err(CoreError::invalid_input(format!(
                "destination '{id}' is already in the itinerary"
            )));
        }

        self.itinerary_draft.push(ItineraryItem {
            id: record.id.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            price_tier: record.price_tier,
        });
        Ok(())
    }

    pub fn remove_from_itinerary(&mut self, index: usize) -> Result<ItineraryItem, CoreError> {
        if index >= self.itinerary_draft.len() {
            return Err(CoreError::not_found(format!(
                "no itinerary item at position {index}"
            )));
        }
        Ok(self.itinerary_draft.remove(index))
    }

    /// Snapshots the in-progress list into a persisted itinerary record and
    /// resets the list. Rejects an empty draft.
    pub fn create_itinerary(&mut self) -> Result<Itinerary, CoreError> {
        if self.itinerary_draft.is_empty() {
            return Err(CoreError::invalid_input(
                "add at least one place before creating an itinerary",
            ));
        }
        let Some(location) = self.location.clone() else {
            return Err(CoreError::invalid_input(
                "search for a destination before creating an itinerary",
            ));
        };

        let created_at = OffsetDateTime::now_utc();
        let items = std::mem::take(&mut self.itinerary_draft);
        let itinerary = Itinerary {
            id: (created_at.unix_timestamp_nanos() / 1_000_000) as u64,
            location,
            estimated_days: items.len() as u32,
            items,
            created_at,
        };

        if !self.storage.save_itinerary(itinerary.clone()) {
            self.itinerary_draft = itinerary.items.clone();
            return Err(CoreError::storage("failed to persist itinerary"));
        }
        Ok(itinerary)
    }
}
