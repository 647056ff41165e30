use std::sync::Arc;
use std::time::Duration;

use wayfarer_core::catalog::{CategoryFilter, FilterCriteria, SortField, SortOrder};
use wayfarer_core::models::{Category, CoreError, CoreErrorKind, Destination, DestinationId};
use wayfarer_core::persistence::MemoryStore;
use wayfarer_core::planner::{Phase, PlannerSession};
use wayfarer_core::sources::{DestinationSource, SampleCatalog, SearchQuery};
use wayfarer_core::storage::{MAX_HISTORY, StorageManager};

fn session() -> (Arc<StorageManager>, PlannerSession) {
    let storage = Arc::new(StorageManager::new(Arc::new(MemoryStore::new())));
    let planner = PlannerSession::new(Arc::clone(&storage), Arc::new(SampleCatalog::new()));
    (storage, planner)
}

struct FailingSource;

impl DestinationSource for FailingSource {
    fn search(&self, _query: &SearchQuery) -> Result<Vec<Destination>, CoreError> {
        Err(CoreError::fetch("upstream timed out"))
    }
}

struct EmptySource;

impl DestinationSource for EmptySource {
    fn search(&self, _query: &SearchQuery) -> Result<Vec<Destination>, CoreError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn successful_search_shows_results_and_records_history() {
    let (storage, mut planner) = session();
    assert_eq!(planner.phase(), Phase::Idle);

    let results = planner.search("Lisbon").await.unwrap().to_vec();
    assert_eq!(planner.phase(), Phase::ResultsShown);
    assert_eq!(results.len(), 8);
    assert_eq!(planner.location(), Some("Lisbon"));

    let history = storage.search_history(MAX_HISTORY);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query, "Lisbon");
    assert_eq!(history[0].result_count, 8);
}

#[tokio::test]
async fn invalid_input_never_leaves_the_current_phase() {
    let (storage, mut planner) = session();

    let error = planner.search("Par1s").await.unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::InvalidInput);
    assert_eq!(planner.phase(), Phase::Idle);
    assert!(storage.search_history(MAX_HISTORY).is_empty());

    planner.search("Paris").await.unwrap();
    let error = planner.search("!!!").await.unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::InvalidInput);
    assert_eq!(planner.phase(), Phase::ResultsShown);
}

#[tokio::test]
async fn zero_results_is_an_empty_state_not_an_error() {
    let storage = Arc::new(StorageManager::new(Arc::new(MemoryStore::new())));
    let mut planner = PlannerSession::new(Arc::clone(&storage), Arc::new(EmptySource));

    let results = planner.search("Nowhere").await.unwrap();
    assert!(results.is_empty());
    assert_eq!(planner.phase(), Phase::ResultsShown);
    assert_eq!(storage.search_history(MAX_HISTORY)[0].result_count, 0);
}

#[tokio::test]
async fn fetch_failure_raises_a_transient_banner() {
    let storage = Arc::new(StorageManager::new(Arc::new(MemoryStore::new())));
    let mut planner = PlannerSession::new(Arc::clone(&storage), Arc::new(FailingSource))
        .with_banner_ttl(Duration::from_millis(40));

    let error = planner.search("Lisbon").await.unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::FetchFailure);
    assert_eq!(planner.phase(), Phase::ErrorShown);
    assert!(planner.banner().unwrap().contains("upstream timed out"));

    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(planner.banner(), None);
}

#[tokio::test]
async fn failed_search_preserves_prior_results_and_allows_retry() {
    let (_storage, mut planner) = session();
    planner.search("Lisbon").await.unwrap();
    let before = planner.results().to_vec();

    // Simulate the terminal error phase, then a user-initiated retry.
    let storage = Arc::new(StorageManager::new(Arc::new(MemoryStore::new())));
    let mut failing = PlannerSession::new(Arc::clone(&storage), Arc::new(FailingSource));
    failing.search("Lisbon").await.unwrap_err();
    assert_eq!(failing.phase(), Phase::ErrorShown);
    failing.search("Porto").await.unwrap_err();
    assert_eq!(failing.phase(), Phase::ErrorShown);

    assert_eq!(planner.results(), before);
}

#[tokio::test]
async fn filter_and_sort_are_gated_on_shown_results() {
    let (_storage, mut planner) = session();

    let error = planner
        .apply_filter(&CategoryFilter::All, &FilterCriteria::default())
        .unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::InvalidTransition);
    let error = planner
        .apply_sort(SortField::Rating, SortOrder::Descending)
        .unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::InvalidTransition);

    planner.search("Lisbon").await.unwrap();

    let hotels = planner
        .apply_filter(
            &CategoryFilter::Category(Category::Hotel),
            &FilterCriteria::default(),
        )
        .unwrap();
    assert!(hotels.iter().all(|r| r.category == Category::Hotel));
    assert_eq!(hotels.len(), 2);

    let sorted = planner
        .apply_sort(SortField::Rating, SortOrder::Descending)
        .unwrap()
        .to_vec();
    assert!(sorted[0].rating >= sorted[1].rating);

    // The unfiltered result set is retained for the next filter change.
    assert_eq!(planner.results().len(), 8);
    assert_eq!(planner.visible_results().len(), 2);
}

#[tokio::test]
async fn filters_reapply_against_the_full_result_set() {
    let (_storage, mut planner) = session();
    planner.search("Lisbon").await.unwrap();

    planner
        .apply_filter(
            &CategoryFilter::Category(Category::Museum),
            &FilterCriteria::default(),
        )
        .unwrap();
    let parks = planner
        .apply_filter(
            &CategoryFilter::Category(Category::Park),
            &FilterCriteria::default(),
        )
        .unwrap();
    assert_eq!(parks.len(), 1);
}

#[tokio::test]
async fn itinerary_rejects_duplicates_and_unknown_ids() {
    let (_storage, mut planner) = session();
    planner.search("Lisbon").await.unwrap();

    planner.add_to_itinerary(&DestinationId::Number(1)).unwrap();
    let duplicate = planner
        .add_to_itinerary(&DestinationId::Number(1))
        .unwrap_err();
    assert_eq!(duplicate.kind, CoreErrorKind::InvalidInput);
    assert!(planner.banner().unwrap().contains("already in your itinerary"));
    assert_eq!(planner.itinerary_items().len(), 1);

    let missing = planner
        .add_to_itinerary(&DestinationId::Number(99))
        .unwrap_err();
    assert_eq!(missing.kind, CoreErrorKind::NotFound);
}

#[tokio::test]
async fn itinerary_removal_is_by_position() {
    let (_storage, mut planner) = session();
    planner.search("Lisbon").await.unwrap();
    planner.add_to_itinerary(&DestinationId::Number(1)).unwrap();
    planner.add_to_itinerary(&DestinationId::Number(2)).unwrap();

    let removed = planner.remove_from_itinerary(0).unwrap();
    assert_eq!(removed.id, DestinationId::Number(1));
    assert_eq!(planner.itinerary_items().len(), 1);

    let error = planner.remove_from_itinerary(5).unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::NotFound);
}

#[tokio::test]
async fn create_itinerary_snapshots_and_resets_the_draft() {
    let (storage, mut planner) = session();
    planner.search("Lisbon").await.unwrap();
    planner.add_to_itinerary(&DestinationId::Number(1)).unwrap();
    planner.add_to_itinerary(&DestinationId::Number(4)).unwrap();

    let itinerary = planner.create_itinerary().unwrap();
    assert_eq!(itinerary.location, "Lisbon");
    assert_eq!(itinerary.items.len(), 2);
    assert_eq!(itinerary.estimated_days, 2);
    assert!(planner.itinerary_items().is_empty());

    let persisted = storage.itineraries();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0], itinerary);
}

#[tokio::test]
async fn empty_draft_cannot_become_an_itinerary() {
    let (_storage, mut planner) = session();
    planner.search("Lisbon").await.unwrap();

    let error = planner.create_itinerary().unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::InvalidInput);
}
