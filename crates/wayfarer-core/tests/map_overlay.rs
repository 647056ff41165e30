use wayfarer_core::geo::{DEFAULT_ANCHOR, city_anchor, distance_between, markers_for};
use wayfarer_core::models::{Coordinates, DistanceUnit};
use wayfarer_core::sources::sample::sample_destinations;
use wayfarer_core::validate;

#[test]
fn known_cities_resolve_case_insensitively() {
    let paris = city_anchor("Paris").unwrap();
    assert_eq!(paris, city_anchor("  paris ").unwrap());
    assert!((paris.lat - 48.8566).abs() < 1e-9);
}

#[test]
fn unknown_city_has_no_anchor() {
    assert_eq!(city_anchor("Atlantis"), None);
}

#[test]
fn markers_skip_records_without_coordinates() {
    let mut records = sample_destinations("Paris");
    records[0].coordinates = None;
    records[3].coordinates = None;

    let markers = markers_for(&records);
    assert_eq!(markers.len(), records.len() - 2);
    assert!(markers.iter().all(|marker| marker.name != records[0].name));
}

#[test]
fn markers_carry_name_category_and_position() {
    let records = sample_destinations("Paris");
    let markers = markers_for(&records);

    let first = &markers[0];
    assert_eq!(first.name, records[0].name);
    assert_eq!(first.category, records[0].category);
    assert_eq!(Some(first.position), records[0].coordinates);
}

#[test]
fn sample_records_cluster_around_the_city_anchor() {
    let anchor = city_anchor("Tokyo").unwrap();
    for record in sample_destinations("Tokyo") {
        let position = record.coordinates.unwrap();
        assert!((position.lat - anchor.lat).abs() < 0.1);
        assert!((position.lng - anchor.lng).abs() < 0.1);
    }
}

#[test]
fn sample_records_fall_back_to_the_default_anchor() {
    let position = sample_destinations("Atlantis")[0].coordinates.unwrap();
    assert!((position.lat - DEFAULT_ANCHOR.lat).abs() < 0.1);
}

#[test]
fn sample_fixture_is_deterministic_and_boundary_valid() {
    assert_eq!(sample_destinations("Rome"), sample_destinations("Rome"));
    assert_eq!(
        validate::retain_valid(sample_destinations("Rome")).len(),
        8
    );
}

#[test]
fn haversine_matches_a_known_city_pair() {
    let paris = city_anchor("Paris").unwrap();
    let london = city_anchor("London").unwrap();

    let km = distance_between(paris, london).in_unit(DistanceUnit::Kilometers);
    assert!((km - 344.0).abs() < 10.0, "got {km} km");

    let miles = distance_between(paris, london).in_unit(DistanceUnit::Miles);
    assert!((miles - 214.0).abs() < 10.0, "got {miles} miles");
}

#[test]
fn zero_distance_between_identical_points() {
    let point = Coordinates { lat: 10.0, lng: 20.0 };
    let distance = distance_between(point, point);
    assert!(distance.in_unit(DistanceUnit::Kilometers).abs() < 1e-9);
}
