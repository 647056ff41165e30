use serde_json::json;
use time::macros::date;

use wayfarer_core::models::{Category, DestinationId};
use wayfarer_core::validate::{
    InputError, parse_destination_records, validate_budget, validate_destination_input,
    validate_rating, validate_travel_date,
};

#[test]
fn destination_input_rejects_empty_and_whitespace() {
    assert_eq!(
        validate_destination_input(""),
        Err(InputError::EmptyDestination)
    );
    assert_eq!(
        validate_destination_input("   "),
        Err(InputError::EmptyDestination)
    );
}

#[test]
fn destination_input_rejects_single_character() {
    assert_eq!(
        validate_destination_input("P"),
        Err(InputError::DestinationTooShort)
    );
}

#[test]
fn destination_input_rejects_digits_and_symbols() {
    assert_eq!(
        validate_destination_input("Par1s"),
        Err(InputError::DestinationCharset)
    );
    assert_eq!(
        validate_destination_input("Tokyo!"),
        Err(InputError::DestinationCharset)
    );
}

#[test]
fn destination_input_accepts_spaces_hyphens_apostrophes() {
    assert_eq!(validate_destination_input("New York"), Ok(()));
    assert_eq!(validate_destination_input("Stratford-upon-Avon"), Ok(()));
    assert_eq!(validate_destination_input("L'Aquila"), Ok(()));
    assert_eq!(validate_destination_input("São Paulo"), Ok(()));
}

#[test]
fn validation_errors_carry_inline_messages() {
    let error = validate_destination_input("x").unwrap_err();
    assert_eq!(error.to_string(), "destination must be at least 2 characters");
}

#[test]
fn budget_bounds() {
    assert_eq!(validate_budget(-5.0), Err(InputError::BudgetNotPositive));
    assert_eq!(validate_budget(0.0), Err(InputError::BudgetNotPositive));
    assert_eq!(validate_budget(f64::NAN), Err(InputError::BudgetNotPositive));
    assert_eq!(validate_budget(200.0), Ok(()));
    assert_eq!(validate_budget(1_000_000.0), Ok(()));
    assert_eq!(validate_budget(2_000_000.0), Err(InputError::BudgetTooHigh));
}

#[test]
fn travel_date_must_be_today_or_later() {
    let today = date!(2026 - 03 - 14);
    assert_eq!(
        validate_travel_date(None, today),
        Err(InputError::MissingDate)
    );
    assert_eq!(
        validate_travel_date(Some(""), today),
        Err(InputError::MissingDate)
    );
    assert_eq!(
        validate_travel_date(Some("not-a-date"), today),
        Err(InputError::MalformedDate)
    );
    assert_eq!(
        validate_travel_date(Some("2026-03-13"), today),
        Err(InputError::DateInPast)
    );
    assert_eq!(validate_travel_date(Some("2026-03-14"), today), Ok(()));
    assert_eq!(validate_travel_date(Some("2026-04-01"), today), Ok(()));
}

#[test]
fn rating_range_is_inclusive() {
    assert!(validate_rating(0.0));
    assert!(validate_rating(5.0));
    assert!(!validate_rating(5.1));
    assert!(!validate_rating(-0.1));
}

fn raw_record(name: &str, rating: f64) -> serde_json::Value {
    json!({
        "id": 7,
        "name": name,
        "category": "museum",
        "location": "Oslo",
        "rating": rating,
        "reviews": 52,
        "description": "Maritime history on the fjord.",
        "address": "2 Harbour Way, Oslo",
    })
}

#[test]
fn boundary_parse_keeps_well_formed_records() {
    let payload = json!([raw_record("Fjord Museum", 4.1)]);
    let records = parse_destination_records(&payload);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, DestinationId::Number(7));
    assert_eq!(records[0].category, Category::Museum);
}

#[test]
fn boundary_parse_drops_malformed_records_silently() {
    let payload = json!([
        raw_record("Fjord Museum", 4.1),
        {"id": 8, "name": "No Other Fields"},
        raw_record("Overrated", 9.9),
        raw_record("   ", 4.0),
    ]);
    let records = parse_destination_records(&payload);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Fjord Museum");
}

#[test]
fn boundary_parse_of_a_non_array_yields_nothing() {
    assert!(parse_destination_records(&json!({"items": []})).is_empty());
    assert!(parse_destination_records(&json!(null)).is_empty());
}

#[test]
fn unknown_category_is_preserved_as_text() {
    let mut payload = raw_record("Night Market", 4.4);
    payload["category"] = json!("street-market");
    let records = parse_destination_records(&json!([payload]));
    assert_eq!(
        records[0].category,
        Category::Other("street-market".to_owned())
    );
}
