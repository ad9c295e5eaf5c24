//! Per-field validation against the standard catalogue and hand-built definitions.

use chrono::{TimeZone, Utc};
use tournament_wizard::wizard::{messages, validate, FieldDefinition, Rule};
use tournament_wizard::{keys, FieldType, FieldValue, Sequencer, Validation};

fn field(key: &str) -> FieldDefinition {
    Sequencer::tournament()
        .field(key)
        .map(|(_, f)| f.clone())
        .unwrap()
}

#[test]
fn required_field_without_value_is_invalid() {
    let name = field(keys::NAME);
    assert_eq!(validate(&name, None), Validation::invalid(messages::REQUIRED));
    assert_eq!(
        validate(&name, Some(&FieldValue::text("   "))),
        Validation::invalid(messages::REQUIRED)
    );
    assert_eq!(validate(&name, Some(&FieldValue::text("Spring Cup"))), Validation::ok());
}

#[test]
fn optional_field_without_value_is_valid() {
    assert!(validate(&field(keys::END_DATE), None).valid);
    assert!(validate(&field(keys::LOGO_URL), None).valid);
}

#[test]
fn wrong_kind_reports_expected_type() {
    assert_eq!(
        validate(&field(keys::NUMBER_OF_PARTICIPANTS), Some(&FieldValue::text("eight"))),
        Validation::invalid(messages::EXPECTED_NUMBER)
    );
    assert_eq!(
        validate(&field(keys::START_DATE), Some(&FieldValue::text("tomorrow"))),
        Validation::invalid(messages::EXPECTED_DATE)
    );
    assert_eq!(
        validate(&field(keys::LOGO_URL), Some(&FieldValue::text("logo.png"))),
        Validation::invalid(messages::EXPECTED_IMAGE)
    );
    assert_eq!(
        validate(&field(keys::HAS_THIRD_PLACE), Some(&FieldValue::Number(1.0))),
        Validation::invalid(messages::EXPECTED_BOOLEAN)
    );
    assert!(validate(
        &field(keys::START_DATE),
        Some(&FieldValue::Instant(Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()))
    )
    .valid);
}

#[test]
fn count_rules_report_their_own_message() {
    let participants = field(keys::NUMBER_OF_PARTICIPANTS);
    assert_eq!(
        validate(&participants, Some(&FieldValue::Number(2.5))),
        Validation::invalid("validation.integer")
    );
    assert_eq!(
        validate(&participants, Some(&FieldValue::Number(1.0))),
        Validation::invalid("validation.min")
    );
    assert!(validate(&participants, Some(&FieldValue::Number(2.0))).valid);
    assert_eq!(
        validate(&participants, Some(&FieldValue::Number(f64::NAN))),
        Validation::invalid(messages::EXPECTED_NUMBER)
    );
}

#[test]
fn select_accepts_declared_options_only() {
    let format = field(keys::FORMAT);
    assert!(validate(&format, Some(&FieldValue::text("GROUP_KNOCKOUT"))).valid);
    assert_eq!(
        validate(&format, Some(&FieldValue::text("SWISS"))),
        Validation::invalid(messages::UNKNOWN_OPTION)
    );
}

#[test]
fn text_length_rules_count_trimmed_characters() {
    let code = FieldDefinition::new("code", FieldType::Text)
        .rule(Rule::MinLength(2), "validation.short")
        .rule(Rule::MaxLength(4), "validation.long");
    assert_eq!(
        validate(&code, Some(&FieldValue::text(" a "))),
        Validation::invalid("validation.short")
    );
    assert_eq!(
        validate(&code, Some(&FieldValue::text("abcde"))),
        Validation::invalid("validation.long")
    );
    assert!(validate(&code, Some(&FieldValue::text("äöü"))).valid);
}

#[test]
fn tie_breaker_list_rejects_unknown_and_repeated_entries() {
    let tie_breakers = field(keys::TIE_BREAKERS);
    let list = |items: &[&str]| FieldValue::List(items.iter().map(|s| FieldValue::text(*s)).collect());

    assert!(validate(&tie_breakers, None).valid);
    assert!(validate(&tie_breakers, Some(&list(&["GOAL_DIFFERENCE", "WINS"]))).valid);
    assert_eq!(
        validate(&tie_breakers, Some(&list(&["WINS", "WINS"]))),
        Validation::invalid("validation.duplicate")
    );
    assert_eq!(
        validate(&tie_breakers, Some(&list(&["COIN_TOSS"]))),
        Validation::invalid(messages::UNKNOWN_OPTION)
    );
    assert_eq!(
        validate(&tie_breakers, Some(&FieldValue::text("WINS"))),
        Validation::invalid(messages::EXPECTED_LIST)
    );
}

#[test]
fn list_without_custom_editor_is_valid() {
    let tags = FieldDefinition::new("tags", FieldType::List).required();
    assert!(validate(&tags, None).valid);
}
