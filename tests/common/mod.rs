//! Shared helpers for integration tests.
#![allow(dead_code)]

use chrono::{FixedOffset, TimeZone, Utc};
use std::sync::Arc;
use tournament_wizard::wizard::WallClock;
use tournament_wizard::{keys, FieldTypeRegistry, FieldValue, FormData, Sequencer, WizardSession};

/// Standard wizard reading datetimes on UTC wall clock.
pub fn session() -> WizardSession {
    WizardSession::new(Arc::new(Sequencer::tournament()), Arc::new(utc_registry())).unwrap()
}

pub fn utc_registry() -> FieldTypeRegistry {
    FieldTypeRegistry::with_wall_clock(WallClock::Fixed(FixedOffset::east_opt(0).unwrap()))
}

pub fn flat(entries: &[(&str, FieldValue)]) -> FormData {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// The "Spring Cup" knockout record.
pub fn spring_cup() -> FormData {
    flat(&[
        (keys::NAME, FieldValue::text("Spring Cup")),
        (keys::FORMAT, FieldValue::text("KNOCKOUT")),
        (keys::NUMBER_OF_PARTICIPANTS, FieldValue::Number(8.0)),
        (keys::FIELDS, FieldValue::Number(2.0)),
        (keys::LEGS, FieldValue::text("SINGLE_MATCH")),
        (keys::HAS_THIRD_PLACE, FieldValue::Bool(true)),
        (
            keys::START_DATE,
            FieldValue::Instant(Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()),
        ),
    ])
}
