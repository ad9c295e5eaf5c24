//! Config factory: flat wizard form data <-> nested TournamentConfig.
//!
//! `from_form_data` reads `format` to pick the rule set and fills every missing optional key
//! with its default (numbers 0, booleans false, lists empty, legs single match, start date the
//! Unix epoch). Only `name` and `format` are required.
//! `to_form_data` flattens the active rule set back under the same keys, so
//! `to_form_data(&from_form_data(f)?)` reproduces `f` plus the filled defaults.

use crate::models::{
    FieldValue, FormData, FormatRules, GroupConfig, ImageData, KnockoutConfig, LeagueConfig, Legs,
    PointsTable, TieBreaker, TournamentConfig, TournamentFormat,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Flat form-data keys, shared with the wizard's field catalogue.
pub mod keys {
    pub const NAME: &str = "name";
    pub const LOGO_URL: &str = "logoUrl";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const FIELDS: &str = "fields";
    pub const NUMBER_OF_PARTICIPANTS: &str = "numberOfParticipants";
    pub const FORMAT: &str = "format";
    pub const LEGS: &str = "legs";
    pub const POINTS_FOR_WIN: &str = "pointsForWin";
    pub const POINTS_FOR_DRAW: &str = "pointsForDraw";
    pub const POINTS_FOR_LOSS: &str = "pointsForLoss";
    pub const TIE_BREAKERS: &str = "tieBreakers";
    pub const NUMBER_OF_GROUPS: &str = "numberOfGroups";
    pub const QUALIFIERS_PER_GROUP: &str = "qualifiersPerGroup";
    pub const KNOCKOUT_LEGS: &str = "knockoutLegs";
    pub const HAS_THIRD_PLACE: &str = "hasThirdPlace";
}

/// Largest value a count field (participants, fields, points, groups) can hold.
pub const MAX_COUNT: u32 = u32::MAX;

/// Form data the factory cannot turn into a config.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
    #[error("Unknown tournament format: {0}")]
    UnknownFormat(String),
}

/// Build the canonical config from a flat record.
pub fn from_form_data(form: &FormData) -> Result<TournamentConfig, ConfigError> {
    let format_text = required_text(form, keys::FORMAT)?;
    let format: TournamentFormat = format_text.parse().map_err(ConfigError::UnknownFormat)?;
    let number_of_participants = count(form, keys::NUMBER_OF_PARTICIPANTS)?;

    let rules = match format {
        TournamentFormat::League => FormatRules::League(LeagueConfig {
            number_of_teams: number_of_participants,
            legs: legs(form, keys::LEGS)?,
            points: points(form)?,
            tie_breakers: tie_breakers(form)?,
        }),
        TournamentFormat::GroupKnockout => {
            let number_of_groups = count(form, keys::NUMBER_OF_GROUPS)?;
            let qualifiers_per_group = count(form, keys::QUALIFIERS_PER_GROUP)?;
            let teams_per_group = if number_of_groups == 0 {
                0
            } else {
                number_of_participants.div_ceil(number_of_groups)
            };
            FormatRules::GroupKnockout {
                group: GroupConfig {
                    number_of_groups,
                    teams_per_group,
                    qualifiers_per_group,
                    legs: legs(form, keys::LEGS)?,
                    points: points(form)?,
                    tie_breakers: tie_breakers(form)?,
                },
                knockout: KnockoutConfig {
                    number_of_teams: number_of_groups.saturating_mul(qualifiers_per_group),
                    legs: legs(form, keys::KNOCKOUT_LEGS)?,
                    has_third_place: flag(form, keys::HAS_THIRD_PLACE)?,
                },
            }
        }
        TournamentFormat::Knockout => FormatRules::Knockout(KnockoutConfig {
            number_of_teams: number_of_participants,
            legs: legs(form, keys::LEGS)?,
            has_third_place: flag(form, keys::HAS_THIRD_PLACE)?,
        }),
    };

    Ok(TournamentConfig {
        name: required_text(form, keys::NAME)?,
        logo_url: logo(form)?,
        start_date: instant(form, keys::START_DATE)?.unwrap_or_default(),
        end_date: instant(form, keys::END_DATE)?,
        fields: count(form, keys::FIELDS)?,
        number_of_participants,
        rules,
    })
}

/// Flatten a config into the wizard's keys. Derived values (team counts) are not emitted.
pub fn to_form_data(config: &TournamentConfig) -> FormData {
    let mut form = FormData::new();
    let mut put = |key: &str, value: FieldValue| {
        form.insert(key.to_string(), value);
    };

    put(keys::NAME, FieldValue::text(&config.name));
    if let Some(logo) = &config.logo_url {
        let value = match ImageData::from_data_uri(logo) {
            Some(image) => FieldValue::ImageData(image),
            None => FieldValue::text(logo),
        };
        put(keys::LOGO_URL, value);
    }
    put(keys::START_DATE, FieldValue::Instant(config.start_date));
    if let Some(end) = config.end_date {
        put(keys::END_DATE, FieldValue::Instant(end));
    }
    put(keys::FIELDS, number(config.fields));
    put(keys::NUMBER_OF_PARTICIPANTS, number(config.number_of_participants));
    put(keys::FORMAT, FieldValue::text(config.format().as_str()));

    match &config.rules {
        FormatRules::League(league) => {
            put(keys::LEGS, FieldValue::text(league.legs.as_str()));
            put_points(&mut put, &league.points);
            put(keys::TIE_BREAKERS, tie_breaker_list(&league.tie_breakers));
        }
        FormatRules::GroupKnockout { group, knockout } => {
            put(keys::NUMBER_OF_GROUPS, number(group.number_of_groups));
            put(keys::QUALIFIERS_PER_GROUP, number(group.qualifiers_per_group));
            put(keys::LEGS, FieldValue::text(group.legs.as_str()));
            put_points(&mut put, &group.points);
            put(keys::TIE_BREAKERS, tie_breaker_list(&group.tie_breakers));
            put(keys::KNOCKOUT_LEGS, FieldValue::text(knockout.legs.as_str()));
            put(keys::HAS_THIRD_PLACE, FieldValue::Bool(knockout.has_third_place));
        }
        FormatRules::Knockout(knockout) => {
            put(keys::LEGS, FieldValue::text(knockout.legs.as_str()));
            put(keys::HAS_THIRD_PLACE, FieldValue::Bool(knockout.has_third_place));
        }
    }
    form
}

fn number(n: u32) -> FieldValue {
    FieldValue::Number(f64::from(n))
}

fn put_points(put: &mut impl FnMut(&str, FieldValue), points: &PointsTable) {
    put(keys::POINTS_FOR_WIN, number(points.win));
    put(keys::POINTS_FOR_DRAW, number(points.draw));
    put(keys::POINTS_FOR_LOSS, number(points.loss));
}

fn tie_breaker_list(tie_breakers: &[TieBreaker]) -> FieldValue {
    FieldValue::List(
        tie_breakers
            .iter()
            .map(|tb| FieldValue::text(tb.as_str()))
            .collect(),
    )
}

fn required_text(form: &FormData, key: &'static str) -> Result<String, ConfigError> {
    match form.get(key) {
        Some(FieldValue::Text(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(FieldValue::Text(_)) | None => Err(ConfigError::MissingField(key)),
        Some(_) => Err(ConfigError::InvalidValue {
            key,
            expected: "text",
        }),
    }
}

fn count(form: &FormData, key: &'static str) -> Result<u32, ConfigError> {
    match form.get(key) {
        None => Ok(0),
        Some(FieldValue::Number(n))
            if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(MAX_COUNT) =>
        {
            Ok(*n as u32)
        }
        Some(_) => Err(ConfigError::InvalidValue {
            key,
            expected: "a non-negative integer",
        }),
    }
}

fn flag(form: &FormData, key: &'static str) -> Result<bool, ConfigError> {
    match form.get(key) {
        None => Ok(false),
        Some(FieldValue::Bool(b)) => Ok(*b),
        Some(_) => Err(ConfigError::InvalidValue {
            key,
            expected: "a boolean",
        }),
    }
}

fn legs(form: &FormData, key: &'static str) -> Result<Legs, ConfigError> {
    match form.get(key) {
        None => Ok(Legs::default()),
        Some(FieldValue::Text(s)) => s.parse().map_err(|_| ConfigError::InvalidValue {
            key,
            expected: "SINGLE_MATCH or HOME_AND_AWAY",
        }),
        Some(_) => Err(ConfigError::InvalidValue {
            key,
            expected: "SINGLE_MATCH or HOME_AND_AWAY",
        }),
    }
}

fn points(form: &FormData) -> Result<PointsTable, ConfigError> {
    Ok(PointsTable {
        win: count(form, keys::POINTS_FOR_WIN)?,
        draw: count(form, keys::POINTS_FOR_DRAW)?,
        loss: count(form, keys::POINTS_FOR_LOSS)?,
    })
}

fn tie_breakers(form: &FormData) -> Result<Vec<TieBreaker>, ConfigError> {
    let invalid = ConfigError::InvalidValue {
        key: keys::TIE_BREAKERS,
        expected: "a list of tie-breakers",
    };
    match form.get(keys::TIE_BREAKERS) {
        None => Ok(Vec::new()),
        Some(FieldValue::List(items)) => items
            .iter()
            .map(|item| {
                item.as_text()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| invalid.clone())
            })
            .collect(),
        Some(_) => Err(invalid),
    }
}

fn instant(form: &FormData, key: &'static str) -> Result<Option<DateTime<Utc>>, ConfigError> {
    match form.get(key) {
        None => Ok(None),
        Some(FieldValue::Instant(t)) => Ok(Some(*t)),
        Some(FieldValue::Text(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| ConfigError::InvalidValue {
                key,
                expected: "an ISO-8601 instant",
            }),
        Some(_) => Err(ConfigError::InvalidValue {
            key,
            expected: "an ISO-8601 instant",
        }),
    }
}

fn logo(form: &FormData) -> Result<Option<String>, ConfigError> {
    match form.get(keys::LOGO_URL) {
        None => Ok(None),
        Some(FieldValue::ImageData(image)) => Ok(Some(image.to_data_uri())),
        Some(FieldValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(FieldValue::Text(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::InvalidValue {
            key: keys::LOGO_URL,
            expected: "an image",
        }),
    }
}
