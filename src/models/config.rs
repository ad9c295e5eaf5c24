//! TournamentConfig: format, phases, and the per-format rule sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Competition format chosen in the wizard's mode step.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentFormat {
    #[default]
    League,
    GroupKnockout,
    Knockout,
}

impl TournamentFormat {
    pub const ALL: [TournamentFormat; 3] = [
        TournamentFormat::League,
        TournamentFormat::GroupKnockout,
        TournamentFormat::Knockout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentFormat::League => "LEAGUE",
            TournamentFormat::GroupKnockout => "GROUP_KNOCKOUT",
            TournamentFormat::Knockout => "KNOCKOUT",
        }
    }

    /// Phases played by this format, in order.
    pub fn phases(&self) -> Vec<Phase> {
        match self {
            TournamentFormat::League => vec![Phase::GroupStage],
            TournamentFormat::GroupKnockout => vec![Phase::GroupStage, Phase::KnockoutStage],
            TournamentFormat::Knockout => vec![Phase::KnockoutStage],
        }
    }
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TournamentFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Stage of play. Only meaningful for group + knockout tournaments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    GroupStage,
    KnockoutStage,
}

/// `type` section of the serialized config.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentType {
    pub format: TournamentFormat,
    pub phases: Vec<Phase>,
}

/// Matches played per pairing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Legs {
    #[default]
    SingleMatch,
    HomeAndAway,
}

impl Legs {
    pub const ALL: [Legs; 2] = [Legs::SingleMatch, Legs::HomeAndAway];

    pub fn as_str(&self) -> &'static str {
        match self {
            Legs::SingleMatch => "SINGLE_MATCH",
            Legs::HomeAndAway => "HOME_AND_AWAY",
        }
    }
}

impl FromStr for Legs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Legs::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Ranking tie-breakers, applied in the configured order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TieBreaker {
    GoalDifference,
    GoalsScored,
    HeadToHead,
    Wins,
}

impl TieBreaker {
    pub const ALL: [TieBreaker; 4] = [
        TieBreaker::GoalDifference,
        TieBreaker::GoalsScored,
        TieBreaker::HeadToHead,
        TieBreaker::Wins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreaker::GoalDifference => "GOAL_DIFFERENCE",
            TieBreaker::GoalsScored => "GOALS_SCORED",
            TieBreaker::HeadToHead => "HEAD_TO_HEAD",
            TieBreaker::Wins => "WINS",
        }
    }
}

impl FromStr for TieBreaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TieBreaker::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Points awarded per result.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsTable {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueConfig {
    pub number_of_teams: u32,
    pub legs: Legs,
    pub points: PointsTable,
    pub tie_breakers: Vec<TieBreaker>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    pub number_of_groups: u32,
    /// Derived: participants spread over the groups, rounded up.
    pub teams_per_group: u32,
    pub qualifiers_per_group: u32,
    pub legs: Legs,
    pub points: PointsTable,
    pub tie_breakers: Vec<TieBreaker>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockoutConfig {
    pub number_of_teams: u32,
    pub legs: Legs,
    pub has_third_place: bool,
}

/// Rule sets per format. Only the rules of the active format exist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatRules {
    League(LeagueConfig),
    GroupKnockout {
        group: GroupConfig,
        knockout: KnockoutConfig,
    },
    Knockout(KnockoutConfig),
}

impl FormatRules {
    pub fn format(&self) -> TournamentFormat {
        match self {
            FormatRules::League(_) => TournamentFormat::League,
            FormatRules::GroupKnockout { .. } => TournamentFormat::GroupKnockout,
            FormatRules::Knockout(_) => TournamentFormat::Knockout,
        }
    }
}

/// Rules governing one phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StageRules<'a> {
    League(&'a LeagueConfig),
    Group(&'a GroupConfig),
    Knockout(&'a KnockoutConfig),
}

/// Canonical tournament configuration produced by the wizard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "ConfigRecord", try_from = "ConfigRecord")]
pub struct TournamentConfig {
    pub name: String,
    pub logo_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub fields: u32,
    pub number_of_participants: u32,
    pub rules: FormatRules,
}

impl TournamentConfig {
    pub fn format(&self) -> TournamentFormat {
        self.rules.format()
    }

    pub fn tournament_type(&self) -> TournamentType {
        let format = self.format();
        TournamentType {
            format,
            phases: format.phases(),
        }
    }

    pub fn league(&self) -> Option<&LeagueConfig> {
        match &self.rules {
            FormatRules::League(league) => Some(league),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&GroupConfig> {
        match &self.rules {
            FormatRules::GroupKnockout { group, .. } => Some(group),
            _ => None,
        }
    }

    pub fn knockout(&self) -> Option<&KnockoutConfig> {
        match &self.rules {
            FormatRules::GroupKnockout { knockout, .. } | FormatRules::Knockout(knockout) => {
                Some(knockout)
            }
            FormatRules::League(_) => None,
        }
    }

    /// Rules for a phase, or None when the format does not play that phase.
    pub fn stage(&self, phase: Phase) -> Option<StageRules<'_>> {
        match (&self.rules, phase) {
            (FormatRules::League(league), Phase::GroupStage) => Some(StageRules::League(league)),
            (FormatRules::GroupKnockout { group, .. }, Phase::GroupStage) => {
                Some(StageRules::Group(group))
            }
            (FormatRules::GroupKnockout { knockout, .. }, Phase::KnockoutStage)
            | (FormatRules::Knockout(knockout), Phase::KnockoutStage) => {
                Some(StageRules::Knockout(knockout))
            }
            _ => None,
        }
    }
}

/// Serialized shape: all three sub-configs are always present, inactive ones at defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logo_url: Option<String>,
    start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_date: Option<DateTime<Utc>>,
    fields: u32,
    number_of_participants: u32,
    #[serde(rename = "type")]
    tournament_type: TournamentType,
    #[serde(default)]
    league_config: LeagueConfig,
    #[serde(default)]
    group_config: GroupConfig,
    #[serde(default)]
    knockout_config: KnockoutConfig,
}

impl From<TournamentConfig> for ConfigRecord {
    fn from(config: TournamentConfig) -> Self {
        let tournament_type = config.tournament_type();
        let (league_config, group_config, knockout_config) = match config.rules {
            FormatRules::League(league) => (league, GroupConfig::default(), KnockoutConfig::default()),
            FormatRules::GroupKnockout { group, knockout } => {
                (LeagueConfig::default(), group, knockout)
            }
            FormatRules::Knockout(knockout) => {
                (LeagueConfig::default(), GroupConfig::default(), knockout)
            }
        };
        Self {
            name: config.name,
            logo_url: config.logo_url,
            start_date: config.start_date,
            end_date: config.end_date,
            fields: config.fields,
            number_of_participants: config.number_of_participants,
            tournament_type,
            league_config,
            group_config,
            knockout_config,
        }
    }
}

impl TryFrom<ConfigRecord> for TournamentConfig {
    type Error = String;

    fn try_from(record: ConfigRecord) -> Result<Self, Self::Error> {
        let expected = record.tournament_type.format.phases();
        if record.tournament_type.phases != expected {
            return Err(format!(
                "phases {:?} do not match format {}",
                record.tournament_type.phases, record.tournament_type.format
            ));
        }
        let rules = match record.tournament_type.format {
            TournamentFormat::League => FormatRules::League(record.league_config),
            TournamentFormat::GroupKnockout => FormatRules::GroupKnockout {
                group: record.group_config,
                knockout: record.knockout_config,
            },
            TournamentFormat::Knockout => FormatRules::Knockout(record.knockout_config),
        };
        Ok(Self {
            name: record.name,
            logo_url: record.logo_url,
            start_date: record.start_date,
            end_date: record.end_date,
            fields: record.fields,
            number_of_participants: record.number_of_participants,
            rules,
        })
    }
}
