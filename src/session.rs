// Raw session data as delivered by a timing provider

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::str::FromStr;

/// The on-track sessions that can be classified.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionType {
    Race,
    Qualifying,
    Sprint,
    Practice1,
    Practice2,
    Practice3,
}

impl SessionType {
    pub const ALL: [SessionType; 6] = [
        SessionType::Race,
        SessionType::Qualifying,
        SessionType::Sprint,
        SessionType::Practice1,
        SessionType::Practice2,
        SessionType::Practice3,
    ];

    /// Label shown in selectors and figure titles
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Race => "Race",
            SessionType::Qualifying => "Qualifying",
            SessionType::Sprint => "Sprint",
            SessionType::Practice1 => "Practice 1",
            SessionType::Practice2 => "Practice 2",
            SessionType::Practice3 => "Practice 3",
        }
    }

    /// Short session code used by timing providers and cache keys
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Race => "R",
            SessionType::Qualifying => "Q",
            SessionType::Sprint => "S",
            SessionType::Practice1 => "FP1",
            SessionType::Practice2 => "FP2",
            SessionType::Practice3 => "FP3",
        }
    }

    pub fn timing_rule(&self) -> TimingRule {
        match self {
            SessionType::Qualifying => TimingRule::BestSegment,
            SessionType::Race
            | SessionType::Sprint
            | SessionType::Practice1
            | SessionType::Practice2
            | SessionType::Practice3 => TimingRule::SingleTime,
        }
    }

    pub fn is_practice(&self) -> bool {
        matches!(
            self,
            SessionType::Practice1 | SessionType::Practice2 | SessionType::Practice3
        )
    }
}

impl Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SessionType {
    type Err = String;

    /// Accepts either the session code (`R`, `FP2`) or its label (`Practice 2`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SessionType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(wanted) || t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown session '{}', expected one of {}",
                    s,
                    SessionType::ALL.map(|t| t.code()).join(", ")
                )
            })
    }
}

/// Time columns a provider can deliver for a session.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeColumn {
    /// Elapsed race time, or a single best lap for practice
    Time,
    Q1,
    Q2,
    Q3,
}

impl Display for TimeColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeColumn::Time => "Time",
            TimeColumn::Q1 => "Q1",
            TimeColumn::Q2 => "Q2",
            TimeColumn::Q3 => "Q3",
        };
        write!(f, "{}", name)
    }
}

/// How the reference time of each driver is extracted for a session type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingRule {
    /// One recorded time per driver
    SingleTime,
    /// Fastest of the knockout segment times a driver set
    BestSegment,
}

impl TimingRule {
    /// Columns that must be part of the session schema
    pub fn required_columns(&self) -> &'static [TimeColumn] {
        match self {
            TimingRule::SingleTime => &[TimeColumn::Time],
            TimingRule::BestSegment => &[TimeColumn::Q1],
        }
    }

    /// Columns read when extracting the reference time
    pub fn source_columns(&self) -> &'static [TimeColumn] {
        match self {
            TimingRule::SingleTime => &[TimeColumn::Time],
            TimingRule::BestSegment => &[TimeColumn::Q1, TimeColumn::Q2, TimeColumn::Q3],
        }
    }

    /// The reference time of a single record, `None` when it set no usable time.
    pub fn reference_time(&self, record: &RawSessionRecord) -> Option<f64> {
        self.source_columns()
            .iter()
            .filter_map(|column| record.time(*column))
            .reduce(f64::min)
    }
}

/// Whether the `Time` column holds absolute times or deltas to the winner.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeBasis {
    /// Absolute elapsed or lap times
    #[default]
    Elapsed,
    /// Already expressed relative to the winner
    GapToLeader,
}

/// A driver's entry in the provider's results table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawSessionRecord {
    /// Classified position, `None` when unclassified
    pub position: Option<u32>,
    pub driver_code: String,
    pub driver_name: String,
    pub team_name: String,
    /// Times in seconds, a missing column means the driver has no value
    #[serde(default)]
    pub times: BTreeMap<TimeColumn, f64>,
    /// Free text classification status ("Finished", "+2 Laps", "Retired", ...)
    #[serde(default)]
    pub status: String,
}

impl RawSessionRecord {
    pub fn new(
        position: Option<u32>,
        driver_code: &str,
        driver_name: &str,
        team_name: &str,
        status: &str,
    ) -> Self {
        Self {
            position,
            driver_code: driver_code.to_string(),
            driver_name: driver_name.to_string(),
            team_name: team_name.to_string(),
            times: BTreeMap::new(),
            status: status.to_string(),
        }
    }

    pub fn with_time(mut self, column: TimeColumn, seconds: f64) -> Self {
        self.times.insert(column, seconds);
        self
    }

    /// Time for a column, treating non-finite values as missing
    pub fn time(&self, column: TimeColumn) -> Option<f64> {
        self.times.get(&column).copied().filter(|t| t.is_finite())
    }
}

/// Everything a provider returns for one session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawSession {
    pub schema: BTreeSet<TimeColumn>,
    #[serde(default)]
    pub time_basis: TimeBasis,
    pub records: Vec<RawSessionRecord>,
}

impl RawSession {
    pub fn new(schema: &[TimeColumn], time_basis: TimeBasis, records: Vec<RawSessionRecord>) -> Self {
        Self {
            schema: schema.iter().copied().collect(),
            time_basis,
            records,
        }
    }

    pub fn has_column(&self, column: TimeColumn) -> bool {
        self.schema.contains(&column)
    }
}

/// An event from a season schedule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventInfo {
    pub round: u32,
    pub event_name: String,
    #[serde(default)]
    pub circuit_name: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub country: String,
    /// Whether the weekend runs a sprint
    #[serde(default)]
    pub has_sprint: bool,
}

impl EventInfo {
    pub fn matches_exactly(&self, query: &str) -> bool {
        self.event_name.eq_ignore_ascii_case(query.trim())
    }

    /// Substring match on the event, circuit, locality or country names
    pub fn matches_loosely(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        [
            &self.event_name,
            &self.circuit_name,
            &self.locality,
            &self.country,
        ]
        .iter()
        .any(|name| name.to_lowercase().contains(&query))
    }
}

/// Resolves an event name against a schedule, preferring exact matches.
pub fn find_event<'s>(schedule: &'s [EventInfo], query: &str) -> Option<&'s EventInfo> {
    schedule
        .iter()
        .find(|e| e.matches_exactly(query))
        .or_else(|| schedule.iter().find(|e| e.matches_loosely(query)))
}
