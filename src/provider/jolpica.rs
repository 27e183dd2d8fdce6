// Timing provider backed by the Jolpica F1 API (Ergast compatible)

use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;

use super::TimingProvider;
use crate::errors::GridgapError;
use crate::session::{
    EventInfo, RawSession, RawSessionRecord, SessionType, TimeBasis, TimeColumn, find_event,
};

pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";
pub const DEFAULT_TIMEOUT_S: u64 = 30;
const PAGE_LIMIT: u32 = 100;

#[derive(Deserialize, Debug)]
struct ErgastResponse {
    #[serde(rename = "MRData")]
    data: MrData,
}

#[derive(Deserialize, Debug)]
struct MrData {
    #[serde(rename = "RaceTable")]
    race_table: RaceTable,
}

#[derive(Deserialize, Debug)]
struct RaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<Race>,
}

#[derive(Deserialize, Debug)]
struct Race {
    round: String,
    #[serde(rename = "raceName")]
    race_name: String,
    #[serde(rename = "Circuit")]
    circuit: Option<Circuit>,
    #[serde(rename = "Sprint")]
    sprint: Option<serde_json::Value>,
    #[serde(rename = "Results", default)]
    results: Vec<ResultEntry>,
    #[serde(rename = "SprintResults", default)]
    sprint_results: Vec<ResultEntry>,
    #[serde(rename = "QualifyingResults", default)]
    qualifying_results: Vec<QualifyingEntry>,
}

#[derive(Deserialize, Debug)]
struct Circuit {
    #[serde(rename = "circuitName")]
    circuit_name: String,
    #[serde(rename = "Location")]
    location: Option<Location>,
}

#[derive(Deserialize, Debug)]
struct Location {
    #[serde(default)]
    locality: String,
    #[serde(default)]
    country: String,
}

#[derive(Deserialize, Debug)]
struct Driver {
    code: Option<String>,
    #[serde(rename = "givenName")]
    given_name: String,
    #[serde(rename = "familyName")]
    family_name: String,
}

impl Driver {
    fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }

    /// Three letter code, derived from the family name for drivers that predate codes
    fn code(&self) -> String {
        match &self.code {
            Some(code) if !code.is_empty() => code.clone(),
            _ => self
                .family_name
                .chars()
                .filter(|c| c.is_alphabetic())
                .take(3)
                .collect::<String>()
                .to_uppercase(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct Constructor {
    name: String,
}

#[derive(Deserialize, Debug)]
struct ResultEntry {
    #[serde(rename = "positionText")]
    position_text: String,
    #[serde(rename = "Driver")]
    driver: Driver,
    #[serde(rename = "Constructor")]
    constructor: Constructor,
    #[serde(default)]
    status: String,
    #[serde(rename = "Time")]
    time: Option<ResultTime>,
}

#[derive(Deserialize, Debug)]
struct ResultTime {
    millis: Option<String>,
}

#[derive(Deserialize, Debug)]
struct QualifyingEntry {
    position: String,
    #[serde(rename = "Driver")]
    driver: Driver,
    #[serde(rename = "Constructor")]
    constructor: Constructor,
    #[serde(rename = "Q1")]
    q1: Option<String>,
    #[serde(rename = "Q2")]
    q2: Option<String>,
    #[serde(rename = "Q3")]
    q3: Option<String>,
}

/// Parses a lap time such as `1:29.500` or `59.871` into seconds.
pub fn parse_lap_time(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let (minutes, seconds) = match text.rsplit_once(':') {
        Some((minutes, seconds)) => (minutes.parse::<u32>().ok()?, seconds),
        None => (0, text),
    };
    let seconds = seconds.parse::<f64>().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then(|| minutes as f64 * 60.0 + seconds)
}

fn parse_response(body: &str) -> Result<Vec<Race>, GridgapError> {
    let response: ErgastResponse =
        serde_json::from_str(body).map_err(|e| GridgapError::ResponseParse { source: e })?;
    Ok(response.data.race_table.races)
}

fn parse_schedule(body: &str) -> Result<Vec<EventInfo>, GridgapError> {
    parse_response(body)?
        .into_iter()
        .map(|race| {
            let round = race.round.parse::<u32>().map_err(|_| GridgapError::SessionLoad {
                reason: format!("invalid round '{}' for {}", race.round, race.race_name),
            })?;
            let (circuit_name, locality, country) = match race.circuit {
                Some(circuit) => {
                    let location = circuit.location.unwrap_or(Location {
                        locality: String::new(),
                        country: String::new(),
                    });
                    (circuit.circuit_name, location.locality, location.country)
                }
                None => (String::new(), String::new(), String::new()),
            };
            Ok(EventInfo {
                round,
                event_name: race.race_name,
                circuit_name,
                locality,
                country,
                has_sprint: race.sprint.is_some(),
            })
        })
        .collect()
}

fn result_records(entries: Vec<ResultEntry>) -> Vec<RawSessionRecord> {
    entries
        .into_iter()
        .map(|entry| {
            // positionText is R, D, E, W, F or N for unclassified drivers
            let position = entry.position_text.parse::<u32>().ok();
            let record = RawSessionRecord::new(
                position,
                &entry.driver.code(),
                &entry.driver.full_name(),
                &entry.constructor.name,
                &entry.status,
            );
            match entry
                .time
                .and_then(|t| t.millis)
                .and_then(|millis| millis.parse::<u64>().ok())
            {
                Some(millis) => record.with_time(TimeColumn::Time, millis as f64 / 1000.0),
                None => record,
            }
        })
        .collect()
}

fn qualifying_records(entries: Vec<QualifyingEntry>) -> Vec<RawSessionRecord> {
    entries
        .into_iter()
        .map(|entry| {
            let mut record = RawSessionRecord::new(
                entry.position.parse::<u32>().ok(),
                &entry.driver.code(),
                &entry.driver.full_name(),
                &entry.constructor.name,
                "",
            );
            for (column, value) in [
                (TimeColumn::Q1, &entry.q1),
                (TimeColumn::Q2, &entry.q2),
                (TimeColumn::Q3, &entry.q3),
            ] {
                if let Some(seconds) = value.as_deref().and_then(parse_lap_time) {
                    record = record.with_time(column, seconds);
                }
            }
            record
        })
        .collect()
}

fn parse_session(
    body: &str,
    session_type: SessionType,
    event_name: &str,
) -> Result<RawSession, GridgapError> {
    let race = parse_response(body)?
        .into_iter()
        .next()
        .ok_or_else(|| GridgapError::SessionLoad {
            reason: format!("no {} results published for {}", session_type, event_name),
        })?;

    let session = match session_type {
        SessionType::Race => RawSession::new(
            &[TimeColumn::Time],
            TimeBasis::Elapsed,
            result_records(race.results),
        ),
        SessionType::Sprint => RawSession::new(
            &[TimeColumn::Time],
            TimeBasis::Elapsed,
            result_records(race.sprint_results),
        ),
        SessionType::Qualifying => RawSession::new(
            &[TimeColumn::Q1, TimeColumn::Q2, TimeColumn::Q3],
            TimeBasis::Elapsed,
            qualifying_records(race.qualifying_results),
        ),
        SessionType::Practice1 | SessionType::Practice2 | SessionType::Practice3 => {
            return Err(practice_unavailable(session_type, event_name));
        }
    };
    debug!(
        "Parsed {} records for {} {}",
        session.records.len(),
        event_name,
        session_type
    );
    Ok(session)
}

fn practice_unavailable(session_type: SessionType, event_name: &str) -> GridgapError {
    GridgapError::SessionLoad {
        reason: format!(
            "{} classifications for {} are not published by the Jolpica F1 API",
            session_type, event_name
        ),
    }
}

/// Provider for the Jolpica F1 API.
pub struct JolpicaProvider {
    base_url: String,
    timeout: Duration,
}

impl Default for JolpicaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_S))
    }
}

impl JolpicaProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}?limit={}", self.base_url, path, PAGE_LIMIT)
    }

    /// Blocking GET, the HTTP client runs on a current thread runtime for the call
    fn fetch(&self, path: &str) -> Result<String, GridgapError> {
        let url = self.url(path);
        info!("Fetching timing data from {}", url);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GridgapError::RuntimeError { source: e })?;
        let body = runtime.block_on(async {
            let client = reqwest::Client::builder().timeout(self.timeout).build()?;
            let response = client.get(&url).send().await?.error_for_status()?;
            Ok::<String, reqwest::Error>(response.text().await?)
        })?;
        Ok(body)
    }

    fn session_path(year: u16, round: u32, session_type: SessionType) -> Option<String> {
        let endpoint = match session_type {
            SessionType::Race => "results",
            SessionType::Sprint => "sprint",
            SessionType::Qualifying => "qualifying",
            SessionType::Practice1 | SessionType::Practice2 | SessionType::Practice3 => {
                return None;
            }
        };
        Some(format!("{}/{}/{}.json", year, round, endpoint))
    }
}

impl TimingProvider for JolpicaProvider {
    fn event_schedule(&self, year: u16) -> Result<Vec<EventInfo>, GridgapError> {
        let body = self
            .fetch(&format!("{}.json", year))
            .map_err(|e| GridgapError::ScheduleLookup {
                year,
                reason: e.to_string(),
            })?;
        let schedule = parse_schedule(&body).map_err(|e| GridgapError::ScheduleLookup {
            year,
            reason: e.to_string(),
        })?;
        if schedule.is_empty() {
            return Err(GridgapError::ScheduleLookup {
                year,
                reason: "the season has no published events".to_string(),
            });
        }
        Ok(schedule)
    }

    fn load_session(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError> {
        if session_type.is_practice() {
            return Err(practice_unavailable(session_type, event_name));
        }

        let schedule = self.event_schedule(year)?;
        let event = find_event(&schedule, event_name).ok_or_else(|| GridgapError::EventNotFound {
            year,
            event_name: event_name.to_string(),
        })?;
        self.load_event_session(year, event, session_type)
    }

    fn load_event_session(
        &self,
        year: u16,
        event: &EventInfo,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError> {
        if session_type == SessionType::Sprint && !event.has_sprint {
            warn!("{} {} has no sprint on the schedule", year, event.event_name);
            return Err(GridgapError::SessionLoad {
                reason: format!("{} {} does not have a sprint", year, event.event_name),
            });
        }

        let path = Self::session_path(year, event.round, session_type)
            .ok_or_else(|| practice_unavailable(session_type, &event.event_name))?;
        let body = self.fetch(&path)?;
        parse_session(&body, session_type, &event.event_name)
    }
}
