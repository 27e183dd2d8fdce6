// Classification pipeline: raw provider records to display-ready result rows

use std::fmt::Display;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::GridgapError;
use crate::session::{RawSession, RawSessionRecord, SessionType, TimeBasis, TimingRule};

/// Binary finishing state, derived from whether a gap could be computed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FinishStatus {
    #[serde(rename = "FINISHED")]
    Finished,
    #[serde(rename = "DNF")]
    Dnf,
}

impl Display for FinishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishStatus::Finished => write!(f, "FINISHED"),
            FinishStatus::Dnf => write!(f, "DNF"),
        }
    }
}

/// One driver's classification with a uniform gap to the session reference.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NormalizedResultRow {
    pub position: Option<u32>,
    pub driver_code: String,
    pub driver_name: String,
    pub team_name: String,
    /// Seconds behind the reference driver, `None` when the driver set no usable time
    pub gap_to_winner_s: Option<f64>,
    pub finish_status: FinishStatus,
    /// Provider status text, kept for lap-down annotations
    pub raw_classification_status: String,
}

impl NormalizedResultRow {
    pub fn is_finisher(&self) -> bool {
        self.finish_status == FinishStatus::Finished
    }

    pub fn is_winner(&self) -> bool {
        self.position == Some(1)
    }
}

/// What the per-driver times are measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
enum GapBaseline {
    /// Times already are gaps to the winner
    PassThrough,
    /// Subtract the reference time from every driver
    Subtract(f64),
    /// Nobody in the session set a usable time
    Unresolved,
}

impl GapBaseline {
    fn for_session(rule: TimingRule, time_basis: TimeBasis, records: &[RawSessionRecord]) -> Self {
        let fastest = records
            .iter()
            .filter_map(|r| rule.reference_time(r))
            .reduce(f64::min);

        let baseline = match (rule, time_basis) {
            (TimingRule::SingleTime, TimeBasis::GapToLeader) => Some(GapBaseline::PassThrough),
            (TimingRule::SingleTime, TimeBasis::Elapsed) => records
                .iter()
                .find(|r| r.position == Some(1))
                .and_then(|r| rule.reference_time(r))
                .or(fastest)
                .map(GapBaseline::Subtract),
            // segment times are always absolute lap times
            (TimingRule::BestSegment, _) => fastest.map(GapBaseline::Subtract),
        };
        baseline.unwrap_or(GapBaseline::Unresolved)
    }

    fn gap(&self, reference_time: Option<f64>) -> Option<f64> {
        match self {
            GapBaseline::PassThrough => reference_time,
            GapBaseline::Subtract(reference) => reference_time.map(|t| t - reference),
            GapBaseline::Unresolved => None,
        }
    }
}

/// Turns a provider's raw session into one [`NormalizedResultRow`] per driver.
///
/// The reference time of each driver is picked according to the session type's
/// [`TimingRule`], the winner's gap is forced to exactly zero, and the finish status only
/// reflects whether a gap could be computed. Rows are ordered by position with
/// unclassified drivers last, in the order the provider listed them.
///
/// Only the first record the provider lists at position 1 is treated as the winner. Any
/// further P1 records are logged and measured like every other driver.
///
/// # Errors
///
/// * [`GridgapError::MissingField`] when the session lacks a time column the rule requires
/// * [`GridgapError::EmptyResult`] when the session has no records
pub fn classify_session(
    session: &RawSession,
    session_type: SessionType,
) -> Result<Vec<NormalizedResultRow>, GridgapError> {
    let rule = session_type.timing_rule();
    if let Some(column) = rule
        .required_columns()
        .iter()
        .find(|c| !session.has_column(**c))
    {
        return Err(GridgapError::MissingField {
            session: session_type,
            column: *column,
        });
    }
    if session.records.is_empty() {
        return Err(GridgapError::EmptyResult {
            session: session_type,
        });
    }
    warn_on_duplicate_positions(&session.records);

    let baseline = GapBaseline::for_session(rule, session.time_basis, &session.records);
    debug!(
        "Classifying {} drivers for {} against {:?}",
        session.records.len(),
        session_type,
        baseline
    );

    let mut winner_seen = false;
    let mut rows: Vec<NormalizedResultRow> = session
        .records
        .iter()
        .map(|record| {
            let is_winner = record.position == Some(1) && !winner_seen;
            winner_seen |= is_winner;
            let gap = if is_winner {
                Some(0.0)
            } else {
                baseline.gap(rule.reference_time(record))
            };
            NormalizedResultRow {
                position: record.position,
                driver_code: record.driver_code.clone(),
                driver_name: record.driver_name.clone(),
                team_name: record.team_name.clone(),
                gap_to_winner_s: gap,
                finish_status: match gap {
                    Some(_) => FinishStatus::Finished,
                    None => FinishStatus::Dnf,
                },
                raw_classification_status: record.status.clone(),
            }
        })
        .collect();

    // stable, so unclassified rows keep the provider's order
    rows.sort_by_key(position_order);
    Ok(rows)
}

/// Sort key putting classified rows first by ascending position, unclassified rows last
pub fn position_order(row: &NormalizedResultRow) -> (bool, Option<u32>) {
    (row.position.is_none(), row.position)
}

fn warn_on_duplicate_positions(records: &[RawSessionRecord]) {
    for position in records.iter().filter_map(|r| r.position).duplicates() {
        warn!("Position {} is assigned to more than one driver", position);
    }
}
