// Lap-down annotations and gap text derived from a result row

use crate::classification::{FinishStatus, NormalizedResultRow};

/// Matches provider status text that marks a lapped finisher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LapStatusMatcher {
    /// The whole status equals `literal`, shown as `display`
    Exact {
        literal: &'static str,
        display: &'static str,
    },
    /// A `+N Lap(s)` style status, shown verbatim
    LapsDown,
}

impl LapStatusMatcher {
    pub fn annotate(&self, raw_status: &str) -> Option<String> {
        match self {
            LapStatusMatcher::Exact { literal, display } => {
                (raw_status == *literal).then(|| display.to_string())
            }
            LapStatusMatcher::LapsDown => (raw_status.starts_with('+')
                && raw_status.contains("Lap"))
            .then(|| raw_status.to_string()),
        }
    }
}

/// Evaluated in order, the first match wins.
pub const LAP_STATUS_MATCHERS: [LapStatusMatcher; 2] = [
    LapStatusMatcher::Exact {
        literal: "Lapped",
        display: "+1 Lap",
    },
    LapStatusMatcher::LapsDown,
];

/// The lap-down label for a raw status, if it describes a lapped car.
pub fn lap_annotation(raw_status: &str) -> Option<String> {
    LAP_STATUS_MATCHERS
        .iter()
        .find_map(|matcher| matcher.annotate(raw_status))
}

/// Text for the gap column of the results table.
pub fn gap_display(row: &NormalizedResultRow) -> String {
    if row.finish_status == FinishStatus::Dnf {
        return String::new();
    }
    if let Some(annotation) = lap_annotation(&row.raw_classification_status) {
        return annotation;
    }
    match row.gap_to_winner_s {
        None => String::new(),
        Some(gap) if gap == 0.0 => "Leader".to_string(),
        // negative when a driver's time beats the winner's, e.g. after a post-race penalty
        Some(gap) => format!("{:+.3}s", gap),
    }
}
