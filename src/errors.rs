// Error types for gridgap

use snafu::Snafu;
use std::io;

use crate::session::{SessionType, TimeColumn};

#[derive(Debug, Snafu)]
pub enum GridgapError {
    // Errors from the timing data provider
    #[snafu(display("Could not load event schedule for {year}: {reason}"))]
    ScheduleLookup { year: u16, reason: String },
    #[snafu(display("No event matching '{event_name}' in the {year} schedule"))]
    EventNotFound { year: u16, event_name: String },
    #[snafu(display("Could not load session: {reason}"))]
    SessionLoad { reason: String },
    #[snafu(display("Timing data request failed: {source}"))]
    HttpError { source: reqwest::Error },
    #[snafu(display("Timing data response could not be parsed: {source}"))]
    ResponseParse { source: serde_json::Error },
    #[snafu(display("Could not start timing data runtime"))]
    RuntimeError { source: io::Error },

    // Classification errors
    #[snafu(display("{session} results are missing the {column} column"))]
    MissingField {
        session: SessionType,
        column: TimeColumn,
    },
    #[snafu(display("{session} has no classified drivers"))]
    EmptyResult { session: SessionType },

    // Cache errors
    #[snafu(display("Could not find a cache directory for timing data"))]
    NoCacheDir,
    #[snafu(display("Error accessing timing data cache"))]
    CacheIOError { source: io::Error },
    #[snafu(display("Error serializing timing data cache entry"))]
    CacheSerializeError { source: serde_json::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Output errors
    #[snafu(display("Could not export figure: {reason}"))]
    ExportError { reason: String },
    #[snafu(display("Error writing output file"))]
    WriterError { source: io::Error },

    // UI errors
    #[snafu(display("Could not open the visualizer window: {reason}"))]
    WindowError { reason: String },
}

impl GridgapError {
    /// Whether the error comes from fetching or decoding timing data, as opposed to
    /// classifying or rendering it.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            GridgapError::ScheduleLookup { .. }
                | GridgapError::EventNotFound { .. }
                | GridgapError::SessionLoad { .. }
                | GridgapError::HttpError { .. }
                | GridgapError::ResponseParse { .. }
                | GridgapError::RuntimeError { .. }
        )
    }
}

impl From<reqwest::Error> for GridgapError {
    fn from(value: reqwest::Error) -> Self {
        GridgapError::HttpError { source: value }
    }
}
