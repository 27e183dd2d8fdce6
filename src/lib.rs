// Library interface for gridgap
// This allows integration tests and benches to access internal modules

pub mod classification;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod presentation;
pub mod provider;
pub mod session;

// Re-export commonly used types
pub use classification::{FinishStatus, NormalizedResultRow, classify_session};
pub use errors::GridgapError;
pub use pipeline::{SessionFigure, SessionRequest, build_figure};
pub use presentation::{Figure, FigureContext, render};
pub use provider::TimingProvider;
pub use session::{RawSession, RawSessionRecord, SessionType, TimeBasis, TimeColumn};
