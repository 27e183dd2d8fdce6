// Provider -> classification -> figure, as run for every user request

use std::path::PathBuf;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::classification::{NormalizedResultRow, classify_session};
use crate::config::AppConfig;
use crate::errors::GridgapError;
use crate::presentation::{Figure, FigureContext, render};
use crate::provider::{CachedProvider, FileProvider, JolpicaProvider, TimingProvider};
use crate::session::SessionType;

/// A session to visualize.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub year: u16,
    pub event_name: String,
    pub session_type: SessionType,
}

impl SessionRequest {
    pub fn new(year: u16, event_name: &str, session_type: SessionType) -> Self {
        Self {
            year,
            event_name: event_name.to_string(),
            session_type,
        }
    }

    pub fn figure_context(&self) -> FigureContext {
        FigureContext::new(self.year, &self.event_name, self.session_type.label())
    }
}

/// The classification and figure for a request
#[derive(Clone, Debug)]
pub struct SessionFigure {
    pub request: SessionRequest,
    pub rows: Vec<NormalizedResultRow>,
    pub figure: Figure,
}

pub fn load_classification(
    provider: &dyn TimingProvider,
    request: &SessionRequest,
) -> Result<Vec<NormalizedResultRow>, GridgapError> {
    let session = provider.load_session(request.year, &request.event_name, request.session_type)?;
    classify_session(&session, request.session_type)
}

/// Loads, classifies and renders a session. Either the whole figure is produced or an error.
pub fn build_figure(
    provider: &dyn TimingProvider,
    request: &SessionRequest,
) -> Result<SessionFigure, GridgapError> {
    info!(
        "Loading {} {} {}",
        request.year, request.event_name, request.session_type
    );
    let rows = load_classification(provider, request).inspect_err(|e| {
        error!("Could not classify {:?}: {}", request, e);
    })?;
    let figure = render(&rows, &request.figure_context());
    Ok(SessionFigure {
        request: request.clone(),
        rows,
        figure,
    })
}

/// The provider described by the config: the Jolpica API behind the disk cache, or files
/// from `offline_dir` when given.
pub fn provider_from_config(
    config: &AppConfig,
    offline_dir: Option<PathBuf>,
) -> Result<Box<dyn TimingProvider>, GridgapError> {
    match offline_dir {
        Some(dir) => {
            info!("Reading timing data from {:?}", dir);
            Ok(Box::new(FileProvider::new(dir)))
        }
        None => {
            let provider = CachedProvider::new(
                JolpicaProvider::new(&config.api_base_url, config.request_timeout()),
                config.session_cache()?,
            )?;
            Ok(Box::new(provider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::FinishStatus;
    use crate::session::{EventInfo, RawSession, RawSessionRecord, TimeBasis, TimeColumn};

    struct StubProvider;

    impl TimingProvider for StubProvider {
        fn event_schedule(&self, _year: u16) -> Result<Vec<EventInfo>, GridgapError> {
            Ok(Vec::new())
        }

        fn load_session(
            &self,
            _year: u16,
            event_name: &str,
            session_type: SessionType,
        ) -> Result<RawSession, GridgapError> {
            if event_name != "Monaco Grand Prix" {
                return Err(GridgapError::SessionLoad {
                    reason: format!("unknown event {}", event_name),
                });
            }
            let columns: &[TimeColumn] = match session_type {
                SessionType::Race => &[TimeColumn::Time],
                _ => &[],
            };
            Ok(RawSession::new(
                columns,
                TimeBasis::GapToLeader,
                vec![
                    RawSessionRecord::new(Some(1), "VER", "Max Verstappen", "Red Bull Racing", "Finished")
                        .with_time(TimeColumn::Time, 0.0),
                    RawSessionRecord::new(Some(2), "ALO", "Fernando Alonso", "Aston Martin", "Finished")
                        .with_time(TimeColumn::Time, 27.921),
                    RawSessionRecord::new(None, "STR", "Lance Stroll", "Aston Martin", "Accident"),
                ],
            ))
        }
    }

    #[test]
    fn test_build_figure() {
        let request = SessionRequest::new(2023, "Monaco Grand Prix", SessionType::Race);
        let result = build_figure(&StubProvider, &request).unwrap();

        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[1].gap_to_winner_s, Some(27.921));
        assert_eq!(result.rows[2].finish_status, FinishStatus::Dnf);
        assert_eq!(result.figure.chart.bars.len(), 2);
        assert_eq!(result.figure.table.rows.len(), 3);
        assert_eq!(
            result.figure.chart.title,
            "2023 Monaco Grand Prix – Race gaps to winner"
        );
    }

    #[test]
    fn test_errors_produce_no_figure() {
        let unknown = SessionRequest::new(2023, "Atlantis Grand Prix", SessionType::Race);
        assert!(matches!(
            build_figure(&StubProvider, &unknown),
            Err(GridgapError::SessionLoad { .. })
        ));

        // the stub has no time column outside races
        let qualifying = SessionRequest::new(2023, "Monaco Grand Prix", SessionType::Qualifying);
        assert!(matches!(
            build_figure(&StubProvider, &qualifying),
            Err(GridgapError::MissingField { .. })
        ));
    }

    #[test]
    fn test_request_serialization() {
        let request = SessionRequest::new(2021, "Abu Dhabi Grand Prix", SessionType::Sprint);
        let json = serde_json::to_string(&request).unwrap();
        let parsed: SessionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
        assert_eq!(request.figure_context().session_label, "Sprint");
    }
}
