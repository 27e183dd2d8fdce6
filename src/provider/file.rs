// Offline provider reading raw sessions from a directory laid out like the cache

use std::path::PathBuf;

use log::debug;

use super::{SessionCache, TimingProvider};
use crate::errors::GridgapError;
use crate::session::{EventInfo, RawSession, SessionType, find_event};

pub struct FileProvider {
    files: SessionCache,
}

impl FileProvider {
    pub fn new(root: PathBuf) -> Self {
        Self {
            files: SessionCache::new(root),
        }
    }
}

impl TimingProvider for FileProvider {
    fn event_schedule(&self, year: u16) -> Result<Vec<EventInfo>, GridgapError> {
        self.files
            .load_schedule(year)
            .map_err(|e| GridgapError::ScheduleLookup {
                year,
                reason: e.to_string(),
            })?
            .ok_or_else(|| GridgapError::ScheduleLookup {
                year,
                reason: format!("no schedule file at {:?}", self.files.schedule_path(year)),
            })
    }

    fn load_session(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError> {
        let load = |name: &str| {
            self.files
                .load_session(year, name, session_type)
                .map_err(|e| GridgapError::SessionLoad {
                    reason: e.to_string(),
                })
        };

        if let Some(session) = load(event_name)? {
            return Ok(session);
        }

        // fall back to the schedule's name for the event, so "Monza" finds the Italian GP
        if let Ok(schedule) = self.event_schedule(year)
            && let Some(event) = find_event(&schedule, event_name)
            && event.event_name != event_name
        {
            debug!("Resolved '{}' to '{}'", event_name, event.event_name);
            if let Some(session) = load(&event.event_name)? {
                return Ok(session);
            }
        }

        Err(GridgapError::SessionLoad {
            reason: format!(
                "no {} data for {} {} at {:?}",
                session_type,
                year,
                event_name,
                self.files.session_path(year, event_name, session_type)
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{RawSessionRecord, TimeBasis, TimeColumn};
    use tempfile::TempDir;

    fn write_fixture(root: &TempDir) {
        let cache = SessionCache::new(root.path().to_path_buf());
        cache
            .store_schedule(
                2023,
                &[EventInfo {
                    round: 14,
                    event_name: "Italian Grand Prix".to_string(),
                    circuit_name: "Autodromo Nazionale di Monza".to_string(),
                    locality: "Monza".to_string(),
                    country: "Italy".to_string(),
                    has_sprint: false,
                }],
            )
            .unwrap();
        cache
            .store_session(
                2023,
                "Italian Grand Prix",
                SessionType::Race,
                &RawSession::new(
                    &[TimeColumn::Time],
                    TimeBasis::Elapsed,
                    vec![
                        RawSessionRecord::new(Some(1), "VER", "Max Verstappen", "Red Bull", "Finished")
                            .with_time(TimeColumn::Time, 4803.412),
                    ],
                ),
            )
            .unwrap();
    }

    #[test]
    fn test_load_by_schedule_name_and_alias() {
        let root = TempDir::new().unwrap();
        write_fixture(&root);
        let provider = FileProvider::new(root.path().to_path_buf());

        let direct = provider
            .load_session(2023, "Italian Grand Prix", SessionType::Race)
            .unwrap();
        let alias = provider.load_session(2023, "Monza", SessionType::Race).unwrap();

        assert_eq!(direct, alias);
        assert_eq!(provider.event_schedule(2023).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_data_is_descriptive() {
        let root = TempDir::new().unwrap();
        write_fixture(&root);
        let provider = FileProvider::new(root.path().to_path_buf());

        match provider.load_session(2023, "Monza", SessionType::Qualifying) {
            Err(GridgapError::SessionLoad { reason }) => assert!(reason.contains("Qualifying")),
            other => panic!("Expected SessionLoad error, got {:?}", other),
        }
        assert!(matches!(
            provider.event_schedule(1999),
            Err(GridgapError::ScheduleLookup { year: 1999, .. })
        ));
    }
}
