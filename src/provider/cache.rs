// Read-through on-disk cache for raw timing data

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::TimingProvider;
use crate::errors::GridgapError;
use crate::session::{EventInfo, RawSession, SessionType, find_event};

const SCHEDULE_FILE_NAME: &str = "schedule.json";

/// File layout shared by the cache and the offline file provider:
/// `<root>/<year>/schedule.json` and `<root>/<year>/<event>_<session code>.json`.
#[derive(Debug, Clone)]
pub struct SessionCache {
    root: PathBuf,
}

impl SessionCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Cache in the platform cache directory
    pub fn new_default() -> Result<Self, GridgapError> {
        Ok(Self::new(Self::default_cache_path()?))
    }

    pub fn default_cache_path() -> Result<PathBuf, GridgapError> {
        let cache_dir = dirs::cache_dir().ok_or(GridgapError::NoCacheDir)?;
        Ok(cache_dir.join("gridgap"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the cache directory if it does not exist yet. Safe to call repeatedly.
    pub fn ensure_dir(&self) -> Result<(), GridgapError> {
        if !self.root.exists() {
            info!("Creating timing data cache in {:?}", self.root);
        }
        fs::create_dir_all(&self.root).map_err(|e| GridgapError::CacheIOError { source: e })
    }

    /// Normalize an event name for consistent file naming
    fn normalize_event_name(event_name: &str) -> String {
        event_name
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    pub fn schedule_path(&self, year: u16) -> PathBuf {
        self.root.join(year.to_string()).join(SCHEDULE_FILE_NAME)
    }

    pub fn session_path(&self, year: u16, event_name: &str, session_type: SessionType) -> PathBuf {
        self.root.join(year.to_string()).join(format!(
            "{}_{}.json",
            Self::normalize_event_name(event_name),
            session_type.code().to_lowercase()
        ))
    }

    fn read_entry<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, GridgapError> {
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(path).map_err(|e| GridgapError::CacheIOError { source: e })?;
        let entry = serde_json::from_str(&content)
            .map_err(|e| GridgapError::CacheSerializeError { source: e })?;
        Ok(Some(entry))
    }

    fn write_entry<T: Serialize>(path: &Path, entry: &T) -> Result<(), GridgapError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GridgapError::CacheIOError { source: e })?;
        }
        let content = serde_json::to_string_pretty(entry)
            .map_err(|e| GridgapError::CacheSerializeError { source: e })?;
        fs::write(path, content).map_err(|e| GridgapError::CacheIOError { source: e })
    }

    pub fn load_schedule(&self, year: u16) -> Result<Option<Vec<EventInfo>>, GridgapError> {
        Self::read_entry(&self.schedule_path(year))
    }

    pub fn store_schedule(&self, year: u16, schedule: &[EventInfo]) -> Result<(), GridgapError> {
        Self::write_entry(&self.schedule_path(year), &schedule)
    }

    pub fn load_session(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<Option<RawSession>, GridgapError> {
        Self::read_entry(&self.session_path(year, event_name, session_type))
    }

    pub fn store_session(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
        session: &RawSession,
    ) -> Result<(), GridgapError> {
        Self::write_entry(&self.session_path(year, event_name, session_type), session)
    }
}

/// Wraps a provider so raw schedules and sessions are served from disk once fetched.
pub struct CachedProvider<P: TimingProvider> {
    inner: P,
    cache: SessionCache,
}

impl<P: TimingProvider> CachedProvider<P> {
    /// Creates the provider and makes sure the cache directory exists.
    pub fn new(inner: P, cache: SessionCache) -> Result<Self, GridgapError> {
        cache.ensure_dir()?;
        Ok(Self { inner, cache })
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Cache read that treats a corrupt entry as a miss
    fn cached<T>(&self, what: &str, lookup: Result<Option<T>, GridgapError>) -> Option<T> {
        match lookup {
            Ok(Some(entry)) => {
                debug!("Cache hit for {}", what);
                Some(entry)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable cache entry for {}: {}", what, e);
                None
            }
        }
    }

    fn store(&self, what: &str, result: Result<(), GridgapError>) {
        if let Err(e) = result {
            warn!("Could not cache {}: {}", what, e);
        }
    }
}

impl<P: TimingProvider> TimingProvider for CachedProvider<P> {
    fn event_schedule(&self, year: u16) -> Result<Vec<EventInfo>, GridgapError> {
        let what = format!("{} schedule", year);
        if let Some(schedule) = self.cached(&what, self.cache.load_schedule(year)) {
            return Ok(schedule);
        }
        let schedule = self.inner.event_schedule(year)?;
        self.store(&what, self.cache.store_schedule(year, &schedule));
        Ok(schedule)
    }

    fn load_session(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError> {
        let what = format!("{} {} {}", year, event_name, session_type);
        if let Some(session) = self.cached(
            &what,
            self.cache.load_session(year, event_name, session_type),
        ) {
            return Ok(session);
        }
        // resolve against the cached schedule so the inner provider does not fetch it again
        let schedule = self.event_schedule(year).ok();
        let session = if let Some(schedule) = &schedule
            && let Some(event) = find_event(schedule, event_name)
        {
            self.inner.load_event_session(year, event, session_type)?
        } else {
            debug!("No schedule entry for {}, loading by name", what);
            self.inner.load_session(year, event_name, session_type)?
        };
        self.store(
            &what,
            self.cache
                .store_session(year, event_name, session_type, &session),
        );
        Ok(session)
    }
}
