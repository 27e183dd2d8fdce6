// Timing data providers
// Fetch season schedules and raw session classifications, optionally through an on-disk cache

pub mod cache;
pub mod file;
pub mod jolpica;

use crate::errors::GridgapError;
use crate::session::{EventInfo, RawSession, SessionType};

pub use cache::{CachedProvider, SessionCache};
pub use file::FileProvider;
pub use jolpica::JolpicaProvider;

/// A source of timing data.
///
/// Implementations return descriptive errors when a schedule or session cannot be found
/// or loaded; callers surface them to the user as they are, without retrying.
pub trait TimingProvider: Send + Sync {
    /// Events of a season in calendar order
    fn event_schedule(&self, year: u16) -> Result<Vec<EventInfo>, GridgapError>;

    /// The raw classification of one session of an event
    fn load_session(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError>;

    /// Like [`TimingProvider::load_session`], for an event already resolved against the
    /// season schedule. Providers that look events up themselves can skip that lookup here.
    fn load_event_session(
        &self,
        year: u16,
        event: &EventInfo,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError> {
        self.load_session(year, &event.event_name, session_type)
    }
}

impl<P: TimingProvider + ?Sized> TimingProvider for Box<P> {
    fn event_schedule(&self, year: u16) -> Result<Vec<EventInfo>, GridgapError> {
        (**self).event_schedule(year)
    }

    fn load_session(
        &self,
        year: u16,
        event_name: &str,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError> {
        (**self).load_session(year, event_name, session_type)
    }

    fn load_event_session(
        &self,
        year: u16,
        event: &EventInfo,
        session_type: SessionType,
    ) -> Result<RawSession, GridgapError> {
        (**self).load_event_session(year, event, session_type)
    }
}
