//! Per-visitor state that survives between page runs.
//!
//! Each browser gets a random session id in a cookie. The store maps ids to
//! the only values a page keeps across interactions: the selected episode and
//! the dashboard filter. It is owned by the application state and handed to
//! handlers by reference.

use crate::filter::FilterSelection;
use crate::video::PlayerState;
use log::debug;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Name of the cookie holding the session id.
pub const SESSION_COOKIE: &str = "session";

pub use crate::config::SESSION_DURATION;

/// Values scoped to one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub player: PlayerState,
    /// Stored dashboard filter; `None` means "every observed value"
    pub filter: Option<FilterSelection>,
}

#[derive(Debug)]
struct Session {
    state: SessionState,
    expires_at: SystemTime,
}

/// In-memory session table.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(SESSION_DURATION))
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts a fresh session and returns its id.
    ///
    /// Expired sessions are purged on the way.
    pub fn create(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let now = SystemTime::now();

        let mut sessions = self.write();
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            session_id.clone(),
            Session {
                state: SessionState::default(),
                expires_at: now + self.ttl,
            },
        );
        debug!("created session, {} active", sessions.len());

        session_id
    }

    /// Whether `session_id` names a live session.
    pub fn is_valid(&self, session_id: &str) -> bool {
        self.read()
            .get(session_id)
            .is_some_and(|session| session.expires_at > SystemTime::now())
    }

    /// Snapshot of a live session's state.
    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        self.read()
            .get(session_id)
            .filter(|session| session.expires_at > SystemTime::now())
            .map(|session| session.state.clone())
    }

    /// Applies `update` to a live session's state and returns its result.
    ///
    /// Returns `None` when the session is unknown or expired.
    pub fn update<T>(&self, session_id: &str, update: impl FnOnce(&mut SessionState) -> T) -> Option<T> {
        let now = SystemTime::now();
        let mut sessions = self.write();
        let session = sessions
            .get_mut(session_id)
            .filter(|session| session.expires_at > now)?;
        Some(update(&mut session.state))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
