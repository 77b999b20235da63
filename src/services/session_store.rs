use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use uuid::Uuid;

use super::phrasal_verbs::{DataError, PhrasalVerbEntry};
use super::practice_session::SessionState;

struct SessionSlot {
    state: SessionState,
    last_active: Instant,
}

/// Live practice sessions keyed by id. Each action runs under the lock from
/// start to finish, so a session never observes a half-applied action.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        entries: &[PhrasalVerbEntry],
    ) -> Result<(Uuid, SessionState), DataError> {
        let state = SessionState::start(entries, &mut rand::rng())?;
        let id = Uuid::new_v4();
        self.sessions.lock().insert(
            id,
            SessionSlot {
                state: state.clone(),
                last_active: Instant::now(),
            },
        );
        Ok((id, state))
    }

    /// Run `action` against one session and mark it active. `None` when the
    /// session does not exist.
    pub fn with_session<T>(
        &self,
        id: &Uuid,
        action: impl FnOnce(&mut SessionState) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.lock();
        let slot = sessions.get_mut(id)?;
        slot.last_active = Instant::now();
        Some(action(&mut slot.state))
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.lock().remove(id).is_some()
    }

    pub fn evict_idle(&self, ttl: Duration) -> usize {
        self.evict_idle_at(Instant::now(), ttl)
    }

    fn evict_idle_at(&self, now: Instant, ttl: Duration) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, slot| now.saturating_duration_since(slot.last_active) <= ttl);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
