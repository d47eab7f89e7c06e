use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDateTime;

use studiobill_core::{DomainError, DomainResult, SessionId, StudioId};
use studiobill_scheduling::{Session, SessionStatus, SessionStore};

use super::poisoned;

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<SessionId, Session>,
    /// Uniqueness index over `(studio, start)`. Kept in the same struct as the
    /// data so both live behind one lock.
    slots: HashMap<(StudioId, NaiveDateTime), SessionId>,
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Inner>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SessionId) -> DomainResult<Option<Session>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.sessions.get(&id).cloned())
    }

    /// Mark a session completed, which makes it billable.
    pub fn complete(&self, id: SessionId) -> DomainResult<Session> {
        self.transition(id, Session::complete)
    }

    pub fn cancel(&self, id: SessionId) -> DomainResult<Session> {
        self.transition(id, Session::cancel)
    }

    pub fn list_by_studio(&self, studio_id: StudioId) -> DomainResult<Vec<Session>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut list: Vec<_> = inner
            .sessions
            .values()
            .filter(|s| s.studio_id == studio_id)
            .cloned()
            .collect();
        list.sort_by_key(|s| s.start);
        Ok(list)
    }

    fn transition(
        &self,
        id: SessionId,
        apply: impl FnOnce(&mut Session) -> DomainResult<()>,
    ) -> DomainResult<Session> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let session = inner.sessions.get_mut(&id).ok_or_else(DomainError::not_found)?;
        apply(session)?;
        Ok(session.clone())
    }
}

impl SessionStore for InMemorySessionStore {
    fn exists(&self, studio_id: StudioId, start: NaiveDateTime) -> DomainResult<bool> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.slots.contains_key(&(studio_id, start)))
    }

    fn insert(&self, session: Session) -> DomainResult<SessionId> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let slot = (session.studio_id, session.start);
        if inner.slots.contains_key(&slot) {
            return Err(DomainError::conflict(format!(
                "session already scheduled at {} for studio {}",
                session.start, session.studio_id
            )));
        }
        let id = session.id;
        inner.slots.insert(slot, id);
        inner.sessions.insert(id, session);
        Ok(id)
    }

    fn list_completed(
        &self,
        studio_id: StudioId,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> DomainResult<Vec<Session>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut list: Vec<_> = inner
            .sessions
            .values()
            .filter(|s| {
                s.studio_id == studio_id
                    && s.status == SessionStatus::Completed
                    && s.start >= range.0
                    && s.start < range.1
            })
            .cloned()
            .collect();
        list.sort_by_key(|s| s.start);
        Ok(list)
    }
}
