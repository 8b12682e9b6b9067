//! # Configurator Sessions
//!
//! One [`Configurator`] per browser tab, keyed by a random id.
//!
//! ## Thread Safety
//! Sessions live behind a single `Mutex`. Every access is a short,
//! synchronous closure; nothing is awaited while the lock is held.
//!
//! ## Busy Flag
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST …/quote ──► begin_submission() ── busy? ──► 409 BUSY             │
//! │                        │ no                                             │
//! │                        ▼                                                │
//! │                 busy = true, SubmissionGuard                            │
//! │                        │  (relay call, PDF render)                      │
//! │                        ▼                                                │
//! │                 guard dropped ──► busy = false                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use bellows_core::{CatalogOptions, Configurator};

use crate::error::{ApiError, ApiResult};

/// Sessions untouched for this long are dropped when new ones are created.
const IDLE_LIMIT_HOURS: i64 = 24;

#[derive(Debug)]
pub struct ConfiguratorSession {
    pub configurator: Configurator,
    pub busy: bool,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionStore {
    options: CatalogOptions,
    sessions: Mutex<HashMap<Uuid, ConfiguratorSession>>,
}

impl SessionStore {
    pub fn new(options: CatalogOptions) -> Self {
        SessionStore {
            options,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ConfiguratorSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Opens a blank session.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut sessions = self.lock();
        let cutoff = now - Duration::hours(IDLE_LIMIT_HOURS);
        let before = sessions.len();
        sessions.retain(|_, s| s.busy || s.last_seen > cutoff);
        if sessions.len() < before {
            debug!(dropped = before - sessions.len(), "Idle sessions dropped");
        }

        sessions.insert(
            id,
            ConfiguratorSession {
                configurator: Configurator::new(self.options.clone()),
                busy: false,
                last_seen: now,
            },
        );

        info!(session_id = %id, open = sessions.len(), "Configurator session opened");
        id
    }

    /// Runs `f` against a session under the lock.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ConfiguratorSession) -> R,
    ) -> ApiResult<R> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("Session", &id.to_string()))?;
        session.last_seen = Utc::now();
        Ok(f(session))
    }

    pub fn remove(&self, id: Uuid) -> ApiResult<()> {
        self.lock()
            .remove(&id)
            .map(|_| info!(session_id = %id, "Configurator session closed"))
            .ok_or_else(|| ApiError::not_found("Session", &id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marks a session busy for the lifetime of the returned guard.
    ///
    /// ## Returns
    /// * `Err(ErrorCode::Busy)` - a submission is already in flight
    /// * `Err(ErrorCode::NotFound)` - unknown session
    pub fn begin_submission(self: &Arc<Self>, id: Uuid) -> ApiResult<SubmissionGuard> {
        self.with_session(id, |session| {
            if session.busy {
                return Err(ApiError::busy());
            }
            session.busy = true;
            Ok(())
        })??;

        Ok(SubmissionGuard {
            store: Arc::clone(self),
            id,
        })
    }
}

/// Clears the busy flag when dropped, including on early return.
#[derive(Debug)]
pub struct SubmissionGuard {
    store: Arc<SessionStore>,
    id: Uuid,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.store.lock().get_mut(&self.id) {
            session.busy = false;
        }
    }
}
