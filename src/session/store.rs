use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{Session, SessionId};

/// How long an untouched record is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTtl {
    /// Records holding an authenticated operator.
    pub idle: Duration,
    /// Records that never got past `/auth/login`.
    pub pending: Duration,
}

impl Default for SessionTtl {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(24 * 60 * 60),
            pending: Duration::from_secs(10 * 60),
        }
    }
}

struct Entry {
    session: Session,
    last_seen: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: &SessionTtl, now: Instant) -> bool {
        let limit = if self.session.operator().is_some() {
            ttl.idle
        } else {
            ttl.pending
        };
        now.saturating_duration_since(self.last_seen) >= limit
    }
}

/// In-process session records keyed by session id.
///
/// Locks are held only for the map operation itself, never across I/O, so one
/// slow request cannot stall an unrelated session. Every read or write counts
/// as activity; an expired record reads as a fresh anonymous one.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
    ttl: SessionTtl,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: SessionTtl) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub fn ttl(&self) -> SessionTtl {
        self.ttl
    }

    /// The stored record, or an empty one for an unknown or expired id.
    pub async fn get(&self, id: &SessionId) -> Session {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        match sessions.get(id).map(|entry| entry.is_expired(&self.ttl, now)) {
            None => Session::default(),
            Some(true) => {
                sessions.remove(id);
                Session::default()
            }
            Some(false) => sessions
                .get_mut(id)
                .map(|entry| {
                    entry.last_seen = now;
                    entry.session.clone()
                })
                .unwrap_or_default(),
        }
    }

    pub async fn put(&self, id: SessionId, session: Session) {
        let entry = Entry {
            session,
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
    }

    /// Apply `f` to the record in place, creating it if missing. An expired
    /// record is reset before `f` sees it.
    pub async fn update<F, R>(&self, id: SessionId, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(id).or_insert_with(|| Entry {
            session: Session::default(),
            last_seen: now,
        });
        if entry.is_expired(&self.ttl, now) {
            entry.session = Session::default();
        }
        entry.last_seen = now;
        f(&mut entry.session)
    }

    pub async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every expired record. Returns how many went.
    pub async fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(&self.ttl, now));
        before - sessions.len()
    }

    /// Prune on a fixed period until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = every.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.prune_expired().await;
                if evicted > 0 {
                    let remaining = store.len().await;
                    tracing::debug!(evicted, remaining, "expired sessions evicted");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
