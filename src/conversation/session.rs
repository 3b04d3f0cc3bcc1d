//! Session store for browser chat sessions.
//!
//! Each browser tab owns one session, identified by a UUID it receives when
//! it first loads the page. The session carries that tab's transcript.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::conversation::Conversation;

/// A single interactive session.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub conversation: Conversation,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active_at: now,
            conversation: Conversation::new(),
        }
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps session IDs to their sessions.
///
/// A session is locked for the whole of one interaction, so requests within
/// a session are handled one at a time. Sessions that browsers abandon
/// without ending them are dropped by [`SessionStore::prune_stale_sessions`].
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new, empty session.
    pub async fn create(&self) -> (Uuid, Arc<Mutex<Session>>) {
        let session = Session::new();
        let id = session.id;
        let session = Arc::new(Mutex::new(session));

        self.sessions
            .write()
            .await
            .insert(id, Arc::clone(&session));

        tracing::debug!(session_id = %id, "Session created");
        (id, session)
    }

    /// Look up an existing session.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).map(Arc::clone)
    }

    /// End a session, dropping its transcript. Returns whether it existed.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove sessions that have been idle for longer than `max_idle`.
    ///
    /// Sessions locked by an in-flight request are skipped. Returns the
    /// number of sessions pruned.
    pub async fn prune_stale_sessions(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - TimeDelta::seconds(max_idle.as_secs() as i64);

        let stale: Vec<Uuid> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .filter_map(|(id, session)| {
                    let session = session.try_lock().ok()?;
                    (session.last_active_at < cutoff).then_some(*id)
                })
                .collect()
        };

        if stale.is_empty() {
            return 0;
        }

        let count = {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            for id in &stale {
                sessions.remove(id);
            }
            before - sessions.len()
        };

        if count > 0 {
            tracing::info!(
                "Pruned {} stale session(s) (idle > {}s)",
                count,
                max_idle.as_secs()
            );
        }

        count
    }

    /// Prune idle sessions every `every` until the returned task is aborted.
    pub fn spawn_pruner(self: Arc<Self>, max_idle: Duration, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                self.prune_stale_sessions(max_idle).await;
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
