use parley_types::Turn;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct SessionEntry {
    turns: Vec<Turn>,
    touched_at: Instant,
}

/// Per-session conversation history.
///
/// Sessions are created lazily on the first appended turn and removed
/// either explicitly via [`clear`](Self::clear) or by TTL pruning.
/// State is process-local: nothing survives a restart.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    /// Creates a store whose sessions expire after `ttl` of inactivity.
    /// `None` disables pruning entirely.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Lock poisoned by a panicked thread. Recover with the
                // poisoned guard — the worst that happens is a partially
                // appended exchange in one session.
                tracing::error!("session store lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        }
    }

    /// Appends one turn to the session's history, creating the session
    /// if it does not exist yet. Refreshes the session's idle clock.
    pub fn append_turn(&self, session_id: &str, turn: Turn) {
        let mut sessions = self.lock();
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                turns: Vec::new(),
                touched_at: Instant::now(),
            });
        entry.turns.push(turn);
        entry.touched_at = Instant::now();
    }

    /// Returns the session's turns in chronological order, or an empty
    /// vector for an unknown session. Never fails.
    pub fn get_history(&self, session_id: &str) -> Vec<Turn> {
        self.lock()
            .get(session_id)
            .map(|entry| entry.turns.clone())
            .unwrap_or_default()
    }

    /// Removes the session's history. No-op for unknown sessions.
    pub fn clear(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    /// Number of sessions currently held.
    pub fn session_count(&self) -> usize {
        self.lock().len()
    }

    /// Drops every session idle longer than the configured TTL and
    /// returns how many were removed. Returns 0 when pruning is disabled.
    pub fn prune_expired(&self) -> usize {
        let Some(ttl) = self.ttl else { return 0 };
        let now = Instant::now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.touched_at) <= ttl);
        before - sessions.len()
    }
}
