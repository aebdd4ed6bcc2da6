use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

struct BufferEntry {
    text: String,
    touched_at: Instant,
}

/// Per-session live-transcription buffers.
///
/// Each session id owns one accumulating string; recognized fragments
/// are appended whitespace-joined. The lifecycle is deliberately
/// permissive: a buffer is created on first append, so chunks are
/// accepted without a prior [`start`](Self::start), and reads of
/// unknown sessions return an empty string without allocating.
///
/// Uses `std::sync` locks intentionally: the outer map lock guards only
/// brief get/insert/retain operations, and the per-session inner lock
/// serializes read-modify-write appends so two concurrent chunks for
/// the same session cannot lose each other's text. Operations on
/// different sessions never contend past the outer map access.
pub struct TranscriptAccumulator {
    buffers: RwLock<HashMap<String, Arc<Mutex<BufferEntry>>>>,
    ttl: Option<Duration>,
}

impl TranscriptAccumulator {
    /// Creates an accumulator whose buffers expire after `ttl` of
    /// inactivity. `None` disables pruning.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            buffers: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn read_map(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Mutex<BufferEntry>>>> {
        match self.buffers.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("transcript map lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        }
    }

    fn write_map(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Mutex<BufferEntry>>>> {
        match self.buffers.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("transcript map lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        }
    }

    fn entry(&self, session_id: &str) -> Arc<Mutex<BufferEntry>> {
        if let Some(entry) = self.read_map().get(session_id) {
            return Arc::clone(entry);
        }
        let mut map = self.write_map();
        Arc::clone(map.entry(session_id.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(BufferEntry {
                text: String::new(),
                touched_at: Instant::now(),
            }))
        }))
    }

    fn lock_entry(entry: &Mutex<BufferEntry>) -> std::sync::MutexGuard<'_, BufferEntry> {
        match entry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("transcript buffer lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        }
    }

    /// Resets the session's buffer to empty. Destructive: any text
    /// accumulated for that id so far is lost.
    pub fn start(&self, session_id: &str) {
        let entry = self.entry(session_id);
        let mut buffer = Self::lock_entry(&entry);
        buffer.text.clear();
        buffer.touched_at = Instant::now();
    }

    /// Appends a recognized fragment to the session's buffer with a
    /// single-space separator, trimming surrounding whitespace, and
    /// returns the full buffer afterwards. Whitespace-only fragments
    /// leave the buffer untouched.
    ///
    /// At most one append per session id runs at a time; callers that
    /// need fragments in submission order must submit sequentially.
    pub fn append(&self, session_id: &str, fragment: &str) -> String {
        if fragment.trim().is_empty() {
            return self.snapshot(session_id);
        }
        let entry = self.entry(session_id);
        let mut buffer = Self::lock_entry(&entry);
        buffer.text = format!("{} {}", buffer.text, fragment).trim().to_string();
        buffer.touched_at = Instant::now();
        buffer.text.clone()
    }

    /// Returns the session's accumulated transcript, or an empty string
    /// for an unknown session. Does not create a buffer.
    pub fn snapshot(&self, session_id: &str) -> String {
        let entry = match self.read_map().get(session_id) {
            Some(entry) => Arc::clone(entry),
            None => return String::new(),
        };
        let buffer = Self::lock_entry(&entry);
        buffer.text.clone()
    }

    /// Returns the final transcript for the session. Identical to
    /// [`snapshot`](Self::snapshot): the buffer is kept so clients can
    /// re-read it after stopping; TTL pruning reclaims it later.
    pub fn stop(&self, session_id: &str) -> String {
        self.snapshot(session_id)
    }

    /// Number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.read_map().len()
    }

    /// Drops every buffer idle longer than the configured TTL and
    /// returns how many were removed. Returns 0 when pruning is disabled.
    pub fn prune_expired(&self) -> usize {
        let Some(ttl) = self.ttl else { return 0 };
        let now = Instant::now();
        let mut map = self.write_map();
        let before = map.len();
        map.retain(|_, entry| {
            let buffer = Self::lock_entry(entry);
            now.duration_since(buffer.touched_at) <= ttl
        });
        before - map.len()
    }
}
