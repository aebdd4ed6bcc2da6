//! Background tasks for the Parley server.
//!
//! Includes:
//! - Pruning idle session state (conversations and transcript buffers).

use parley_session::{SessionStore, TranscriptAccumulator};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// Starts the session pruning task.
///
/// This task runs indefinitely, periodically dropping conversation
/// histories and transcript buffers that have been idle past their TTL.
/// Without it the session maps grow for the life of the process.
pub async fn start_pruning_task(
    sessions: Arc<SessionStore>,
    transcripts: Arc<TranscriptAccumulator>,
    interval_seconds: u64,
) {
    if interval_seconds == 0 {
        tracing::warn!("session pruning task disabled (interval=0)");
        return;
    }

    let interval = Duration::from_secs(interval_seconds);
    tracing::info!(interval_seconds, "starting session pruning task");

    loop {
        sleep(interval).await;

        let pruned_sessions = sessions.prune_expired();
        let pruned_transcripts = transcripts.prune_expired();

        if pruned_sessions > 0 || pruned_transcripts > 0 {
            tracing::info!(
                sessions = pruned_sessions,
                transcripts = pruned_transcripts,
                "pruned idle session state"
            );
        } else {
            tracing::debug!("no idle session state to prune");
        }
    }
}
