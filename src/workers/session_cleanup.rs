use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::services::session_store::SessionStore;

pub fn evict_idle_sessions(sessions: &SessionStore, idle_ttl: Duration) -> usize {
    let start = Instant::now();
    debug!("Starting session cleanup cycle");

    let evicted = sessions.evict_idle(idle_ttl);
    if evicted > 0 {
        info!(
            expired_sessions = evicted,
            remaining = sessions.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Session cleanup completed"
        );
    }
    evicted
}
