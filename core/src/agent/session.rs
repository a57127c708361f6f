use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One bounded auto-accept window. Created on enable, replaced on reset,
/// never persisted across process restarts.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub accept_count: u32,
    pub active: bool,
}

impl Session {
    pub fn new(active: bool) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            accept_count: 0,
            active,
        }
    }

    /// Expired sessions accept nothing more, regardless of `active`.
    pub fn is_expired(&self, timeout_secs: u64, now: DateTime<Utc>) -> bool {
        let elapsed = (now - self.started_at).num_seconds();
        elapsed > timeout_secs as i64
    }

    pub fn time_remaining_secs(&self, timeout_secs: u64, now: DateTime<Utc>) -> u64 {
        let elapsed = (now - self.started_at).num_seconds().max(0) as u64;
        timeout_secs.saturating_sub(elapsed)
    }
}
