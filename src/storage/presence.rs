use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::StorageError;

/// Idle window after which a session stops counting as online.
pub const DEFAULT_ONLINE_WINDOW: Duration = Duration::from_secs(30);

/// Tracks which session ids have been active recently.
///
/// Each session maps to a deadline. Touching a session moves its deadline to
/// `now + window`, so repeated touches never accumulate extra time. Expired
/// entries are dropped on every count and by [`PresenceTracker::sweep_expired`].
#[derive(Debug)]
pub struct PresenceTracker {
    window: Duration,
    deadlines: Mutex<HashMap<String, Instant>>,
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ONLINE_WINDOW)
    }
}

impl PresenceTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadlines: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_online_user(&self, session_id: &str) -> Result<(), StorageError> {
        let deadline = Instant::now() + self.window;
        self.lock().insert(session_id.to_string(), deadline);
        Ok(())
    }

    pub fn remove_online_user(&self, session_id: &str) -> Result<(), StorageError> {
        self.lock().remove(session_id);
        Ok(())
    }

    pub fn online_user_count(&self) -> Result<usize, StorageError> {
        let now = Instant::now();
        let mut deadlines = self.lock();
        deadlines.retain(|_, deadline| *deadline > now);
        Ok(deadlines.len())
    }

    /// Drop every expired session and report how many were removed.
    pub fn sweep_expired(&self) -> Result<usize, StorageError> {
        let now = Instant::now();
        let mut deadlines = self.lock();
        let before = deadlines.len();
        deadlines.retain(|_, deadline| *deadline > now);
        Ok(before - deadlines.len())
    }

    /// Entries currently held, expired or not.
    pub fn tracked_sessions(&self) -> Result<usize, StorageError> {
        Ok(self.lock().len())
    }

    /// Every mutation is a single insert/remove/retain, so the table is
    /// usable even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.deadlines.lock().unwrap_or_else(|poisoned| {
            log::warn!("Presence table lock was poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}
