use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use super::StorageError;
use crate::common::{Message, NewMessage};

/// Append-only in-memory message log.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Mutex<Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message, oldest first. The sort is stable so
    /// messages sharing a timestamp keep their insertion order.
    pub fn get_all_messages(&self) -> Result<Vec<Message>, StorageError> {
        let mut snapshot = self.lock().clone();
        snapshot.sort_by_key(|message| message.timestamp);
        Ok(snapshot)
    }

    pub fn create_message(&self, new_message: &NewMessage) -> Result<Message, StorageError> {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            content: new_message.content.clone(),
            timestamp: Utc::now(),
        };
        self.insert(message.clone())?;
        Ok(message)
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock().len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    pub(crate) fn insert(&self, message: Message) -> Result<(), StorageError> {
        self.lock().push(message);
        Ok(())
    }

    /// A push either happened or it did not, so the log is still consistent
    /// after a writer panicked; keep serving it.
    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(|poisoned| {
            log::warn!("Message log lock was poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}
