pub mod message_store;
pub mod presence;

use std::time::Duration;

use thiserror::Error;

use crate::common::{Message, NewMessage};

pub use message_store::MessageStore;
pub use presence::{DEFAULT_ONLINE_WINDOW, PresenceTracker};

/// Failure of a storage backend. The in-memory store never produces one;
/// the variant exists for backends that can fail per call.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} storage unavailable")]
    Unavailable(&'static str),
}

/// Storage backend used by the HTTP layer.
pub trait ChatStorage: Send + Sync {
    fn get_all_messages(&self) -> Result<Vec<Message>, StorageError>;
    fn create_message(&self, new_message: &NewMessage) -> Result<Message, StorageError>;
    fn add_online_user(&self, session_id: &str) -> Result<(), StorageError>;
    fn remove_online_user(&self, session_id: &str) -> Result<(), StorageError>;
    fn online_user_count(&self) -> Result<usize, StorageError>;
    fn sweep_expired(&self) -> Result<usize, StorageError>;
}

/// Volatile storage: everything lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemStorage {
    messages: MessageStore,
    presence: PresenceTracker,
}

impl MemStorage {
    pub fn new(online_window: Duration) -> Self {
        Self {
            messages: MessageStore::new(),
            presence: PresenceTracker::new(online_window),
        }
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }
}

impl ChatStorage for MemStorage {
    fn get_all_messages(&self) -> Result<Vec<Message>, StorageError> {
        self.messages.get_all_messages()
    }

    fn create_message(&self, new_message: &NewMessage) -> Result<Message, StorageError> {
        self.messages.create_message(new_message)
    }

    fn add_online_user(&self, session_id: &str) -> Result<(), StorageError> {
        self.presence.add_online_user(session_id)
    }

    fn remove_online_user(&self, session_id: &str) -> Result<(), StorageError> {
        self.presence.remove_online_user(session_id)
    }

    fn online_user_count(&self) -> Result<usize, StorageError> {
        self.presence.online_user_count()
    }

    fn sweep_expired(&self) -> Result<usize, StorageError> {
        self.presence.sweep_expired()
    }
}
