use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::common::{ClientEvent, Message};

/// How long an error notification stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);
pub const SEND_ERROR_TEXT: &str = "Failed to send message. Please try again.";

/// Transient notification shown after a failed send.
#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub text: String,
    shown_at: Instant,
}

impl Toast {
    pub fn error(text: impl Into<String>, now: Instant) -> Self {
        Self {
            title: "Error".to_string(),
            text: text.into(),
            shown_at: now,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_DURATION
    }
}

/// Trạng thái cục bộ của UI.
#[derive(Debug, Default)]
pub struct AppState {
    pub messages: Vec<Message>,
    /// False until the first successful poll.
    pub loaded: bool,
    pub input_text: String,
    /// A send is in flight; input is locked until it resolves.
    pub sending: bool,
    pub online_count: Option<usize>,
    pub poll_error: Option<String>,
    pub toast: Option<Toast>,
    scroll_pending: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_event(&mut self, event: ClientEvent, now: Instant) {
        match event {
            ClientEvent::MessagesLoaded(messages) => {
                self.loaded = true;
                self.poll_error = None;
                self.set_messages(messages);
            }
            ClientEvent::OnlineCount(count) => self.online_count = Some(count),
            ClientEvent::MessageSent(message) => {
                self.sending = false;
                self.input_text.clear();
                self.push_message(message);
            }
            ClientEvent::SendFailed(reason) => {
                log::debug!("Send failed: {reason}");
                self.sending = false;
                self.toast = Some(Toast::error(SEND_ERROR_TEXT, now));
            }
            ClientEvent::PollFailed(reason) => self.poll_error = Some(reason),
        }
    }

    /// Replace the thread with a fresh poll result. Returns whether anything changed.
    pub fn set_messages(&mut self, messages: Vec<Message>) -> bool {
        let changed = self.messages.len() != messages.len()
            || self
                .messages
                .iter()
                .zip(&messages)
                .any(|(current, incoming)| current.id != incoming.id);

        if changed {
            self.messages = messages;
            self.scroll_pending = true;
        }
        changed
    }

    /// Show our own message right away instead of waiting for the next poll.
    pub fn push_message(&mut self, message: Message) {
        if self.messages.iter().any(|existing| existing.id == message.id) {
            return;
        }
        self.messages.push(message);
        self.messages.sort_by_key(|message| message.timestamp);
        self.scroll_pending = true;
    }

    /// Whether the composer currently holds something sendable.
    pub fn can_send(&self) -> bool {
        !self.sending && !self.input_text.trim().is_empty()
    }

    /// Take the trimmed input for sending and lock the composer. The input
    /// text itself is kept until the server confirms, so a failed send can
    /// be retried.
    pub fn take_submission(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        self.sending = true;
        Some(self.input_text.trim().to_string())
    }

    /// Returns true once after every change to the message list.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.toast = None;
        }
    }
}

/// Short local time, e.g. `3:07 PM`.
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    format_time_in(timestamp, &Local)
}

pub fn format_time_in<Tz: TimeZone>(timestamp: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(zone).format("%-I:%M %p").to_string()
}

/// Purely cosmetic left/right placement derived from the first byte of the
/// id. Chat is anonymous, so this says nothing about who wrote the message.
pub fn is_cosmetically_sent(message_id: &str) -> bool {
    message_id
        .bytes()
        .next()
        .is_some_and(|first| first % 3 == 0)
}
