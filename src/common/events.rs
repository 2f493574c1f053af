use super::types::Message;

/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    MessagesLoaded(Vec<Message>),
    OnlineCount(usize),
    MessageSent(Message),
    SendFailed(String),
    PollFailed(String),
}
