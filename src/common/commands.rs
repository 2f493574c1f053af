/// Lệnh UI gửi xuống tầng mạng.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Post a new message; the content is already trimmed and non-empty.
    SendMessage(String),
    /// Re-fetch the thread and online count without waiting for the next tick.
    Refresh,
}
