pub mod api;
pub mod client;

pub use api::{ChatApiClient, ClientError};
pub use client::{DEFAULT_POLL_INTERVAL, PollingClient};
