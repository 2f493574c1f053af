//! Anonymous polling chat: an in-memory REST API and a desktop client that
//! polls it.

pub mod common;
pub mod config;
pub mod network;
pub mod server;
pub mod storage;
pub mod ui;
