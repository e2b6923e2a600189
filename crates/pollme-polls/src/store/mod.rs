//! sled-backed storage for polls, choices and votes.

mod config;
mod engine;

pub use config::StoreConfig;
pub use engine::PollStore;
