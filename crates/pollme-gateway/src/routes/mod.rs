//! HTTP route handlers.

pub mod health;
pub mod hierarchy;
pub mod polls;
pub mod reader;
