// src/lib.rs
// unity-mover - MQTT move-command bridge with async completion polling

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod background;
pub mod config;
pub mod error;
pub mod mcp;
pub mod messages;
pub mod mover;
pub mod store;
pub mod tools;
pub mod transport;
pub use error::{MoverError, Result};
