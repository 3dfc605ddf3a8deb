// src/config/mod.rs
// Configuration and shared constants

pub mod env;

pub use env::{BrokerConfig, StoreConfig};
