// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::time::Duration;
use tracing::warn;

pub const DEFAULT_COMMAND_TOPIC: &str = "unity/commands/move";
pub const DEFAULT_FEEDBACK_TOPIC: &str = "unity/feedback/move_complete";

/// MQTT broker connection settings
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Broker hostname (MOVER_BROKER_HOST)
    pub host: String,
    /// Broker port (MOVER_BROKER_PORT)
    pub port: u16,
    /// MQTT client id (MOVER_CLIENT_ID)
    pub client_id: String,
    /// Topic commands are published on (MOVER_COMMAND_TOPIC)
    pub command_topic: String,
    /// Topic completion feedback arrives on (MOVER_FEEDBACK_TOPIC)
    pub feedback_topic: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            client_id: "unity-mover".to_string(),
            command_topic: DEFAULT_COMMAND_TOPIC.to_string(),
            feedback_topic: DEFAULT_FEEDBACK_TOPIC.to_string(),
        }
    }
}

impl BrokerConfig {
    /// Load broker settings from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: read_var("MOVER_BROKER_HOST").unwrap_or(defaults.host),
            port: read_parsed("MOVER_BROKER_PORT").unwrap_or(defaults.port),
            client_id: read_var("MOVER_CLIENT_ID").unwrap_or(defaults.client_id),
            command_topic: read_var("MOVER_COMMAND_TOPIC").unwrap_or(defaults.command_topic),
            feedback_topic: read_var("MOVER_FEEDBACK_TOPIC").unwrap_or(defaults.feedback_topic),
        }
    }
}

/// Correlation store housekeeping settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long an unpolled completion survives (MOVER_COMPLETION_TTL_SECS)
    pub completion_ttl: Duration,
    /// How often the sweeper runs (MOVER_SWEEP_INTERVAL_SECS)
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            completion_ttl: Duration::from_secs(600),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            completion_ttl: read_parsed("MOVER_COMPLETION_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.completion_ttl),
            sweep_interval: read_parsed("MOVER_SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }
}

/// Read an env var, filtering empty values
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an env var, warning (and falling back) on garbage
fn read_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = read_var(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "Unparseable env var, using default");
            None
        }
    }
}
