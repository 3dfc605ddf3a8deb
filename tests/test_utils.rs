//! Test utilities for unity-mover integration tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use unity_mover::store::CompletionStore;
use unity_mover::tools::ToolContext;
use unity_mover::transport::CommandPublisher;
use unity_mover::{MoverError, Result};

/// Publisher that captures every published message in memory
pub struct CapturingPublisher {
    pub published: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl CommandPublisher for CapturingPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}

/// Publisher that always fails, for transport-error paths
pub struct FailingPublisher;

#[async_trait]
impl CommandPublisher for FailingPublisher {
    async fn publish(&self, _topic: &str, _payload: Vec<u8>) -> Result<()> {
        Err(MoverError::Other("broker unreachable".to_string()))
    }
}

/// Test context that implements ToolContext without a broker
pub struct TestContext {
    store: Arc<CompletionStore>,
    capturing: Arc<CapturingPublisher>,
    publisher: Arc<dyn CommandPublisher>,
}

impl TestContext {
    /// Context whose publisher records messages in memory
    pub fn new() -> Self {
        let capturing = Arc::new(CapturingPublisher {
            published: Mutex::new(Vec::new()),
        });
        Self {
            store: Arc::new(CompletionStore::new()),
            publisher: capturing.clone(),
            capturing,
        }
    }

    /// Context whose publisher fails every publish
    pub fn with_failing_publisher() -> Self {
        let ctx = Self::new();
        Self {
            publisher: Arc::new(FailingPublisher),
            ..ctx
        }
    }

    pub fn store(&self) -> &Arc<CompletionStore> {
        &self.store
    }

    /// Messages captured by the in-memory publisher
    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.capturing.published.lock().unwrap().clone()
    }
}

impl ToolContext for TestContext {
    fn store(&self) -> &Arc<CompletionStore> {
        &self.store
    }

    fn publisher(&self) -> &Arc<dyn CommandPublisher> {
        &self.publisher
    }

    fn command_topic(&self) -> &str {
        "unity/commands/move"
    }
}
