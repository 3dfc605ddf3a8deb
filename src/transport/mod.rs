// src/transport/mod.rs
// MQTT transport adapter: outbound command publishes plus the background
// feedback subscription that feeds the correlation store.

use crate::config::BrokerConfig;
use crate::error::{MoverError, Result};
use crate::messages::MoveCompletion;
use crate::store::CompletionStore;
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Seam between the command initiator and the broker connection.
///
/// Tool code publishes through this trait so tests can swap in a capturing
/// fake without a broker.
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;
}

/// Live MQTT connection. Publishing goes through the shared client; the
/// feedback subscription runs on its own task owning the event loop.
pub struct MqttTransport {
    client: AsyncClient,
}

impl MqttTransport {
    /// Open the broker connection and spawn the feedback loop.
    ///
    /// The returned handle resolves when the loop exits (shutdown signal).
    /// The event loop reconnects on its own; the loop resubscribes on every
    /// ConnAck so feedback keeps flowing after a broker restart.
    pub fn connect(
        config: &BrokerConfig,
        store: Arc<CompletionStore>,
        shutdown: watch::Receiver<bool>,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let mut options =
            MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, event_loop) = AsyncClient::new(options, 32);
        info!(
            host = %config.host,
            port = config.port,
            "Connecting to MQTT broker"
        );

        let handle = tokio::spawn(run_feedback_loop(
            event_loop,
            client.clone(),
            config.feedback_topic.clone(),
            store,
            shutdown,
        ));

        (Arc::new(Self { client }), handle)
    }
}

#[async_trait]
impl CommandPublisher for MqttTransport {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(MoverError::from)
    }
}

/// Drive the MQTT event loop: resubscribe on connect, record completions,
/// drop everything malformed.
async fn run_feedback_loop(
    mut event_loop: EventLoop,
    client: AsyncClient,
    feedback_topic: String,
    store: Arc<CompletionStore>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = event_loop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!(topic = %feedback_topic, "Connected, subscribing to feedback topic");
                    if let Err(e) = client.subscribe(&feedback_topic, QoS::AtLeastOnce).await {
                        warn!("Failed to subscribe to feedback topic: {}", e);
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    handle_feedback(&feedback_topic, &publish.topic, &publish.payload, &store);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("MQTT connection error: {}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            },
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("Feedback loop shutting down");
                    break;
                }
            }
        }
    }
}

/// Record one inbound feedback message, or log why it was dropped.
///
/// Holds no lock across I/O: decoding happens first, the store insert is a
/// single guarded map write.
fn handle_feedback(
    feedback_topic: &str,
    topic: &str,
    payload: &[u8],
    store: &CompletionStore,
) {
    if topic != feedback_topic {
        debug!(topic = %topic, "Ignoring message on unhandled topic");
        return;
    }
    match decode_feedback(payload) {
        Ok(completion) => {
            info!(request_id = %completion.request_id, "Recorded move completion");
            store.record_completion(completion);
        }
        Err(e) => {
            // Malformed feedback never reaches the store or the caller
            warn!("Dropping feedback message: {}", e);
        }
    }
}

/// Decode a feedback payload, rejecting anything without a usable
/// correlation key.
fn decode_feedback(payload: &[u8]) -> Result<MoveCompletion> {
    let completion: MoveCompletion = serde_json::from_slice(payload)?;
    if !completion.has_request_id() {
        return Err(MoverError::MalformedFeedback(
            "payload has no request_id".to_string(),
        ));
    }
    Ok(completion)
}
