// src/tools/mod.rs
// Caller-facing move tools (initiate + status poll)
//
// Tool handlers are free functions over a ToolContext so the MCP server,
// integration tests, and any future CLI dispatcher share one implementation.

use crate::mover::{self, MoveStatus};
use crate::store::CompletionStore;
use crate::transport::CommandPublisher;
use serde_json::json;
use std::sync::Arc;

/// Shared dependencies every tool handler needs
pub trait ToolContext: Send + Sync {
    fn store(&self) -> &Arc<CompletionStore>;
    fn publisher(&self) -> &Arc<dyn CommandPublisher>;
    fn command_topic(&self) -> &str;
}

/// Fire-and-forget move initiation.
///
/// Returns immediately with the minted request id; "success" here means
/// accepted for send, not executed. Completion only ever shows up through
/// `check_move_status`.
pub async fn initiate_object_move<C: ToolContext>(
    ctx: &C,
    object_name: String,
    target_position: Vec<f64>,
    duration: Option<f64>,
) -> Result<String, String> {
    let duration = duration.unwrap_or(2.0);

    let target = match mover::validate_move(&target_position, duration) {
        Ok(target) => target,
        Err(e) => {
            return Ok(json!({
                "status": "error",
                "message": e.to_user_string(),
            })
            .to_string());
        }
    };

    // Validation passed: mint the id and build the payload
    let command = mover::build_command(&object_name, target, duration);
    let payload = serde_json::to_vec(&command).map_err(|e| e.to_string())?;

    if let Err(e) = ctx.publisher().publish(ctx.command_topic(), payload).await {
        // The id was minted but nothing was sent; no completion will ever
        // arrive for it
        return Ok(json!({
            "status": "error",
            "message": format!("failed to publish move command: {}", e.to_user_string()),
        })
        .to_string());
    }

    Ok(json!({
        "status": "success",
        "message": format!(
            "Move command initiated for {} to {:?} over {} seconds.",
            command.object_name, command.target_position, command.duration
        ),
        "object_name": command.object_name,
        "requested_target_position": command.target_position,
        "request_id": command.request_id,
    })
    .to_string())
}

/// Poll a previously initiated move by request id.
///
/// The first poll after completion consumes the record; any later poll for
/// the same id reports in-progress again, the same as an id that never
/// existed.
pub async fn check_move_status<C: ToolContext>(
    ctx: &C,
    request_id: String,
) -> Result<String, String> {
    match mover::poll_status(ctx.store(), &request_id) {
        MoveStatus::Completed(record) => {
            let mut body = match serde_json::to_value(&record).map_err(|e| e.to_string())? {
                serde_json::Value::Object(map) => map,
                _ => serde_json::Map::new(),
            };
            // The response-level status wins over the record's own field
            body.insert("status".to_string(), json!("completed"));
            Ok(serde_json::Value::Object(body).to_string())
        }
        MoveStatus::InProgress => Ok(json!({
            "status": "in_progress",
            "message": format!(
                "Move for request_id {request_id} not yet completed or found."
            ),
        })
        .to_string()),
    }
}
