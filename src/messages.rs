// src/messages.rs
// Wire types for the command and feedback topics

use serde::{Deserialize, Serialize};

/// Outbound move command, published on the command topic.
///
/// Field names match what the scene-side consumer expects; `request_id` is
/// the correlation key echoed back in the completion feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCommand {
    pub object_name: String,
    pub target_position: [f64; 3],
    pub duration: f64,
    pub request_id: String,
}

/// Inbound completion feedback, received on the feedback topic.
///
/// Only `request_id` is required for correlation; everything else is
/// outcome data reported by the scene. Unknown fields are preserved in
/// `extra` so the poller can hand them back verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCompletion {
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MoveCompletion {
    /// Whether the payload carried a usable correlation key
    pub fn has_request_id(&self) -> bool {
        !self.request_id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_round_trip() {
        let cmd = MoveCommand {
            object_name: "Cube".to_string(),
            target_position: [0.0, 5.0, 0.0],
            duration: 3.0,
            request_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"object_name\":\"Cube\""));
        assert!(json.contains("\"request_id\":\"abc-123\""));

        let back: MoveCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target_position, [0.0, 5.0, 0.0]);
        assert_eq!(back.duration, 3.0);
    }

    #[test]
    fn test_completion_minimal_payload() {
        let fb: MoveCompletion = serde_json::from_str(r#"{"request_id":"r1"}"#).unwrap();
        assert!(fb.has_request_id());
        assert!(fb.object_name.is_none());
        assert!(fb.final_position.is_none());
    }

    #[test]
    fn test_completion_missing_request_id() {
        let fb: MoveCompletion =
            serde_json::from_str(r#"{"object_name":"Cube","status":"success"}"#).unwrap();
        assert!(!fb.has_request_id());
    }

    #[test]
    fn test_completion_blank_request_id() {
        let fb: MoveCompletion = serde_json::from_str(r#"{"request_id":"   "}"#).unwrap();
        assert!(!fb.has_request_id());
    }

    #[test]
    fn test_completion_preserves_unknown_fields() {
        let fb: MoveCompletion = serde_json::from_str(
            r#"{"request_id":"r2","final_position":[1.0,2.0,3.0],"collision_count":2}"#,
        )
        .unwrap();
        assert_eq!(fb.final_position, Some([1.0, 2.0, 3.0]));
        assert_eq!(
            fb.extra.get("collision_count"),
            Some(&serde_json::json!(2))
        );

        // And they survive re-serialization
        let json = serde_json::to_string(&fb).unwrap();
        assert!(json.contains("collision_count"));
    }
}
