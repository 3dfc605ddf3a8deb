// src/mover.rs
// Move-command core: validation, id minting, and status mapping

use crate::error::{MoverError, Result};
use crate::messages::{MoveCommand, MoveCompletion};
use crate::store::CompletionStore;
use uuid::Uuid;

/// Outcome of a status poll.
///
/// `InProgress` deliberately collapses "still running", "unknown id", and
/// "already consumed" - the store keeps no record of pending or consumed
/// ids, so they are indistinguishable by design.
#[derive(Debug, Clone)]
pub enum MoveStatus {
    Completed(MoveCompletion),
    InProgress,
}

/// Validate initiator arguments, returning the position as a fixed array.
///
/// Rejections happen before any identifier is minted or anything is
/// published.
pub fn validate_move(target_position: &[f64], duration: f64) -> Result<[f64; 3]> {
    if target_position.len() != 3 {
        return Err(MoverError::InvalidInput(format!(
            "target_position must have exactly 3 components, got {}",
            target_position.len()
        )));
    }
    if target_position.iter().any(|c| !c.is_finite()) {
        return Err(MoverError::InvalidInput(
            "target_position components must be finite numbers".to_string(),
        ));
    }
    if !duration.is_finite() || duration <= 0.0 {
        return Err(MoverError::InvalidInput(format!(
            "duration must be a positive number, got {duration}"
        )));
    }
    Ok([target_position[0], target_position[1], target_position[2]])
}

/// Mint a fresh correlation id and build the command payload around it.
pub fn build_command(object_name: &str, target_position: [f64; 3], duration: f64) -> MoveCommand {
    MoveCommand {
        object_name: object_name.to_string(),
        target_position,
        duration,
        request_id: Uuid::new_v4().to_string(),
    }
}

/// Map the store's consume-on-read result to a caller-facing status.
pub fn poll_status(store: &CompletionStore, request_id: &str) -> MoveStatus {
    match store.take_if_completed(request_id) {
        Some(completion) => MoveStatus::Completed(completion),
        None => MoveStatus::InProgress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_validate_accepts_good_input() {
        let pos = validate_move(&[0.0, 5.0, 0.0], 3.0).unwrap();
        assert_eq!(pos, [0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_validate_rejects_wrong_arity() {
        assert!(validate_move(&[1.0, 2.0], 1.0).is_err());
        assert!(validate_move(&[1.0, 2.0, 3.0, 4.0], 1.0).is_err());
        assert!(validate_move(&[], 1.0).is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_components() {
        assert!(validate_move(&[f64::NAN, 0.0, 0.0], 1.0).is_err());
        assert!(validate_move(&[0.0, f64::INFINITY, 0.0], 1.0).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_duration() {
        assert!(validate_move(&[0.0, 0.0, 0.0], 0.0).is_err());
        assert!(validate_move(&[0.0, 0.0, 0.0], -2.5).is_err());
        assert!(validate_move(&[0.0, 0.0, 0.0], f64::NAN).is_err());
    }

    #[test]
    fn test_build_command_mints_unique_ids() {
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let cmd = build_command("Cube", [1.0, 2.0, 3.0], 2.0);
            assert!(!cmd.request_id.is_empty());
            assert!(seen.insert(cmd.request_id), "request_id reused");
        }
    }

    #[test]
    fn test_poll_status_pending_then_completed_then_consumed() {
        let store = CompletionStore::new();
        let cmd = build_command("Cube", [0.0, 5.0, 0.0], 3.0);

        assert!(matches!(
            poll_status(&store, &cmd.request_id),
            MoveStatus::InProgress
        ));

        store.record_completion(MoveCompletion {
            request_id: cmd.request_id.clone(),
            object_name: Some("Cube".to_string()),
            final_position: Some([0.0, 5.0, 0.0]),
            status: Some("success".to_string()),
            timestamp: None,
            extra: serde_json::Map::new(),
        });

        match poll_status(&store, &cmd.request_id) {
            MoveStatus::Completed(record) => {
                assert_eq!(record.final_position, Some([0.0, 5.0, 0.0]));
            }
            MoveStatus::InProgress => panic!("expected completed"),
        }

        // Consumed: back to in-progress, indistinguishable from pending
        assert!(matches!(
            poll_status(&store, &cmd.request_id),
            MoveStatus::InProgress
        ));
    }
}
