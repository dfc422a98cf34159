use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TaskError;

/// The kind of work a task requests.
///
/// Kind selects the pipeline path once at orchestrator entry; it is never
/// re-evaluated mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
  /// Validate and structure the input only.
  Parse,
  /// Full pipeline: parse, execute, format.
  Process,
  /// Format the raw payload only.
  Format,
}

/// A unit of external work submitted for processing.
///
/// Immutable once accepted. The payload is a schema-less JSON document;
/// steps impose no structure beyond what they explicitly require.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
  /// Caller-assigned unique task ID.
  pub id: String,
  /// Task kind, drives pipeline path selection.
  pub kind: TaskKind,
  /// Opaque structured payload.
  pub payload: Map<String, Value>,
}

impl TaskInput {
  /// Validate the structural contract: id, kind and payload all present
  /// and non-empty.
  ///
  /// Kind presence is already guaranteed by the type; this checks the two
  /// fields serde cannot. A task that fails here never reaches an
  /// orchestrator.
  pub fn validate(&self) -> Result<(), TaskError> {
    if self.id.trim().is_empty() {
      return Err(TaskError::MissingField("id"));
    }
    if self.payload.is_empty() {
      return Err(TaskError::EmptyPayload);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn task(id: &str, payload: Value) -> TaskInput {
    TaskInput {
      id: id.to_string(),
      kind: TaskKind::Process,
      payload: payload.as_object().cloned().unwrap_or_default(),
    }
  }

  #[test]
  fn test_valid_input_passes() {
    let input = task("t1", json!({"message": "hi"}));
    assert!(input.validate().is_ok());
  }

  #[test]
  fn test_empty_id_rejected() {
    let input = task("", json!({"message": "hi"}));
    assert_eq!(input.validate(), Err(TaskError::MissingField("id")));
  }

  #[test]
  fn test_whitespace_id_rejected() {
    let input = task("   ", json!({"message": "hi"}));
    assert_eq!(input.validate(), Err(TaskError::MissingField("id")));
  }

  #[test]
  fn test_empty_payload_rejected() {
    let input = task("t3", json!({}));
    assert_eq!(input.validate(), Err(TaskError::EmptyPayload));
  }

  #[test]
  fn test_kind_serializes_snake_case() {
    assert_eq!(
      serde_json::to_string(&TaskKind::Process).unwrap(),
      "\"process\""
    );
    let kind: TaskKind = serde_json::from_str("\"parse\"").unwrap();
    assert_eq!(kind, TaskKind::Parse);
  }
}
