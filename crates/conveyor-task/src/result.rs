use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
  Success,
  Failed,
}

/// Which unit-of-work operation produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
  Parse,
  Execute,
  Format,
}

impl std::fmt::Display for StepName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      StepName::Parse => write!(f, "parse"),
      StepName::Execute => write!(f, "execute"),
      StepName::Format => write!(f, "format"),
    }
  }
}

/// Result of one unit-of-work invocation.
///
/// Created by the step, never mutated, appended to the run's result
/// sequence in invocation order. A failed step is ordinary data here,
/// not an error: business failures travel through the sequence, only
/// execution faults travel through `Result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
  /// Originating task ID.
  pub task_id: String,
  /// The operation that ran.
  pub step: StepName,
  pub status: StepStatus,
  /// Output payload on success.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output: Option<Value>,
  /// Human-readable message on failure.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Elapsed execution time in milliseconds.
  pub elapsed_ms: u64,
}

impl StepResult {
  /// Build a success result.
  pub fn success(
    task_id: impl Into<String>,
    step: StepName,
    output: Value,
    elapsed_ms: u64,
  ) -> Self {
    Self {
      task_id: task_id.into(),
      step,
      status: StepStatus::Success,
      output: Some(output),
      error: None,
      elapsed_ms,
    }
  }

  /// Build a failure result.
  pub fn failed(
    task_id: impl Into<String>,
    step: StepName,
    error: impl Into<String>,
    elapsed_ms: u64,
  ) -> Self {
    Self {
      task_id: task_id.into(),
      step,
      status: StepStatus::Failed,
      output: None,
      error: Some(error.into()),
      elapsed_ms,
    }
  }

  pub fn is_failed(&self) -> bool {
    self.status == StepStatus::Failed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_success_result_shape() {
    let result = StepResult::success("t1", StepName::Parse, json!({"parsed": true}), 100);
    assert_eq!(result.status, StepStatus::Success);
    assert!(!result.is_failed());
    assert!(result.error.is_none());
    assert_eq!(result.output.unwrap()["parsed"], true);
  }

  #[test]
  fn test_failed_result_shape() {
    let result = StepResult::failed("t1", StepName::Execute, "boom", 42);
    assert!(result.is_failed());
    assert!(result.output.is_none());
    assert_eq!(result.error.as_deref(), Some("boom"));
  }

  #[test]
  fn test_failure_serializes_without_output() {
    let result = StepResult::failed("t1", StepName::Format, "nope", 5);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("output").is_none());
    assert_eq!(json["status"], "failed");
    assert_eq!(json["step"], "format");
  }
}
