//! Parse step: validate and structure the raw task input.

use std::time::Duration;

use chrono::Utc;
use conveyor_task::{StepName, StepResult, TaskInput};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Simulated parsing latency.
const PARSE_LATENCY: Duration = Duration::from_millis(100);

/// Parse the task input into a structured payload.
///
/// The one step with a structural contract: id and payload must be
/// present and non-empty. A violation is captured as a failed
/// `StepResult` so a bad task cannot crash the orchestrator.
pub async fn parse_task(input: &TaskInput) -> StepResult {
  let started = Instant::now();

  if let Err(e) = input.validate() {
    warn!(task_id = %input.id, error = %e, "parse rejected input");
    return StepResult::failed(
      &input.id,
      StepName::Parse,
      e.to_string(),
      started.elapsed().as_millis() as u64,
    );
  }

  tokio::time::sleep(PARSE_LATENCY).await;

  let mut parsed = input.payload.clone();
  parsed.insert("parsed".to_string(), Value::Bool(true));
  parsed.insert(
    "timestamp".to_string(),
    Value::String(Utc::now().to_rfc3339()),
  );

  debug!(task_id = %input.id, "parse completed");

  StepResult::success(
    &input.id,
    StepName::Parse,
    Value::Object(parsed),
    started.elapsed().as_millis() as u64,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use conveyor_task::{StepStatus, TaskKind};
  use serde_json::json;

  fn task(payload: serde_json::Value) -> TaskInput {
    TaskInput {
      id: "t1".to_string(),
      kind: TaskKind::Process,
      payload: payload.as_object().cloned().unwrap(),
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_parse_structures_payload() {
    let result = parse_task(&task(json!({"message": "hi"}))).await;

    assert_eq!(result.status, StepStatus::Success);
    let output = result.output.unwrap();
    assert_eq!(output["message"], "hi");
    assert_eq!(output["parsed"], true);
    assert!(output["timestamp"].is_string());
  }

  #[tokio::test(start_paused = true)]
  async fn test_parse_fails_on_empty_payload() {
    let result = parse_task(&task(json!({}))).await;

    assert_eq!(result.status, StepStatus::Failed);
    assert!(result.error.unwrap().contains("payload"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_parse_ignores_failure_flag() {
    // The injected failure flag is for execute/format; parse does not
    // inspect it.
    let result = parse_task(&task(json!({"should_fail": true}))).await;

    assert_eq!(result.status, StepStatus::Success);
    assert_eq!(result.output.unwrap()["should_fail"], true);
  }
}
