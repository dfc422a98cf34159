//! Execute step: run the (simulated) tool against parsed data.

use std::time::Duration;

use conveyor_task::{StepName, StepResult};
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::failure_injected;

/// Simulated tool execution latency.
const EXECUTE_LATENCY: Duration = Duration::from_millis(200);

/// Execute the tool with the parsed payload.
///
/// No structural validation: the only failure mode is the injected
/// `should_fail` flag.
pub async fn execute_tool(task_id: &str, payload: &Value) -> StepResult {
  let started = Instant::now();

  tokio::time::sleep(EXECUTE_LATENCY).await;

  if failure_injected(payload) {
    warn!(task_id, "tool execution failure injected");
    return StepResult::failed(
      task_id,
      StepName::Execute,
      "simulated tool execution failure",
      started.elapsed().as_millis() as u64,
    );
  }

  let mut processed = payload.as_object().cloned().unwrap_or_default();
  let items_processed = processed.len();
  processed.insert("processed".to_string(), Value::Bool(true));
  processed.insert(
    "tool_output".to_string(),
    Value::String(format!("processed {} successfully", task_id)),
  );
  processed.insert(
    "metrics".to_string(),
    json!({
      "items_processed": items_processed,
      "processing_ms": EXECUTE_LATENCY.as_millis() as u64,
    }),
  );

  debug!(task_id, items_processed, "tool execution completed");

  StepResult::success(
    task_id,
    StepName::Execute,
    Value::Object(processed),
    started.elapsed().as_millis() as u64,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use conveyor_task::StepStatus;
  use serde_json::json;

  #[tokio::test(start_paused = true)]
  async fn test_execute_transforms_payload() {
    let result = execute_tool("t1", &json!({"message": "hi", "parsed": true})).await;

    assert_eq!(result.status, StepStatus::Success);
    let output = result.output.unwrap();
    assert_eq!(output["processed"], true);
    assert_eq!(output["tool_output"], "processed t1 successfully");
    assert_eq!(output["metrics"]["items_processed"], 2);
  }

  #[tokio::test(start_paused = true)]
  async fn test_execute_honors_failure_flag() {
    let result = execute_tool("t2", &json!({"should_fail": true})).await;

    assert_eq!(result.status, StepStatus::Failed);
    assert_eq!(
      result.error.as_deref(),
      Some("simulated tool execution failure")
    );
  }

  #[tokio::test(start_paused = true)]
  async fn test_execute_accepts_non_object_payload() {
    let result = execute_tool("t3", &json!("raw")).await;

    assert_eq!(result.status, StepStatus::Success);
    assert_eq!(result.output.unwrap()["metrics"]["items_processed"], 0);
  }
}
