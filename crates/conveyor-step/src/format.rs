//! Format step: structure the final output for consumption.

use std::time::Duration;

use chrono::Utc;
use conveyor_task::{StepName, StepResult};
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::failure_injected;

/// Simulated formatting latency.
const FORMAT_LATENCY: Duration = Duration::from_millis(50);

/// Format a payload into the final result envelope.
///
/// Given an upstream error payload (`{"error": ...}`) this still runs
/// and normally succeeds; the failure travels as data under `"data"`.
pub async fn format_result(task_id: &str, payload: &Value) -> StepResult {
  let started = Instant::now();

  tokio::time::sleep(FORMAT_LATENCY).await;

  if failure_injected(payload) {
    warn!(task_id, "format failure injected");
    return StepResult::failed(
      task_id,
      StepName::Format,
      "simulated formatting failure",
      started.elapsed().as_millis() as u64,
    );
  }

  let size = serde_json::to_string(payload).map(|s| s.len()).unwrap_or(0);
  let formatted = json!({
    "summary": {
      "task_id": task_id,
      "completed_at": Utc::now().to_rfc3339(),
      "success": true,
    },
    "data": payload,
    "metadata": {
      "version": "1.0.0",
      "format": "json",
      "size": size,
    },
  });

  debug!(task_id, size, "format completed");

  StepResult::success(
    task_id,
    StepName::Format,
    formatted,
    started.elapsed().as_millis() as u64,
  )
}
