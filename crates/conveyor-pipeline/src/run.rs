//! Run aggregate types.

use chrono::{DateTime, Utc};
use conveyor_task::StepResult;
use serde::{Deserialize, Serialize};

/// Terminal status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
  Completed,
  Failed,
}

impl PipelineStatus {
  /// Reduce a result sequence: failed iff any step failed.
  pub fn from_results(results: &[StepResult]) -> Self {
    if results.iter().any(StepResult::is_failed) {
      PipelineStatus::Failed
    } else {
      PipelineStatus::Completed
    }
  }
}

/// The aggregate state of one finalized pipeline run.
///
/// Owned by the orchestrator instance that produced it; callers only
/// ever see snapshots through the status query. The result sequence is
/// in execution order and never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
  pub task_id: String,
  pub results: Vec<StepResult>,
  pub status: PipelineStatus,
  /// Wall-clock from orchestrator entry to finalization.
  pub total_elapsed_ms: u64,
  pub started_at: DateTime<Utc>,
  pub completed_at: DateTime<Utc>,
}

/// Snapshot view of a run as returned by the status query.
///
/// Terminal snapshots are immutable: repeated queries on a terminal run
/// return the identical aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "run", rename_all = "snake_case")]
pub enum RunStatus {
  Running,
  Completed(PipelineRun),
  Failed(PipelineRun),
}

impl RunStatus {
  pub fn is_terminal(&self) -> bool {
    !matches!(self, RunStatus::Running)
  }

  /// The finalized run, if terminal.
  pub fn run(&self) -> Option<&PipelineRun> {
    match self {
      RunStatus::Running => None,
      RunStatus::Completed(run) | RunStatus::Failed(run) => Some(run),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use conveyor_task::StepName;
  use serde_json::json;

  #[test]
  fn test_status_reduction_all_success() {
    let results = vec![
      StepResult::success("t1", StepName::Parse, json!({}), 1),
      StepResult::success("t1", StepName::Execute, json!({}), 1),
    ];
    assert_eq!(
      PipelineStatus::from_results(&results),
      PipelineStatus::Completed
    );
  }

  #[test]
  fn test_status_reduction_any_failure() {
    let results = vec![
      StepResult::success("t1", StepName::Parse, json!({}), 1),
      StepResult::failed("t1", StepName::Execute, "boom", 1),
      StepResult::success("t1", StepName::Format, json!({}), 1),
    ];
    assert_eq!(
      PipelineStatus::from_results(&results),
      PipelineStatus::Failed
    );
  }

  #[test]
  fn test_empty_sequence_is_completed() {
    assert_eq!(PipelineStatus::from_results(&[]), PipelineStatus::Completed);
  }
}
