//! The supervisor's outward-facing terminal state.

use conveyor_pipeline::PipelineRun;
use serde::{Deserialize, Serialize};

/// Final outcome of one supervision, built exactly once at a terminal
/// state and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisionEnvelope {
  pub success: bool,
  /// The started pipeline's run id, once known.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub run_id: Option<String>,
  /// Copy of the terminal pipeline result, on success.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result: Option<PipelineRun>,
  /// Failure reason, on failure or timeout.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl SupervisionEnvelope {
  /// The pipeline completed; carry the retrieved result.
  pub fn completed(run_id: impl Into<String>, result: Option<PipelineRun>) -> Self {
    Self {
      success: true,
      run_id: Some(run_id.into()),
      result,
      error: None,
    }
  }

  /// Supervision failed, before or after a run was started.
  pub fn failed(run_id: Option<String>, error: impl Into<String>) -> Self {
    Self {
      success: false,
      run_id,
      result: None,
      error: Some(error.into()),
    }
  }

  /// The poll budget was exhausted while the run was still going.
  pub fn timed_out(run_id: impl Into<String>) -> Self {
    Self {
      success: false,
      run_id: Some(run_id.into()),
      result: None,
      error: Some("pipeline polling timed out".to_string()),
    }
  }
}
