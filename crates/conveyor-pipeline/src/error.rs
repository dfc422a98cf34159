//! Pipeline error types.

use conveyor_task::{StepName, TaskError};

/// Errors that can occur in the pipeline layer.
///
/// None of these represent a business-level step failure; those are
/// recorded as failed `StepResult`s inside the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
  /// Execution was cancelled.
  #[error("execution cancelled")]
  Cancelled,

  /// Task rejected at ingress, before any run existed.
  #[error(transparent)]
  InvalidInput(#[from] TaskError),

  /// A step invocation faulted and its retry budget is spent.
  #[error("step '{step}' fault: {message}")]
  StepFault { step: StepName, message: String },

  /// The worker capacity queue is closed (runtime shutting down).
  #[error("step dispatch queue closed")]
  QueueClosed,

  /// No run with the given ID exists.
  #[error("run not found: {run_id}")]
  RunNotFound { run_id: String },
}
