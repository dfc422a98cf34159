//! The start/status contract the supervisor depends on.
//!
//! The supervisor only ever sees what these two operations return; the
//! pipeline's internal state is out of reach by construction. The
//! production [`RuntimeClient`] is an explicitly constructed handle over
//! an in-process runtime - no module-level singletons.

use std::sync::Arc;

use async_trait::async_trait;
use conveyor_pipeline::{
  NoopNotifier, PipelineError, PipelineRun, PipelineRuntime, RunNotifier, RunStatus,
};
use conveyor_retry::FaultKind;
use conveyor_task::TaskInput;
use serde::{Deserialize, Serialize};

/// Infrastructure-level fault raised by a client call.
///
/// Subject to the supervision retry policy according to its `kind`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ClientFault {
  pub kind: FaultKind,
  pub message: String,
}

impl ClientFault {
  pub fn transient(message: impl Into<String>) -> Self {
    Self {
      kind: FaultKind::Transient,
      message: message.into(),
    }
  }

  pub fn terminal(message: impl Into<String>) -> Self {
    Self {
      kind: FaultKind::Terminal,
      message: message.into(),
    }
  }
}

/// Outcome of a start-pipeline call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartOutcome {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub run_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl StartOutcome {
  /// The pipeline accepted the task and a run is underway.
  pub fn started(run_id: impl Into<String>) -> Self {
    Self {
      success: true,
      run_id: Some(run_id.into()),
      error: None,
    }
  }

  /// The pipeline rejected the task (business refusal, not a fault).
  pub fn rejected(error: impl Into<String>) -> Self {
    Self {
      success: false,
      run_id: None,
      error: Some(error.into()),
    }
  }
}

/// Status reported by a status call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
  Running,
  Completed,
  Failed,
  Error,
}

/// Outcome of a get-pipeline-status call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutcome {
  pub status: RemoteStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result: Option<PipelineRun>,
}

/// The supervisor's dependency: start a pipeline run, query its status.
#[async_trait]
pub trait PipelineClient: Send + Sync {
  /// Start a pipeline run for the given task.
  async fn start_pipeline(&self, input: &TaskInput) -> Result<StartOutcome, ClientFault>;

  /// Get the current status of a pipeline run.
  async fn pipeline_status(&self, run_id: &str) -> Result<StatusOutcome, ClientFault>;
}

#[async_trait]
impl<C: PipelineClient + ?Sized> PipelineClient for Arc<C> {
  async fn start_pipeline(&self, input: &TaskInput) -> Result<StartOutcome, ClientFault> {
    (**self).start_pipeline(input).await
  }

  async fn pipeline_status(&self, run_id: &str) -> Result<StatusOutcome, ClientFault> {
    (**self).pipeline_status(run_id).await
  }
}

/// Client over an in-process [`PipelineRuntime`].
pub struct RuntimeClient<N: RunNotifier + 'static = NoopNotifier> {
  runtime: Arc<PipelineRuntime<N>>,
}

impl<N: RunNotifier + 'static> RuntimeClient<N> {
  /// Create a client over the given runtime handle.
  pub fn new(runtime: Arc<PipelineRuntime<N>>) -> Self {
    Self { runtime }
  }
}

#[async_trait]
impl<N: RunNotifier + 'static> PipelineClient for RuntimeClient<N> {
  async fn start_pipeline(&self, input: &TaskInput) -> Result<StartOutcome, ClientFault> {
    match self.runtime.submit(input.clone()).await {
      Ok(run_id) => Ok(StartOutcome::started(run_id)),
      // Validation failures are a business refusal the supervisor must
      // see, not a transient fault to retry.
      Err(PipelineError::InvalidInput(e)) => Ok(StartOutcome::rejected(e.to_string())),
      Err(e) => Err(ClientFault::transient(e.to_string())),
    }
  }

  async fn pipeline_status(&self, run_id: &str) -> Result<StatusOutcome, ClientFault> {
    match self.runtime.status(run_id).await {
      Ok(RunStatus::Running) => Ok(StatusOutcome {
        status: RemoteStatus::Running,
        result: None,
      }),
      Ok(RunStatus::Completed(run)) => Ok(StatusOutcome {
        status: RemoteStatus::Completed,
        result: Some(run),
      }),
      Ok(RunStatus::Failed(run)) => Ok(StatusOutcome {
        status: RemoteStatus::Failed,
        result: Some(run),
      }),
      Err(PipelineError::RunNotFound { .. }) => Ok(StatusOutcome {
        status: RemoteStatus::Error,
        result: None,
      }),
      Err(e) => Err(ClientFault::transient(e.to_string())),
    }
  }
}
