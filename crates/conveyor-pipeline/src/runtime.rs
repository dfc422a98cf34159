//! Pipeline runtime.
//!
//! The `PipelineRuntime` owns the run registry and the worker-capacity
//! ceiling. It exposes the two boundary operations callers get: submit a
//! task (returns an opaque run id immediately, the run proceeds
//! asynchronously) and query a run's status.

use std::collections::HashMap;
use std::sync::Arc;

use conveyor_retry::RetryPolicy;
use conveyor_task::TaskInput;
use tokio::sync::{RwLock, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::PipelineError;
use crate::events::{NoopNotifier, RunNotifier};
use crate::executor::{SimulatedExecutor, StepExecutor};
use crate::orchestrator::Orchestrator;
use crate::run::{PipelineStatus, RunStatus};

/// Configuration for the pipeline runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
  /// Ceiling on step invocations in flight across all runs.
  pub max_concurrent_steps: usize,
  /// Retry policy applied around every step invocation.
  pub step_retry: RetryPolicy,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      max_concurrent_steps: 10,
      step_retry: RetryPolicy::pipeline_step(),
    }
  }
}

/// The pipeline runtime.
///
/// Each submitted task gets its own orchestrator instance; instances
/// share no mutable state beyond the registry entry they own. One run id
/// maps to exactly one live execution.
pub struct PipelineRuntime<N: RunNotifier = NoopNotifier> {
  orchestrator: Arc<Orchestrator<N>>,
  runs: Arc<RwLock<HashMap<String, RunStatus>>>,
  capacity: Arc<Semaphore>,
  cancel: CancellationToken,
}

impl PipelineRuntime<NoopNotifier> {
  /// Create a runtime backed by the simulated step functions, with
  /// no-op notifications.
  pub fn new(config: RuntimeConfig) -> Self {
    Self::with_notifier(config, Arc::new(SimulatedExecutor), NoopNotifier)
  }
}

impl<N: RunNotifier + 'static> PipelineRuntime<N> {
  /// Create a runtime with a custom step executor and notifier.
  pub fn with_notifier(
    config: RuntimeConfig,
    executor: Arc<dyn StepExecutor>,
    notifier: N,
  ) -> Self {
    let capacity = Arc::new(Semaphore::new(config.max_concurrent_steps));
    let orchestrator = Arc::new(Orchestrator::with_notifier(
      executor,
      config.step_retry,
      capacity.clone(),
      notifier,
    ));

    Self {
      orchestrator,
      runs: Arc::new(RwLock::new(HashMap::new())),
      capacity,
      cancel: CancellationToken::new(),
    }
  }

  /// Submit a task for execution.
  ///
  /// Validates at ingress: a malformed task is rejected here and never
  /// becomes a run. On success the run id is returned immediately and
  /// the run proceeds asynchronously.
  pub async fn submit(&self, input: TaskInput) -> Result<String, PipelineError> {
    input.validate()?;

    let run_id = uuid::Uuid::new_v4().to_string();
    self
      .runs
      .write()
      .await
      .insert(run_id.clone(), RunStatus::Running);

    info!(run_id = %run_id, task_id = %input.id, "run submitted");

    let orchestrator = self.orchestrator.clone();
    let runs = self.runs.clone();
    let cancel = self.cancel.child_token();
    let id = run_id.clone();

    tokio::spawn(async move {
      let run = orchestrator.run(&id, &input, &cancel).await;
      let status = match run.status {
        PipelineStatus::Completed => RunStatus::Completed(run),
        PipelineStatus::Failed => RunStatus::Failed(run),
      };
      runs.write().await.insert(id, status);
    });

    Ok(run_id)
  }

  /// Query a run's status.
  ///
  /// Returns a snapshot; terminal runs are immutable, so repeated
  /// queries return the identical aggregate without re-execution.
  pub async fn status(&self, run_id: &str) -> Result<RunStatus, PipelineError> {
    self
      .runs
      .read()
      .await
      .get(run_id)
      .cloned()
      .ok_or_else(|| PipelineError::RunNotFound {
        run_id: run_id.to_string(),
      })
  }

  /// Cancel all in-flight runs and stop step dispatch (process shutdown).
  ///
  /// In-flight runs finalize as failed at their next step boundary:
  /// either the cancellation check or, for a step already queued on
  /// worker capacity, the closed semaphore.
  pub fn shutdown(&self) {
    self.cancel.cancel();
    self.capacity.close();
  }
}
