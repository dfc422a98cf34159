//! The pipeline orchestrator state machine.

use std::sync::Arc;

use chrono::Utc;
use conveyor_retry::{RetryPolicy, retry};
use conveyor_task::{StepName, StepResult, TaskInput};
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::error::PipelineError;
use crate::events::{NoopNotifier, RunEvent, RunNotifier};
use crate::executor::{StepExecutor, StepFault};
use crate::path::PipelinePath;
use crate::run::{PipelineRun, PipelineStatus};

/// Sequences unit-of-work steps for one task.
///
/// The path through the state machine is a pure function of the task
/// kind, decided once at entry. Every step invocation goes through the
/// retry policy and the shared worker-capacity semaphore.
///
/// Generic over `N: RunNotifier` to allow different observation
/// strategies. Use [`Orchestrator::new`] for a default orchestrator with
/// no-op notifications, or [`Orchestrator::with_notifier`] to provide a
/// custom notifier.
pub struct Orchestrator<N: RunNotifier = NoopNotifier> {
  executor: Arc<dyn StepExecutor>,
  policy: RetryPolicy,
  capacity: Arc<Semaphore>,
  notifier: N,
}

impl Orchestrator<NoopNotifier> {
  /// Create an orchestrator with no-op notifications.
  pub fn new(
    executor: Arc<dyn StepExecutor>,
    policy: RetryPolicy,
    capacity: Arc<Semaphore>,
  ) -> Self {
    Self::with_notifier(executor, policy, capacity, NoopNotifier)
  }
}

impl<N: RunNotifier> Orchestrator<N> {
  /// Create an orchestrator with a custom notifier.
  pub fn with_notifier(
    executor: Arc<dyn StepExecutor>,
    policy: RetryPolicy,
    capacity: Arc<Semaphore>,
    notifier: N,
  ) -> Self {
    Self {
      executor,
      policy,
      capacity,
      notifier,
    }
  }

  /// Run the pipeline for one task to a finalized [`PipelineRun`].
  ///
  /// Always returns a terminal run. An execution fault anywhere in the
  /// path (retry exhaustion, cancellation) finalizes the run as failed
  /// with whatever partial results had accumulated; it is never
  /// propagated raw to the caller.
  #[instrument(
    name = "pipeline_run",
    skip(self, run_id, input, cancel),
    fields(run_id = %run_id, task_id = %input.id)
  )]
  pub async fn run(
    &self,
    run_id: &str,
    input: &TaskInput,
    cancel: &CancellationToken,
  ) -> PipelineRun {
    let entered = Instant::now();
    let started_at = Utc::now();
    let path = PipelinePath::for_kind(input.kind);

    info!(kind = ?input.kind, path = ?path, "run started");
    self.notifier.notify(RunEvent::RunStarted {
      run_id: run_id.to_string(),
      task_id: input.id.clone(),
    });

    let mut results = Vec::new();
    let outcome = self.run_path(path, run_id, input, &mut results, cancel).await;

    let status = match outcome {
      Ok(()) => PipelineStatus::from_results(&results),
      Err(e) => {
        error!(error = %e, "run faulted, finalizing with partial results");
        PipelineStatus::Failed
      }
    };

    info!(status = ?status, steps = results.len(), "run finalized");
    self.notifier.notify(RunEvent::RunFinalized {
      run_id: run_id.to_string(),
      status,
    });

    PipelineRun {
      task_id: input.id.clone(),
      results,
      status,
      total_elapsed_ms: entered.elapsed().as_millis() as u64,
      started_at,
      completed_at: Utc::now(),
    }
  }

  /// Walk the selected path, appending results in invocation order.
  ///
  /// Returns `Err` only for execution faults; business failures land in
  /// `results` and terminate paths through the fail-fast rule.
  async fn run_path(
    &self,
    path: PipelinePath,
    run_id: &str,
    input: &TaskInput,
    results: &mut Vec<StepResult>,
    cancel: &CancellationToken,
  ) -> Result<(), PipelineError> {
    match path {
      PipelinePath::ParseOnly => {
        let parsed = self
          .invoke_step(run_id, StepName::Parse, cancel, || self.executor.parse(input))
          .await?;
        results.push(parsed);
      }

      PipelinePath::FormatOnly => {
        let raw = Value::Object(input.payload.clone());
        let formatted = self
          .invoke_step(run_id, StepName::Format, cancel, || {
            self.executor.format(&input.id, &raw)
          })
          .await?;
        results.push(formatted);
      }

      PipelinePath::Full => {
        let parsed = self
          .invoke_step(run_id, StepName::Parse, cancel, || self.executor.parse(input))
          .await?;
        let parse_output = parsed.output.clone();
        let parse_failed = parsed.is_failed();
        results.push(parsed);

        // Fail fast: execute and format are never invoked.
        if parse_failed {
          info!("parse failed, short-circuiting run");
          return Ok(());
        }

        let parsed_payload = parse_output.unwrap_or(Value::Null);
        let executed = self
          .invoke_step(run_id, StepName::Execute, cancel, || {
            self.executor.execute(&input.id, &parsed_payload)
          })
          .await?;

        // Format always runs: on execute failure it is given an error
        // payload so the failure surfaces through the normal path.
        let format_input = if executed.is_failed() {
          json!({ "error": executed.error.clone().unwrap_or_default() })
        } else {
          executed.output.clone().unwrap_or(Value::Null)
        };
        results.push(executed);

        let formatted = self
          .invoke_step(run_id, StepName::Format, cancel, || {
            self.executor.format(&input.id, &format_input)
          })
          .await?;
        results.push(formatted);
      }
    }

    Ok(())
  }

  /// Invoke one step under the retry policy and the capacity semaphore.
  async fn invoke_step<F, Fut>(
    &self,
    run_id: &str,
    step: StepName,
    cancel: &CancellationToken,
    op: F,
  ) -> Result<StepResult, PipelineError>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<StepResult, StepFault>>,
  {
    if cancel.is_cancelled() {
      return Err(PipelineError::Cancelled);
    }

    self.notifier.notify(RunEvent::StepStarted {
      run_id: run_id.to_string(),
      step,
    });

    // Back-pressure on worker capacity; accepted work is never dropped.
    let _permit = self
      .capacity
      .acquire()
      .await
      .map_err(|_| PipelineError::QueueClosed)?;

    let outcome = retry(&self.policy, |fault: &StepFault| fault.kind, op).await;

    match outcome {
      Ok(retried) => {
        info!(
          step = %step,
          status = ?retried.value.status,
          attempts = retried.attempts,
          "step completed"
        );
        self.notifier.notify(RunEvent::StepCompleted {
          run_id: run_id.to_string(),
          step,
          status: retried.value.status,
        });
        Ok(retried.value)
      }
      Err(e) => {
        error!(step = %step, error = %e, "step fault, retry budget spent");
        Err(PipelineError::StepFault {
          step,
          message: e.to_string(),
        })
      }
    }
  }
}
