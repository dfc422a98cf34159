//! The supervising poll loop.

use std::time::Duration;

use conveyor_retry::{RetryPolicy, retry};
use conveyor_task::TaskInput;
use tracing::{error, info, instrument, warn};

use crate::client::{ClientFault, PipelineClient, RemoteStatus};
use crate::envelope::SupervisionEnvelope;

/// Configuration for a supervision.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
  /// Ceiling on status checks before the supervision times out.
  pub max_poll_attempts: u32,
  /// Deterministic wait between status checks.
  pub poll_interval: Duration,
  /// Retry policy applied around every start/status call.
  pub call_retry: RetryPolicy,
}

impl Default for SupervisorConfig {
  fn default() -> Self {
    Self {
      max_poll_attempts: 30,
      poll_interval: Duration::from_secs(1),
      call_retry: RetryPolicy::supervision(),
    }
  }
}

/// Starts a pipeline run and polls it to a terminal outcome.
pub struct Supervisor<C: PipelineClient> {
  client: C,
  config: SupervisorConfig,
}

impl<C: PipelineClient> Supervisor<C> {
  /// Create a supervisor with the default configuration.
  pub fn new(client: C) -> Self {
    Self::with_config(client, SupervisorConfig::default())
  }

  /// Create a supervisor with a custom configuration.
  pub fn with_config(client: C, config: SupervisorConfig) -> Self {
    Self { client, config }
  }

  /// Supervise one task to a terminal envelope.
  ///
  /// Never hangs: the worst case is bounded by
  /// `max_poll_attempts × poll_interval` plus the retry overhead of the
  /// individual calls. Retry exhaustion on start or status converts to a
  /// failed envelope carrying the fault's message.
  #[instrument(name = "supervise", skip(self, input), fields(task_id = %input.id))]
  pub async fn supervise(&self, input: TaskInput) -> SupervisionEnvelope {
    // Starting: one retried start call decides whether we poll at all.
    let started = match retry(
      &self.config.call_retry,
      |fault: &ClientFault| fault.kind,
      || self.client.start_pipeline(&input),
    )
    .await
    {
      Ok(outcome) => {
        info!(attempts = outcome.attempts, "pipeline start call succeeded");
        outcome.value
      }
      Err(e) => {
        error!(error = %e, "pipeline start faulted");
        return SupervisionEnvelope::failed(None, e.to_string());
      }
    };

    if !started.success {
      let reason = started
        .error
        .unwrap_or_else(|| "failed to start pipeline".to_string());
      warn!(reason = %reason, "pipeline refused the task, not polling");
      return SupervisionEnvelope::failed(None, reason);
    }

    let Some(run_id) = started.run_id else {
      return SupervisionEnvelope::failed(None, "start reported success without a run id");
    };

    info!(run_id = %run_id, "polling pipeline status");

    // Polling: bounded status checks with a deterministic wait between
    // them. The wait is an orchestration-level suspension the execution
    // substrate can checkpoint, not an ad-hoc timer.
    for attempt in 1..=self.config.max_poll_attempts {
      let status = match retry(
        &self.config.call_retry,
        |fault: &ClientFault| fault.kind,
        || self.client.pipeline_status(&run_id),
      )
      .await
      {
        Ok(outcome) => outcome.value,
        Err(e) => {
          error!(run_id = %run_id, error = %e, "status call faulted");
          return SupervisionEnvelope::failed(Some(run_id), e.to_string());
        }
      };

      match status.status {
        RemoteStatus::Completed => {
          info!(run_id = %run_id, attempt, "pipeline completed");
          return SupervisionEnvelope::completed(run_id, status.result);
        }
        RemoteStatus::Failed | RemoteStatus::Error => {
          warn!(run_id = %run_id, attempt, status = ?status.status, "pipeline did not complete");
          return SupervisionEnvelope::failed(Some(run_id), "pipeline execution failed");
        }
        RemoteStatus::Running => {
          if attempt < self.config.max_poll_attempts {
            tokio::time::sleep(self.config.poll_interval).await;
          }
        }
      }
    }

    warn!(run_id = %run_id, attempts = self.config.max_poll_attempts, "poll budget exhausted");
    SupervisionEnvelope::timed_out(run_id)
  }
}
