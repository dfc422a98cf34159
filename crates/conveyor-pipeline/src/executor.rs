//! Step execution seam.
//!
//! The orchestrator invokes steps through the [`StepExecutor`] trait so
//! the execution substrate can be swapped: the production
//! [`SimulatedExecutor`] runs the in-process unit-of-work functions,
//! tests substitute fault-injecting implementations to exercise the
//! retry policy.

use async_trait::async_trait;
use conveyor_retry::FaultKind;
use conveyor_task::{StepResult, TaskInput};
use serde_json::Value;

/// Infrastructure-level fault raised by a step invocation.
///
/// Distinct from a business failure: a failed `StepResult` is an `Ok`
/// value. A `StepFault` is the substrate misbehaving and is subject to
/// the retry policy according to its `kind`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StepFault {
  pub kind: FaultKind,
  pub message: String,
}

impl StepFault {
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

/// Executes individual unit-of-work steps.
#[async_trait]
pub trait StepExecutor: Send + Sync {
  /// Parse the raw task input.
  async fn parse(&self, input: &TaskInput) -> Result<StepResult, StepFault>;

  /// Execute the tool against a (parsed) payload.
  async fn execute(&self, task_id: &str, payload: &Value) -> Result<StepResult, StepFault>;

  /// Format a payload into the final result envelope.
  async fn format(&self, task_id: &str, payload: &Value) -> Result<StepResult, StepFault>;
}

/// The in-process executor backed by the simulated step functions.
///
/// Never faults; business failures come back as failed `StepResult`s.
#[derive(Debug, Clone, Default)]
pub struct SimulatedExecutor;

#[async_trait]
impl StepExecutor for SimulatedExecutor {
  async fn parse(&self, input: &TaskInput) -> Result<StepResult, StepFault> {
    Ok(conveyor_step::parse_task(input).await)
  }

  async fn execute(&self, task_id: &str, payload: &Value) -> Result<StepResult, StepFault> {
    Ok(conveyor_step::execute_tool(task_id, payload).await)
  }

  async fn format(&self, task_id: &str, payload: &Value) -> Result<StepResult, StepFault> {
    Ok(conveyor_step::format_result(task_id, payload).await)
  }
}
