//! Run events and notifiers for observability.
//!
//! Events are emitted during a pipeline run to allow consumers to observe
//! progress, persist state, stream to UIs, etc.

use conveyor_task::{StepName, StepStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::run::PipelineStatus;

/// Events emitted during a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
  /// A run has started.
  RunStarted { run_id: String, task_id: String },

  /// A step invocation has started.
  StepStarted { run_id: String, step: StepName },

  /// A step invocation produced a result (success or business failure).
  StepCompleted {
    run_id: String,
    step: StepName,
    status: StepStatus,
  },

  /// The run has finalized.
  RunFinalized {
    run_id: String,
    status: PipelineStatus,
  },
}

/// Trait for receiving run events.
///
/// The orchestrator calls `notify` for each event - implementations
/// decide what to do with them (persist, broadcast, log, ignore, etc.).
pub trait RunNotifier: Send + Sync {
  /// Called when a run event occurs.
  fn notify(&self, event: RunEvent);
}

/// A no-op notifier that discards all events.
///
/// Useful for tests or when event observation is not needed.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl RunNotifier for NoopNotifier {
  fn notify(&self, _event: RunEvent) {
    // Intentionally empty
  }
}

/// A notifier that sends events to an unbounded channel.
///
/// Use this when you need to consume events asynchronously. The event
/// volume is low (a handful per run), so unbounded growth is not a
/// practical concern here.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelNotifier {
  /// Create a new channel notifier.
  pub fn new(sender: mpsc::UnboundedSender<RunEvent>) -> Self {
    Self { sender }
  }
}

impl RunNotifier for ChannelNotifier {
  fn notify(&self, event: RunEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
