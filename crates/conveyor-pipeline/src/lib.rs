//! Conveyor Pipeline
//!
//! The pipeline orchestrator: sequences the parse/execute/format steps
//! for one task, applies fail-fast short-circuiting, and aggregates the
//! step results into a [`PipelineRun`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PipelineRuntime                         │
//! │  - submit(task) → run id, run proceeds asynchronously       │
//! │  - status(run_id) → RunStatus snapshot                      │
//! │  - owns the run registry and the step-concurrency ceiling   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Orchestrator                           │
//! │  - path selection from task kind (once, at entry)           │
//! │  - fail-fast on parse failure, error payload to format      │
//! │  - every step invocation wrapped by the retry policy        │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      StepExecutor                           │
//! │  - executes individual unit-of-work steps                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business failures (a failed [`StepResult`]) flow through the result
//! sequence as data and drive the aggregate status. Execution faults are
//! retried per policy; if retries exhaust, the run finalizes failed with
//! whatever partial results had accumulated. The orchestrator never
//! propagates a raw fault to its caller.
//!
//! [`StepResult`]: conveyor_task::StepResult

mod error;
mod events;
mod executor;
mod orchestrator;
mod path;
mod run;
mod runtime;

pub use error::PipelineError;
pub use events::{ChannelNotifier, NoopNotifier, RunEvent, RunNotifier};
pub use executor::{SimulatedExecutor, StepExecutor, StepFault};
pub use orchestrator::Orchestrator;
pub use path::PipelinePath;
pub use run::{PipelineRun, PipelineStatus, RunStatus};
pub use runtime::{PipelineRuntime, RuntimeConfig};
