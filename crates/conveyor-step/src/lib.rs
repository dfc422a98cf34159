//! Conveyor Step
//!
//! The three unit-of-work operations conveyor pipelines are built from:
//! [`parse_task`], [`execute_tool`] and [`format_result`]. Each takes
//! structured input and produces a [`StepResult`] with elapsed time.
//!
//! These are simulated operations: a fixed latency plus a deterministic
//! success transform, or an injected failure when the input payload
//! carries `"should_fail": true`. They never return an error. A bad task
//! becomes a failed `StepResult`, not a fault, which isolates it from
//! the orchestrator above.
//!
//! Parse is the only step that validates structure (id and payload must
//! be present). Execute and format only honor the failure flag.

mod execute;
mod format;
mod parse;

pub use execute::execute_tool;
pub use format::format_result;
pub use parse::parse_task;

use serde_json::Value;

/// Injected failure flag, checked at the top level of a step's input.
pub const FAILURE_FLAG: &str = "should_fail";

/// True when the payload requests a simulated failure.
pub(crate) fn failure_injected(payload: &Value) -> bool {
  payload
    .get(FAILURE_FLAG)
    .and_then(Value::as_bool)
    .unwrap_or(false)
}
