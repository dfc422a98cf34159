//! Conveyor Retry
//!
//! A first-class retry/timeout policy and the generic wrapper that
//! applies it to any async operation. The policy is independent of what
//! it wraps: the pipeline layer uses one parameterization around step
//! invocations, the supervision layer another around its start/status
//! calls.
//!
//! The contract: per-attempt timeout, exponential backoff between
//! attempts (bounded by a cap), a hard attempt ceiling, and a fault
//! classifier. Only transient faults are retried. A business-level
//! failure is an `Ok` value to this crate and never enters the loop.

mod policy;
mod retry;

pub use policy::RetryPolicy;
pub use retry::{FaultKind, RetryError, RetryOutcome, retry};
