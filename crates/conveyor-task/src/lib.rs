//! Conveyor Task
//!
//! This crate contains the task data model shared by every layer of
//! conveyor: the submitted [`TaskInput`] with its ingress validation
//! contract, and the [`StepResult`] produced by each unit-of-work
//! invocation.
//!
//! A task that fails [`TaskInput::validate`] is rejected before any
//! orchestrator instance exists. Everything downstream can therefore
//! assume a structurally sound task.

mod error;
mod input;
mod result;

pub use error::TaskError;
pub use input::{TaskInput, TaskKind};
pub use result::{StepName, StepResult, StepStatus};
