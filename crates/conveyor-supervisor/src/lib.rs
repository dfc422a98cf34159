//! Conveyor Supervisor
//!
//! The supervising orchestrator: given a task, it starts a pipeline run
//! through the [`PipelineClient`] contract and polls the run's status on
//! a fixed interval until completion, failure, or a bounded attempt
//! budget is exhausted.
//!
//! States: `Pending → Starting → Polling → {Completed | Failed |
//! TimedOut}`. Both the start call and every status call are wrapped by
//! the supervision-layer retry policy, so transient faults at the
//! boundary are absorbed before they can fail a supervision.
//!
//! The supervisor never inspects pipeline internals; it holds only the
//! run id and the terminal result copy it retrieves. The outcome is a
//! [`SupervisionEnvelope`], built exactly once at a terminal state - the
//! caller always receives a terminal envelope, never an indefinite hang.

mod client;
mod envelope;
mod supervisor;

pub use client::{
  ClientFault, PipelineClient, RemoteStatus, RuntimeClient, StartOutcome, StatusOutcome,
};
pub use envelope::SupervisionEnvelope;
pub use supervisor::{Supervisor, SupervisorConfig};
