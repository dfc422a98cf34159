use thiserror::Error;

/// Validation errors raised at task ingress.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
  #[error("invalid task input: missing required field '{0}'")]
  MissingField(&'static str),

  #[error("invalid task input: payload must not be empty")]
  EmptyPayload,
}
