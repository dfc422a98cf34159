//! Pipeline path selection.

use conveyor_task::TaskKind;

/// The step sequence a run will follow.
///
/// Selected once from the task kind at orchestrator entry and never
/// re-evaluated mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePath {
  /// Parse only: validate and structure the input.
  ParseOnly,
  /// Format only: format the raw payload.
  FormatOnly,
  /// Full pipeline: parse, execute, format.
  Full,
}

impl PipelinePath {
  /// Pure mapping from task kind to path.
  pub fn for_kind(kind: TaskKind) -> Self {
    match kind {
      TaskKind::Parse => PipelinePath::ParseOnly,
      TaskKind::Format => PipelinePath::FormatOnly,
      TaskKind::Process => PipelinePath::Full,
    }
  }
}
