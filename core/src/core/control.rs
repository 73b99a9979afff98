// furrow/src/core/control.rs

//! Signals for controlling flow execution and the outcome of a flow run.

/// Returned by every handler to say whether execution goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Keep going: remaining handlers of this step, then the following steps.
  Continue,
  /// Halt the flow now. Nothing after the current handler runs.
  Halt,
}

/// Outcome of a full flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step that was not skipped ran to the end.
  Completed,
  /// A handler returned `FlowControl::Halt`.
  Halted,
}

impl FlowOutcome {
  pub fn is_completed(self) -> bool {
    matches!(self, FlowOutcome::Completed)
  }
}
