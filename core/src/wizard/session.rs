// furrow/src/wizard/session.rs
use crate::core::context_data::ContextData;

/// One user's progress through a wizard: the accumulated form data, the
/// active step index, and the last error surfaced to the user.
#[derive(Debug)]
pub struct WizardSession<TData: Send + Sync + 'static> {
  pub(crate) data: ContextData<TData>,
  pub(crate) cursor: usize,
  pub(crate) total_steps: usize,
  pub(crate) submitted: bool,
  pub(crate) last_error: Option<String>,
}

impl<TData: Send + Sync + 'static> WizardSession<TData> {
  pub(crate) fn new(data: ContextData<TData>, cursor: usize, total_steps: usize) -> Self {
    Self {
      data,
      cursor,
      total_steps,
      submitted: false,
      last_error: None,
    }
  }

  pub fn data(&self) -> &ContextData<TData> {
    &self.data
  }

  /// Edits the form data in place, e.g. when the user types into a field.
  pub fn edit<R>(&self, f: impl FnOnce(&mut TData) -> R) -> R {
    self.data.update(f)
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn is_first_step(&self) -> bool {
    self.cursor == 0
  }

  pub fn is_last_step(&self) -> bool {
    self.cursor + 1 == self.total_steps
  }

  pub fn is_submitted(&self) -> bool {
    self.submitted
  }

  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }

  /// One-based position and total, for "Step 2 of 5" style display.
  pub fn progress(&self) -> (usize, usize) {
    (self.cursor + 1, self.total_steps)
  }
}
