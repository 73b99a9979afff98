// furrow/src/wizard/definition.rs

use crate::core::context::{boxed_handler, Handler};
use crate::core::context_data::ContextData;
use crate::core::control::FlowControl;
use crate::error::FlowError;
use crate::wizard::session::WizardSession;
use std::future::Future;
use std::sync::Arc;
use tracing::{event, Level};

/// Gate for a step: returns the names of the required fields still empty.
/// An empty list means the step is complete.
pub type RequiredFields<TData> = Arc<dyn Fn(&TData) -> Vec<&'static str> + Send + Sync + 'static>;

pub struct WizardStep<TData: 'static + Send + Sync> {
  pub key: String,
  pub title: String,
  pub(crate) required: Option<RequiredFields<TData>>,
}

impl<TData: 'static + Send + Sync> WizardStep<TData> {
  pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      title: title.into(),
      required: None,
    }
  }

  pub fn requires(mut self, gate: impl Fn(&TData) -> Vec<&'static str> + Send + Sync + 'static) -> Self {
    self.required = Some(Arc::new(gate));
    self
  }

  pub fn missing_fields(&self, data: &TData) -> Vec<&'static str> {
    self.required.as_ref().map(|gate| gate(data)).unwrap_or_default()
  }
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for WizardStep<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WizardStep")
      .field("key", &self.key)
      .field("title", &self.title)
      .field("gated", &self.required.is_some())
      .finish()
  }
}

/// A strictly linear form wizard over `TData`.
///
/// "Save draft" and "submit" run their registered hooks against the session's
/// `ContextData<TData>`; hook errors are returned as `Err` and leave the
/// session where it was.
pub struct Wizard<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<WizardStep<TData>>,
  pub(crate) save_draft_hooks: Vec<Handler<TData, Err>>,
  pub(crate) submit_hooks: Vec<Handler<TData, Err>>,
}

impl<TData, Err> Wizard<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Panics on an empty step list or duplicate step keys (setup bugs).
  pub fn new(steps: Vec<WizardStep<TData>>) -> Self {
    if steps.is_empty() {
      panic!("Furrow setup error: a wizard needs at least one step.");
    }
    for (idx, step) in steps.iter().enumerate() {
      if steps[..idx].iter().any(|earlier| earlier.key == step.key) {
        panic!("Furrow setup error: duplicate wizard step key '{}'.", step.key);
      }
    }
    Self {
      steps,
      save_draft_hooks: Vec::new(),
      submit_hooks: Vec::new(),
    }
  }

  pub fn steps(&self) -> &[WizardStep<TData>] {
    &self.steps
  }

  pub fn step_keys(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.key.as_str()).collect()
  }

  pub fn step_index(&self, key: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.key == key)
  }

  pub fn on_save_draft<F, UserErr>(&mut self, handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.save_draft_hooks.push(boxed_handler(handler_fn));
  }

  pub fn on_submit<F, UserErr>(&mut self, handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.submit_hooks.push(boxed_handler(handler_fn));
  }

  /// Starts a session on the first step.
  pub fn start(&self, data: TData) -> WizardSession<TData> {
    WizardSession::new(ContextData::new(data), 0, self.steps.len())
  }

  /// Resumes a session on the step with `step_key`, e.g. from a saved draft.
  /// Unknown keys fall back to the first step.
  pub fn resume(&self, data: TData, step_key: Option<&str>) -> WizardSession<TData> {
    let cursor = match step_key {
      Some(key) => self.step_index(key).unwrap_or_else(|| {
        event!(Level::WARN, step_key = key, "Unknown wizard step key, resuming at the first step.");
        0
      }),
      None => 0,
    };
    WizardSession::new(ContextData::new(data), cursor, self.steps.len())
  }
}
