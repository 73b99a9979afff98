// tests/common/mod.rs
#![allow(dead_code)]

use furrow::{ContextData, FlowControl, FlowError, Wizard, WizardStep};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Contexts ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_halt_at: Option<String>,
}

/// Small three-step form used by the wizard tests.
#[derive(Clone, Debug, Default)]
pub struct SignupForm {
  pub name: Option<String>,
  pub crop: Option<String>,
  pub acres: Option<u32>,
  pub drafts_saved: usize,
  pub submitted_as: Option<String>,
}

// --- Error type ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Furrow framework error: {0}")]
  Furrow(String), // FlowError is not PartialEq; keep its Debug text

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Furrow(format!("{:?}", fe))
  }
}

// --- Handler creators ---
pub fn create_simple_handler(step_name: &'static str, message_to_append: &'static str) -> furrow::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, "executed, counter: {}", guard.counter);
      if guard.should_halt_at.as_deref() == Some(step_name) {
        return Ok(FlowControl::Halt);
      }
      Ok(FlowControl::Continue)
    })
  })
}

pub fn create_failing_handler(step_name: &'static str, error_message: &'static str) -> furrow::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

fn missing(pairs: &[(&'static str, bool)]) -> Vec<&'static str> {
  pairs.iter().filter(|(_, present)| !present).map(|(name, _)| *name).collect()
}

/// "profile" needs a name, "farm" needs crop and acres, "review" has no gate.
pub fn signup_wizard() -> Wizard<SignupForm, TestError> {
  Wizard::new(vec![
    WizardStep::new("profile", "Profile").requires(|f: &SignupForm| missing(&[("name", f.name.is_some())])),
    WizardStep::new("farm", "Farm").requires(|f: &SignupForm| {
      missing(&[("crop", f.crop.is_some()), ("acres", f.acres.is_some())])
    }),
    WizardStep::new("review", "Review"),
  ])
}

// --- Tracing setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub static HOOK_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  HOOK_EXEC_COUNTER.store(0, Ordering::SeqCst);
}
