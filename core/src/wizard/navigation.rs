// furrow/src/wizard/navigation.rs

//! Wizard transitions: next, previous, save draft, and submit.

use crate::core::context::Handler;
use crate::core::control::FlowControl;
use crate::error::FlowError;
use crate::flow::execution::drive_handlers;
use crate::wizard::definition::{Wizard, WizardStep};
use crate::wizard::session::WizardSession;
use tracing::{event, instrument, Level};

/// What a transition did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
  /// The cursor moved between two steps.
  Moved { from: String, to: String },
  /// "Next" or "submit" was disabled: `step` still misses `missing`.
  Blocked { step: String, missing: Vec<&'static str> },
  /// Nothing to do ("previous" on the first step, "next" on the last).
  Stayed { step: String },
  /// Save-draft hooks ran; the cursor did not move.
  DraftSaved { step: String },
  /// Submit hooks ran; the session is finished.
  Submitted,
  /// A hook returned `FlowControl::Halt`; the session is unchanged.
  Halted { step: String },
}

impl<TData, Err> Wizard<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn current_step<'a>(&'a self, session: &WizardSession<TData>) -> &'a WizardStep<TData> {
    &self.steps[session.cursor.min(self.steps.len() - 1)]
  }

  /// Required fields of the active step that are still empty.
  pub fn missing_fields(&self, session: &WizardSession<TData>) -> Vec<&'static str> {
    let step = self.current_step(session);
    let data = session.data.read();
    step.missing_fields(&data)
  }

  /// Index and missing fields of the first step whose gate does not pass.
  pub fn first_incomplete_step(&self, data: &TData) -> Option<(usize, Vec<&'static str>)> {
    self.steps.iter().enumerate().find_map(|(idx, step)| {
      let missing = step.missing_fields(data);
      (!missing.is_empty()).then_some((idx, missing))
    })
  }

  pub fn can_go_next(&self, session: &WizardSession<TData>) -> bool {
    !session.submitted && !session.is_last_step() && self.missing_fields(session).is_empty()
  }

  pub fn can_go_previous(&self, session: &WizardSession<TData>) -> bool {
    !session.submitted && !session.is_first_step()
  }

  pub fn can_submit(&self, session: &WizardSession<TData>) -> bool {
    !session.submitted && session.is_last_step() && self.first_incomplete_step(&session.data.read()).is_none()
  }

  #[instrument(name = "Wizard::next", skip_all, fields(cursor = session.cursor))]
  pub fn next(&self, session: &mut WizardSession<TData>) -> Transition {
    let step_key = self.current_step(session).key.clone();
    if session.submitted || session.is_last_step() {
      return Transition::Stayed { step: step_key };
    }

    let missing = self.missing_fields(session);
    if !missing.is_empty() {
      event!(Level::DEBUG, step = %step_key, ?missing, "Next is disabled, required fields missing.");
      return Transition::Blocked { step: step_key, missing };
    }

    session.cursor += 1;
    let to = self.current_step(session).key.clone();
    event!(Level::DEBUG, from = %step_key, to = %to, "Moved to next step.");
    Transition::Moved { from: step_key, to }
  }

  #[instrument(name = "Wizard::previous", skip_all, fields(cursor = session.cursor))]
  pub fn previous(&self, session: &mut WizardSession<TData>) -> Transition {
    let step_key = self.current_step(session).key.clone();
    if !self.can_go_previous(session) {
      return Transition::Stayed { step: step_key };
    }

    session.cursor -= 1;
    let to = self.current_step(session).key.clone();
    event!(Level::DEBUG, from = %step_key, to = %to, "Moved to previous step.");
    Transition::Moved { from: step_key, to }
  }

  /// Runs the save-draft hooks without moving the cursor.
  #[instrument(name = "Wizard::save_draft", skip_all, fields(cursor = session.cursor), err(Display))]
  pub async fn save_draft(&self, session: &mut WizardSession<TData>) -> Result<Transition, Err> {
    let step_key = self.current_step(session).key.clone();
    if session.submitted {
      return Err(Err::from(FlowError::TransitionRejected {
        transition: "save_draft".to_string(),
        reason: "the wizard was already submitted".to_string(),
      }));
    }

    match self.run_hooks("save_draft", &self.save_draft_hooks, session).await? {
      FlowControl::Continue => {
        event!(Level::INFO, step = %step_key, "Draft saved.");
        Ok(Transition::DraftSaved { step: step_key })
      }
      FlowControl::Halt => Ok(Transition::Halted { step: step_key }),
    }
  }

  /// Runs the submit hooks. Only allowed from the last step, and only once
  /// every step's gate passes; otherwise reports the first incomplete step.
  #[instrument(name = "Wizard::submit", skip_all, fields(cursor = session.cursor), err(Display))]
  pub async fn submit(&self, session: &mut WizardSession<TData>) -> Result<Transition, Err> {
    let step_key = self.current_step(session).key.clone();
    if session.submitted {
      return Err(Err::from(FlowError::TransitionRejected {
        transition: "submit".to_string(),
        reason: "the wizard was already submitted".to_string(),
      }));
    }
    if !session.is_last_step() {
      return Err(Err::from(FlowError::TransitionRejected {
        transition: "submit".to_string(),
        reason: format!("submit is only available from the last step, not '{}'", step_key),
      }));
    }

    let incomplete = self.first_incomplete_step(&session.data.read());
    if let Some((idx, missing)) = incomplete {
      let step = self.steps[idx].key.clone();
      event!(Level::DEBUG, %step, ?missing, "Submit is disabled, an earlier step is incomplete.");
      return Ok(Transition::Blocked { step, missing });
    }

    match self.run_hooks("submit", &self.submit_hooks, session).await? {
      FlowControl::Continue => {
        session.submitted = true;
        event!(Level::INFO, "Wizard submitted.");
        Ok(Transition::Submitted)
      }
      FlowControl::Halt => Ok(Transition::Halted { step: step_key }),
    }
  }

  async fn run_hooks(
    &self,
    transition: &'static str,
    hooks: &Vec<Handler<TData, Err>>,
    session: &mut WizardSession<TData>,
  ) -> Result<FlowControl, Err> {
    match drive_handlers(transition, Some(hooks), &session.data).await {
      Ok(control) => {
        session.last_error = None;
        Ok(control)
      }
      Err(e) => {
        session.last_error = Some(e.to_string());
        Err(e)
      }
    }
  }
}
