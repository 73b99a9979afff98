// furrow/src/flow/execution.rs

//! `Flow::run()`: executes steps in order against a shared context.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{FlowControl, FlowOutcome};
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::flow::definition::Flow;
use tracing::{event, info_span, instrument, Instrument, Level};

/// Runs `handlers` in order, stopping at the first `Halt` or error.
/// Shared by flow phases and wizard transitions.
pub(crate) async fn drive_handlers<TData, Err>(
  phase: &'static str,
  handlers: Option<&Vec<Handler<TData, Err>>>,
  ctx_data: &ContextData<TData>,
) -> Result<FlowControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::fmt::Display,
{
  let Some(handlers) = handlers else {
    return Ok(FlowControl::Continue);
  };

  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let handler_span = info_span!("handler", phase, handler_index = handler_idx);
    match handler_fn(ctx_data.clone()).instrument(handler_span).await {
      Ok(FlowControl::Continue) => {}
      Ok(FlowControl::Halt) => {
        event!(Level::INFO, phase, handler_index = handler_idx, "Halted by handler.");
        return Ok(FlowControl::Halt);
      }
      Err(e) => {
        event!(Level::ERROR, phase, handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(FlowControl::Continue)
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Executes the flow against `ctx_data`.
  ///
  /// Framework failures (a required step with no handlers) are raised as
  /// `FlowError` and converted into `Err`.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(flow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "flow_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );
      if self.run_step(step_def, &ctx_data).instrument(step_span).await? == FlowControl::Halt {
        return Ok(FlowOutcome::Halted);
      }
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<FlowControl, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_cond_fn) = &step_def.skip_if {
      if skip_cond_fn(ctx_data.clone()) {
        event!(Level::INFO, "Step skipped by its skip condition.");
        return Ok(FlowControl::Continue);
      }
    }

    let has_handlers = [&self.before, &self.on, &self.after]
      .iter()
      .any(|phase| phase.get(step_name).is_some_and(|v| !v.is_empty()));

    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(FlowControl::Continue);
      }
      event!(Level::ERROR, "Required step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase, handlers) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
      if drive_handlers(phase, handlers.get(step_name), ctx_data).await? == FlowControl::Halt {
        return Ok(FlowControl::Halt);
      }
    }

    event!(Level::DEBUG, "Step finished.");
    Ok(FlowControl::Continue)
  }
}
