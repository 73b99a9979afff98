// furrow_market/src/flows/draft_flows.rs

use crate::errors::AppError;
use crate::flows::contexts::{CreateDraftCtxData, UpdateDraftCtxData};
use furrow::{ContextData, Flow, FlowControl, Flows};
use tracing::{event, info, warn, Level};

pub fn register_create_draft_flow(flows: &Flows<AppError>) {
  let mut flow = Flow::<CreateDraftCtxData, AppError>::new("create_draft", &["validate_draft", "insert_draft"]);

  flow.on_step("validate_draft", |ctx_data: ContextData<CreateDraftCtxData>| {
    Box::pin(async move {
      let result = ctx_data.read().payload.validate_schema();
      if let Err(e) = &result {
        warn!(details = ?e.field_errors(), "Draft payload rejected.");
      }
      result.map(|_| FlowControl::Continue)
    })
  });

  flow.on_step("insert_draft", |ctx_data: ContextData<CreateDraftCtxData>| {
    Box::pin(async move {
      let (drafts, farmer_id, payload) = {
        let guard = ctx_data.read();
        (guard.app_state.drafts.clone(), guard.farmer_id, guard.payload.clone())
      };

      event!(Level::DEBUG, %farmer_id, "Inserting draft.");
      let draft = drafts.insert_draft(farmer_id, &payload).await?;
      info!(draft_id = %draft.id, %farmer_id, "Draft created.");

      ctx_data.write().saved_draft = Some(draft);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flows.register_flow(flow);
}

pub fn register_update_draft_flow(flows: &Flows<AppError>) {
  let mut flow = Flow::<UpdateDraftCtxData, AppError>::new(
    "update_draft",
    &["require_draft_id", "validate_draft", "update_owned_draft"],
  );

  flow.on_step("require_draft_id", |ctx_data: ContextData<UpdateDraftCtxData>| {
    Box::pin(async move {
      match ctx_data.read().draft_id {
        Some(_) => Ok(FlowControl::Continue),
        None => Err(AppError::invalid("id", "is required")),
      }
    })
  });

  flow.on_step("validate_draft", |ctx_data: ContextData<UpdateDraftCtxData>| {
    Box::pin(async move { ctx_data.read().payload.validate_schema().map(|_| FlowControl::Continue) })
  });

  flow.on_step("update_owned_draft", |ctx_data: ContextData<UpdateDraftCtxData>| {
    Box::pin(async move {
      let (drafts, farmer_id, draft_id, payload) = {
        let guard = ctx_data.read();
        (
          guard.app_state.drafts.clone(),
          guard.farmer_id,
          guard.draft_id.ok_or_else(|| AppError::invalid("id", "is required"))?,
          guard.payload.clone(),
        )
      };

      match drafts.update_draft(farmer_id, draft_id, &payload).await? {
        Some(draft) => {
          info!(%draft_id, %farmer_id, "Draft updated.");
          ctx_data.write().saved_draft = Some(draft);
          Ok(FlowControl::Continue)
        }
        None => {
          warn!(%draft_id, %farmer_id, "Update targeted a draft the caller does not own.");
          Err(AppError::NotFound(format!("Draft {} not found.", draft_id)))
        }
      }
    })
  });

  flows.register_flow(flow);
}
