// furrow_market/src/web/handlers/draft_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::flows::contexts::{CreateDraftCtxData, UpdateDraftCtxData};
use crate::models::{DraftPayload, UpdateDraftPayload};
use crate::state::AppState;
use crate::web::extractors::{parse_query, read_json, AuthenticatedUser};
use furrow::{ContextData, FlowOutcome};

#[derive(Deserialize, Debug)]
pub struct DraftIdQuery {
  pub id: Option<Uuid>,
}

#[instrument(name = "handler::create_draft", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn create_draft_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let payload: DraftPayload = read_json(payload).await?;
  let ctx = ContextData::new(CreateDraftCtxData {
    app_state: app_state.get_ref().clone(),
    farmer_id: auth_user.user_id,
    payload,
    saved_draft: None,
  });

  match app_state.flows.run(ctx.clone()).await? {
    FlowOutcome::Completed => {
      let draft = ctx
        .write()
        .saved_draft
        .take()
        .ok_or_else(|| AppError::Internal("create_draft completed without a saved draft".to_string()))?;
      Ok(HttpResponse::Created().json(json!({ "draft": draft })))
    }
    FlowOutcome::Halted => Err(AppError::Internal("create_draft was halted by a step".to_string())),
  }
}

/// One owned draft with `?id=`, otherwise every draft of the caller.
#[instrument(name = "handler::get_drafts", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_drafts_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  let query: DraftIdQuery = parse_query(&req)?;
  match query.id {
    Some(draft_id) => {
      let draft = app_state
        .drafts
        .find_draft(auth_user.user_id, draft_id)
        .await?
        .ok_or_else(|| {
          warn!(%draft_id, "Draft not found for caller.");
          AppError::NotFound(format!("Draft {} not found.", draft_id))
        })?;
      Ok(HttpResponse::Ok().json(json!({ "draft": draft })))
    }
    None => {
      let drafts = app_state.drafts.list_drafts(auth_user.user_id).await?;
      info!(count = drafts.len(), "Drafts listed.");
      Ok(HttpResponse::Ok().json(json!({ "drafts": drafts })))
    }
  }
}

#[instrument(name = "handler::update_draft", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn update_draft_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let UpdateDraftPayload { id, draft } = read_json(payload).await?;
  let ctx = ContextData::new(UpdateDraftCtxData {
    app_state: app_state.get_ref().clone(),
    farmer_id: auth_user.user_id,
    draft_id: id,
    payload: draft,
    saved_draft: None,
  });

  match app_state.flows.run(ctx.clone()).await? {
    FlowOutcome::Completed => {
      let draft = ctx
        .write()
        .saved_draft
        .take()
        .ok_or_else(|| AppError::Internal("update_draft completed without a saved draft".to_string()))?;
      Ok(HttpResponse::Ok().json(json!({ "draft": draft })))
    }
    FlowOutcome::Halted => Err(AppError::Internal("update_draft was halted by a step".to_string())),
  }
}

#[instrument(name = "handler::delete_draft", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_draft_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  let query: DraftIdQuery = parse_query(&req)?;
  let draft_id = query.id.ok_or_else(|| AppError::invalid("id", "is required"))?;

  if app_state.drafts.delete_draft(auth_user.user_id, draft_id).await? {
    info!(%draft_id, "Draft deleted.");
    Ok(HttpResponse::Ok().json(json!({ "deleted": true, "id": draft_id })))
  } else {
    warn!(%draft_id, "Delete targeted a draft the caller does not own.");
    Err(AppError::NotFound(format!("Draft {} not found.", draft_id)))
  }
}
