// furrow_market/src/flows/product_flow.rs

use crate::errors::AppError;
use crate::flows::contexts::CreateProductCtxData;
use crate::models::NewProduct;
use furrow::{ContextData, Flow, FlowControl, Flows, StepDef};
use tracing::{event, info, warn, Level};

fn without_draft(ctx_data: ContextData<CreateProductCtxData>) -> bool {
  ctx_data.read().payload.draft_id.is_none()
}

/// Creates an active product and, when the submission came from a draft,
/// removes that draft. The draft's ownership is checked before the insert so a
/// foreign `draftId` fails without creating anything.
pub fn register_create_product_flow(flows: &Flows<AppError>) {
  let mut flow = Flow::<CreateProductCtxData, AppError>::with_steps(
    "create_product",
    vec![
      StepDef::required("validate_listing"),
      StepDef::required("check_source_draft").skip_when(without_draft),
      StepDef::required("insert_product"),
      StepDef::required("retire_draft").skip_when(without_draft),
    ],
  );

  flow.on_step("validate_listing", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move { ctx_data.read().payload.validate_schema().map(|_| FlowControl::Continue) })
  });

  flow.on_step("check_source_draft", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let (drafts, farmer_id, draft_id) = {
        let guard = ctx_data.read();
        (guard.app_state.drafts.clone(), guard.farmer_id, guard.payload.draft_id)
      };
      let Some(draft_id) = draft_id else {
        return Ok::<_, AppError>(FlowControl::Continue);
      };

      match drafts.find_draft(farmer_id, draft_id).await? {
        Some(_) => Ok(FlowControl::Continue),
        None => {
          warn!(%draft_id, %farmer_id, "Submission references a draft the caller does not own.");
          Err(AppError::NotFound(format!("Draft {} not found.", draft_id)))
        }
      }
    })
  });

  flow.on_step("insert_product", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let (products, new_product) = {
        let guard = ctx_data.read();
        (
          guard.app_state.products.clone(),
          NewProduct::from_listing(guard.farmer_id, guard.payload.fields.clone())?,
        )
      };

      event!(Level::DEBUG, farmer_id = %new_product.farmer_id, "Inserting product.");
      let product = products.insert_product(&new_product).await?;
      info!(product_id = %product.id, farmer_id = %product.farmer_id, "Product created.");

      ctx_data.write().created_product = Some(product);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on_step("retire_draft", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let (drafts, farmer_id, draft_id) = {
        let guard = ctx_data.read();
        (guard.app_state.drafts.clone(), guard.farmer_id, guard.payload.draft_id)
      };
      let Some(draft_id) = draft_id else {
        return Ok(FlowControl::Continue);
      };

      let removed = drafts.delete_draft(farmer_id, draft_id).await?;
      if removed {
        info!(%draft_id, "Promoted draft removed.");
      } else {
        // Checked before the insert; only a concurrent delete lands here.
        warn!(%draft_id, "Promoted draft was already gone.");
      }
      ctx_data.write().draft_retired = removed;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flows.register_flow(flow);
}
