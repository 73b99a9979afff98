// furrow_market/src/wizard/listing_wizard.rs

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{CreateProductPayload, DraftPayload, Product, ProductDraft};
use crate::wizard::steps::{ListingForm, ListingStep};
use furrow::{ContextData, FlowControl, Transition, Wizard, WizardSession, WizardStep};

/// Where the wizard's side effects go: the draft and product endpoints.
#[async_trait]
pub trait ListingBackend: Send + Sync {
  /// Creates the draft when `draft_id` is `None`, updates it otherwise.
  async fn save_draft(&self, draft_id: Option<Uuid>, draft: &DraftPayload) -> Result<ProductDraft>;

  async fn submit_listing(&self, listing: &CreateProductPayload) -> Result<Product>;
}

/// The five-step product listing wizard.
pub struct ListingWizard {
  wizard: Wizard<ListingForm, AppError>,
}

impl ListingWizard {
  pub fn new(backend: Arc<dyn ListingBackend>) -> Self {
    let steps = ListingStep::ALL
      .into_iter()
      .map(|step| WizardStep::new(step.key(), step.title()).requires(move |form: &ListingForm| form.blocking_for(step)))
      .collect();
    let mut wizard = Wizard::<ListingForm, AppError>::new(steps);

    let draft_backend = backend.clone();
    wizard.on_save_draft(move |ctx_data: ContextData<ListingForm>| {
      let backend = draft_backend.clone();
      Box::pin(async move {
        let (draft_id, payload) = {
          let guard = ctx_data.read();
          let payload = DraftPayload {
            fields: guard.fields.clone(),
            current_step: guard.current_step.clone(),
          };
          (guard.draft_id, payload)
        };

        let saved = backend.save_draft(draft_id, &payload).await?;
        info!(draft_id = %saved.id, created = draft_id.is_none(), "Listing draft saved.");
        ctx_data.write().draft_id = Some(saved.id);
        Ok::<_, AppError>(FlowControl::Continue)
      })
    });

    wizard.on_submit(move |ctx_data: ContextData<ListingForm>| {
      let backend = backend.clone();
      Box::pin(async move {
        let listing = {
          let guard = ctx_data.read();
          CreateProductPayload {
            fields: guard.fields.clone(),
            draft_id: guard.draft_id,
          }
        };

        let product = backend.submit_listing(&listing).await?;
        info!(product_id = %product.id, "Listing submitted.");
        {
          let mut guard = ctx_data.write();
          guard.product = Some(product);
          guard.draft_id = None;
        }
        Ok::<_, AppError>(FlowControl::Continue)
      })
    });

    Self { wizard }
  }

  pub fn start(&self) -> WizardSession<ListingForm> {
    self.wizard.start(ListingForm::default())
  }

  /// Picks a saved draft back up on the step it was saved from.
  pub fn resume(&self, draft: ProductDraft) -> WizardSession<ListingForm> {
    let step_key = draft.current_step.clone();
    self.wizard.resume(ListingForm::from_draft(draft), step_key.as_deref())
  }

  pub fn current_step(&self, session: &WizardSession<ListingForm>) -> ListingStep {
    ListingStep::ALL[session.cursor().min(ListingStep::ALL.len() - 1)]
  }

  pub fn missing_fields(&self, session: &WizardSession<ListingForm>) -> Vec<&'static str> {
    self.wizard.missing_fields(session)
  }

  pub fn can_go_next(&self, session: &WizardSession<ListingForm>) -> bool {
    self.wizard.can_go_next(session)
  }

  pub fn can_go_previous(&self, session: &WizardSession<ListingForm>) -> bool {
    self.wizard.can_go_previous(session)
  }

  pub fn can_submit(&self, session: &WizardSession<ListingForm>) -> bool {
    self.wizard.can_submit(session)
  }

  pub fn next(&self, session: &mut WizardSession<ListingForm>) -> Transition {
    self.wizard.next(session)
  }

  pub fn previous(&self, session: &mut WizardSession<ListingForm>) -> Transition {
    self.wizard.previous(session)
  }

  /// Persists the form with the active step key. A failed save restores the
  /// previous step key so the form is exactly as it was.
  #[instrument(name = "ListingWizard::save_draft", skip_all, fields(step = self.current_step(session).key()))]
  pub async fn save_draft(&self, session: &mut WizardSession<ListingForm>) -> Result<Transition> {
    let step_key = self.current_step(session).key().to_string();
    let previous = session.edit(|form| form.current_step.replace(step_key));

    let result = self.wizard.save_draft(session).await;
    if result.is_err() {
      session.edit(|form| form.current_step = previous);
    }
    result
  }

  #[instrument(name = "ListingWizard::submit", skip_all)]
  pub async fn submit(&self, session: &mut WizardSession<ListingForm>) -> Result<Transition> {
    self.wizard.submit(session).await
  }
}
