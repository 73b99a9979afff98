// furrow_market/tests/wizard_client_tests.rs

mod common;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use chrono::NaiveDate;
use common::*;
use std::net::TcpListener;
use std::sync::Arc;
use uuid::Uuid;

use furrow::Transition;
use furrow_market::errors::AppError;
use furrow_market::models::{DraftPayload, ListingFields, PendingImage};
use furrow_market::state::AppState;
use furrow_market::web::configure_app_routes;
use furrow_market::wizard::{ListingBackend, ListingStep, ListingWizard, MarketplaceClient};

/// Serves the routes over a real socket on an ephemeral port.
fn serve(state: AppState) -> (String, ServerHandle) {
  let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
  let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
  let server = HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes)
  })
  .workers(1)
  .listen(listener)
  .expect("listen")
  .run();
  let handle = server.handle();
  actix_web::rt::spawn(server);
  (base_url, handle)
}

fn client(base_url: &str, token: &str) -> MarketplaceClient {
  MarketplaceClient::new(reqwest::Client::new(), base_url, token)
}

fn draft(title: &str, crop_type: Option<&str>, step: &str) -> DraftPayload {
  DraftPayload {
    fields: ListingFields {
      title: Some(title.to_string()),
      crop_type: crop_type.map(str::to_string),
      ..Default::default()
    },
    current_step: Some(step.to_string()),
  }
}

#[actix_web::test]
async fn save_draft_posts_first_then_puts_with_the_id() {
  let h = harness();
  let (base_url, server) = serve(h.state.clone());
  let farmer_a = client(&base_url, FARMER_A_TOKEN);

  let created = farmer_a
    .save_draft(None, &draft("Sweet maize", Some("maize"), "basic-info"))
    .await
    .expect("create");
  assert_eq!(created.farmer_id, *FARMER_A);
  assert_eq!(h.store.draft_count(), 1);

  let mut update = draft("Sweet maize", Some("maize"), "quantity-pricing");
  update.fields.unit = Some("bag".to_string());
  let updated = farmer_a.save_draft(Some(created.id), &update).await.expect("update");

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.fields.unit.as_deref(), Some("bag"));
  assert_eq!(updated.current_step.as_deref(), Some("quantity-pricing"));
  assert_eq!(h.store.draft_count(), 1);

  let fetched = farmer_a.get_draft(created.id).await.expect("get");
  assert_eq!(fetched.fields.unit.as_deref(), Some("bag"));
  assert_eq!(farmer_a.list_drafts().await.expect("list").len(), 1);

  server.stop(true).await;
}

#[actix_web::test]
async fn rejected_draft_comes_back_as_field_errors() {
  let h = harness();
  let (base_url, server) = serve(h.state.clone());

  let err = client(&base_url, FARMER_A_TOKEN)
    .save_draft(None, &draft("Sweet maize", None, "basic-info"))
    .await
    .unwrap_err();
  match err {
    AppError::Validation(details) => {
      assert!(details.iter().any(|d| d.field == "cropType" && d.message == "is required"));
    }
    other => panic!("expected validation error, got {other:?}"),
  }
  assert_eq!(h.store.draft_count(), 0);

  server.stop(true).await;
}

#[actix_web::test]
async fn status_codes_map_back_onto_errors() {
  let h = harness();
  let foreign = h.store.seed_draft(*FARMER_B, "someone else's");
  let (base_url, server) = serve(h.state.clone());

  let err = client(&base_url, "revoked-token").list_drafts().await.unwrap_err();
  assert!(matches!(err, AppError::Unauthorized(_)));

  let farmer_a = client(&base_url, FARMER_A_TOKEN);
  let err = farmer_a.get_draft(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));

  let err = farmer_a
    .save_draft(Some(foreign.id), &draft("taken over", Some("maize"), "basic-info"))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
  let err = farmer_a.delete_draft(foreign.id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
  assert_eq!(h.store.draft_count(), 1);

  server.stop(true).await;
}

#[actix_web::test]
async fn images_upload_and_delete_through_the_client() {
  let h = harness();
  let (base_url, server) = serve(h.state.clone());
  let farmer_a = client(&base_url, FARMER_A_TOKEN);

  let uploaded = farmer_a
    .upload_images(vec![PendingImage {
      filename: "front.jpg".to_string(),
      mime_type: "image/jpeg".to_string(),
      bytes: vec![1; 64],
    }])
    .await
    .expect("upload");
  assert_eq!(uploaded.len(), 1);
  assert!(uploaded[0].key.starts_with(&format!("{}/", *FARMER_A)));
  assert_eq!(h.storage.keys(), vec![uploaded[0].key.clone()]);

  let err = client(&base_url, FARMER_B_TOKEN)
    .delete_image(&uploaded[0].key)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));

  farmer_a.delete_image(&uploaded[0].key).await.expect("delete");
  assert!(h.storage.keys().is_empty());

  server.stop(true).await;
}

#[actix_web::test]
async fn wizard_runs_end_to_end_over_http() {
  let h = harness();
  let (base_url, server) = serve(h.state.clone());
  let wizard = ListingWizard::new(Arc::new(client(&base_url, FARMER_A_TOKEN)));
  let mut session = wizard.start();

  session.edit(|form| {
    form.fields.title = Some("Sweet maize".to_string());
    form.fields.crop_type = Some("maize".to_string());
    form.fields.quality_grade = Some("grade_a".to_string());
  });
  wizard.next(&mut session);
  wizard.save_draft(&mut session).await.expect("save");
  let draft_id = session.data().read().draft_id.expect("draft id");
  assert_eq!(h.store.drafts.lock()[0].id, draft_id);

  session.edit(|form| {
    form.fields.quantity_available = Some(100.0);
    form.fields.unit = Some("bag".to_string());
    form.fields.price_per_unit = Some(50_000.0);
    form.fields.harvest_date = NaiveDate::from_ymd_opt(2026, 3, 14);
    form.fields.location = Some("Nakuru".to_string());
    form.fields.images = Some(vec!["https://storage.test/public/product-images/a.jpg".to_string()]);
  });
  for _ in 0..3 {
    assert!(matches!(wizard.next(&mut session), Transition::Moved { .. }));
  }
  assert_eq!(wizard.current_step(&session), ListingStep::Review);

  assert_eq!(wizard.submit(&mut session).await.expect("submit"), Transition::Submitted);
  assert_eq!(h.store.draft_count(), 0);
  let products = h.store.products.lock();
  assert_eq!(products.len(), 1);
  assert_eq!(products[0].farmer_id, *FARMER_A);
  drop(products);
  assert_eq!(
    session.data().read().product.as_ref().map(|p| p.total_value()),
    Some(5_000_000.0)
  );

  server.stop(true).await;
}
