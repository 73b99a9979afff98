// furrow_market/tests/draft_api_tests.rs

#[macro_use]
mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use common::*;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::test]
async fn create_draft_returns_201_with_owned_row() {
  let h = harness();
  let app = test_app!(h.state);

  let req = test::TestRequest::post()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .set_json(json!({ "title": "Sweet maize", "cropType": "maize", "currentStep": "basic-info" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["draft"]["title"], "Sweet maize");
  assert_eq!(body["draft"]["farmerId"], FARMER_A.to_string());
  assert_eq!(body["draft"]["currentStep"], "basic-info");
  assert_eq!(h.store.draft_count(), 1);
}

#[actix_web::test]
async fn session_cookie_authenticates_like_bearer() {
  let h = harness();
  let app = test_app!(h.state);

  let req = test::TestRequest::get()
    .uri("/api/farmer/drafts")
    .cookie(Cookie::new("sb-access-token", FARMER_A_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_crop_type_is_rejected_with_details() {
  let h = harness();
  let app = test_app!(h.state);

  let req = test::TestRequest::post()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .set_json(json!({ "title": "Sweet maize" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Validation failed");
  let details = body["details"].as_array().expect("details array");
  assert!(!details.is_empty());
  assert!(details.iter().any(|d| d["field"] == "cropType"));
  assert_eq!(h.store.draft_count(), 0);
}

#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
  let h = harness();
  let app = test_app!(h.state);

  let req = test::TestRequest::post()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .insert_header(("Content-Type", "application/json"))
    .set_payload("{\"title\": ")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn slow_session_rejection_outranks_a_malformed_request() {
  let mut h = harness();
  h.state.sessions = Arc::new(StaticSessions::two_farmers().with_latency(Duration::from_millis(20)));
  let app = test_app!(h.state);

  let requests = vec![
    test::TestRequest::post()
      .uri("/api/farmer/drafts")
      .insert_header(("Content-Type", "application/json"))
      .set_payload("{\"title\": "),
    test::TestRequest::put()
      .uri("/api/farmer/drafts")
      .insert_header(("Content-Type", "application/json"))
      .set_payload("not json"),
    test::TestRequest::get().uri("/api/farmer/drafts?id=not-a-uuid"),
    test::TestRequest::post()
      .uri("/api/farmer/products")
      .insert_header(("Content-Type", "application/json"))
      .set_payload("[1, 2"),
  ];
  for req in requests {
    let req = req.insert_header(bearer("revoked-token")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // A valid session still gets the 400 once it resolves.
  let req = test::TestRequest::post()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .insert_header(("Content-Type", "application/json"))
    .set_payload("{\"title\": ")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["details"][0]["field"], "body");
}

#[actix_web::test]
async fn every_draft_route_requires_a_session() {
  let h = harness();
  let app = test_app!(h.state);

  let requests = vec![
    test::TestRequest::post()
      .uri("/api/farmer/drafts")
      .set_json(json!({ "title": "x", "cropType": "y" })),
    test::TestRequest::get().uri("/api/farmer/drafts"),
    test::TestRequest::put()
      .uri("/api/farmer/drafts")
      .set_json(json!({ "id": uuid::Uuid::new_v4(), "title": "x", "cropType": "y" })),
    test::TestRequest::delete().uri(&format!("/api/farmer/drafts?id={}", uuid::Uuid::new_v4())),
    test::TestRequest::get()
      .uri("/api/farmer/drafts")
      .insert_header(bearer("revoked-token")),
  ];
  for req in requests {
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }
}

#[actix_web::test]
async fn get_by_id_only_returns_the_callers_draft() {
  let h = harness();
  let draft = h.store.seed_draft(*FARMER_A, "Owned by A");
  let app = test_app!(h.state);

  let owner = test::TestRequest::get()
    .uri(&format!("/api/farmer/drafts?id={}", draft.id))
    .insert_header(bearer(FARMER_A_TOKEN))
    .to_request();
  let resp = test::call_service(&app, owner).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["draft"]["id"], draft.id.to_string());

  let stranger = test::TestRequest::get()
    .uri(&format!("/api/farmer/drafts?id={}", draft.id))
    .insert_header(bearer(FARMER_B_TOKEN))
    .to_request();
  let resp = test::call_service(&app, stranger).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_is_scoped_and_most_recent_first() {
  let h = harness();
  h.store.seed_draft(*FARMER_A, "older");
  h.store.seed_draft(*FARMER_B, "someone else's");
  h.store.seed_draft(*FARMER_A, "newer");
  let app = test_app!(h.state);

  let req = test::TestRequest::get()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let titles: Vec<&str> = body["drafts"]
    .as_array()
    .expect("drafts array")
    .iter()
    .map(|d| d["title"].as_str().unwrap_or_default())
    .collect();
  assert_eq!(titles, vec!["newer", "older"]);
}

#[actix_web::test]
async fn update_replaces_fields_of_owned_draft() {
  let h = harness();
  let draft = h.store.seed_draft(*FARMER_A, "Maize");
  let app = test_app!(h.state);

  let req = test::TestRequest::put()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .set_json(json!({
      "id": draft.id,
      "title": "Maize, dry",
      "cropType": "maize",
      "unit": "bag",
      "currentStep": "quantity-pricing"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["draft"]["title"], "Maize, dry");
  assert_eq!(body["draft"]["unit"], "bag");
  assert_eq!(body["draft"]["currentStep"], "quantity-pricing");
}

#[actix_web::test]
async fn update_without_id_names_the_id_field() {
  let h = harness();
  let app = test_app!(h.state);

  let req = test::TestRequest::put()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .set_json(json!({ "title": "Maize", "cropType": "maize" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["details"][0]["field"], "id");
}

#[actix_web::test]
async fn update_of_foreign_draft_is_not_found_and_leaves_it_alone() {
  let h = harness();
  let draft = h.store.seed_draft(*FARMER_A, "A's maize");
  let app = test_app!(h.state);

  let req = test::TestRequest::put()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_B_TOKEN))
    .set_json(json!({ "id": draft.id, "title": "hijacked", "cropType": "maize" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let stored = h.store.drafts.lock()[0].clone();
  assert_eq!(stored.fields.title.as_deref(), Some("A's maize"));
}

#[actix_web::test]
async fn delete_of_foreign_draft_is_not_found_and_keeps_the_row() {
  let h = harness();
  let draft = h.store.seed_draft(*FARMER_A, "A's maize");
  let app = test_app!(h.state);

  let req = test::TestRequest::delete()
    .uri(&format!("/api/farmer/drafts?id={}", draft.id))
    .insert_header(bearer(FARMER_B_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(h.store.draft_count(), 1);

  let req = test::TestRequest::delete()
    .uri(&format!("/api/farmer/drafts?id={}", draft.id))
    .insert_header(bearer(FARMER_A_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(h.store.draft_count(), 0);
}

#[actix_web::test]
async fn delete_without_id_is_a_validation_error() {
  let h = harness();
  let app = test_app!(h.state);

  let req = test::TestRequest::delete()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["details"][0]["field"], "id");
}

#[actix_web::test]
async fn backend_failure_is_a_generic_500() {
  let h = harness();
  h.store.database_down.store(true, Ordering::SeqCst);
  let app = test_app!(h.state);

  let req = test::TestRequest::get()
    .uri("/api/farmer/drafts")
    .insert_header(bearer(FARMER_A_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "An internal error occurred");
}
