// furrow_market/src/web/routes.rs

use actix_web::web;

use crate::errors::AppError;
use crate::web::handlers::{
  dashboard_handlers, draft_handlers, health_handlers, image_handlers, product_handlers,
};

/// Path extractor failures become the same 404 body the handlers produce.
/// Bodies and query strings are parsed inside the handlers.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
  cfg.app_data(
    web::PathConfig::default()
      .error_handler(|err, _req| AppError::NotFound(format!("no resource at this path: {}", err)).into()),
  );
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  extractor_configs(cfg);

  cfg.service(
    web::scope("/api")
      .route("/test", web::get().to(health_handlers::connectivity_probe_handler))
      .service(
        web::scope("/farmer")
          .service(
            web::resource("/drafts")
              .route(web::post().to(draft_handlers::create_draft_handler))
              .route(web::get().to(draft_handlers::get_drafts_handler))
              .route(web::put().to(draft_handlers::update_draft_handler))
              .route(web::delete().to(draft_handlers::delete_draft_handler)),
          )
          // Registered ahead of "/products/{product_id}" so "images" is never read as an id.
          .service(
            web::resource("/products/images")
              .route(web::post().to(image_handlers::upload_images_handler))
              .route(web::delete().to(image_handlers::delete_image_handler)),
          )
          .service(
            web::resource("/products")
              .route(web::post().to(product_handlers::create_product_handler))
              .route(web::get().to(product_handlers::list_products_handler)),
          )
          .route(
            "/products/{product_id}",
            web::get().to(product_handlers::get_product_handler),
          )
          .route(
            "/products/{product_id}/status",
            web::put().to(product_handlers::update_product_status_handler),
          )
          .route("/dashboard", web::get().to(dashboard_handlers::dashboard_handler)),
      ),
  );
}
