//! HTTP handlers and route configuration.

mod health;
mod posts;


use actix_web::web;

use crate::middleware::error::{json_error_handler, query_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route("/health", web::get().to(health::health_check))
            // Blog posts
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::get_post))
                    .route(web::put().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            ),
    );
}
