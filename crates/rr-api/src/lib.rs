//! # rr-api
//!
//! The JSON routing and orchestration layer for Rusty-Rig.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use error::ApiError;
pub use handlers::AppState;

/// Configures the configurator and forum routes.
///
/// Everything is mounted under `/api` so a binary can serve other content
/// beside it.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Catalog & presets
            .route("/catalog", web::get().to(handlers::list_components))
            .route("/catalog/categories", web::get().to(handlers::list_categories))
            .route("/catalog/brands/{category}", web::get().to(handlers::list_brands))
            .route("/presets", web::get().to(handlers::list_presets))
            // Current build
            .route("/build", web::get().to(handlers::get_build))
            .route("/build", web::delete().to(handlers::clear_build))
            .route("/build/presets/{preset_id}", web::post().to(handlers::load_preset))
            .route("/build/{category}", web::put().to(handlers::select_component))
            .route("/build/{category}", web::delete().to(handlers::remove_component))
            // Forum
            .route("/forum/posts", web::get().to(handlers::list_posts))
            .route("/forum/posts", web::post().to(handlers::create_post))
            .route("/forum/posts/{post_id}", web::get().to(handlers::open_post))
            .route("/forum/posts/{post_id}/like", web::post().to(handlers::like_post))
            .route("/forum/posts/{post_id}/replies", web::post().to(handlers::add_reply))
            .route(
                "/forum/posts/{post_id}/replies/{reply_id}/like",
                web::post().to(handlers::like_reply),
            ),
    );
}
