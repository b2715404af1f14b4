//! HTTP handlers and route configuration.

mod health;
mod posts;
mod users;


use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

use crate::middleware::error::AppError;

/// Upper bound for a whole multipart body, set above the per-file business
/// limits so oversized uploads reach the handlers and fail with 422 there.
const MULTIPART_LIMIT_BYTES: usize = 8 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        MultipartFormConfig::default()
            .total_limit(MULTIPART_LIMIT_BYTES)
            .memory_limit(MULTIPART_LIMIT_BYTES),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // User routes ("/authors" must come before "/{id}")
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(users::register))
                    .route("/login", web::post().to(users::login))
                    .route("/authors", web::get().to(users::get_authors))
                    .route("/change-avatar", web::post().to(users::change_avatar))
                    .route("/edit-user", web::post().to(users::edit_user))
                    .route("/{id}", web::get().to(users::get_user)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("", web::get().to(posts::get_posts))
                    .route("/categories/{category}", web::get().to(posts::get_cat_posts))
                    .route("/users/{id}", web::get().to(posts::get_user_posts))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::patch().to(posts::edit_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            ),
    );
}
