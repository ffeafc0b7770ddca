//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::posts::PostService;
use crate::server::routes::{
    create_post_handler, delete_post_handler, get_post_handler, get_posts_by_author_handler,
    get_replies_handler, health_handler, USER_ID_HEADER,
};

/// Shared application state
///
/// Built once at startup and handed to every handler; there are no
/// process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

/// Build the Axum application router
pub fn build_app(posts: Arc<PostService>, request_timeout: Duration) -> Router {
    let app_state = AppState { posts };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    Router::new()
        .route("/posts", axum::routing::post(create_post_handler))
        .route("/posts/:id", get(get_post_handler).delete(delete_post_handler))
        .route("/posts/:id/replies", get(get_replies_handler))
        .route("/posts/author/:id", get(get_posts_by_author_handler))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
