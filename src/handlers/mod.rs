pub mod api;
pub mod pages;

pub use api::{validate, AppState, ValidateRequest, ValidationReport};
pub use pages::{dismiss, index, login, login_page, notification_fragment};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Page routes
        .route("/", get(index))
        .route("/login", get(login_page).post(login))
        .route("/login/dismiss", post(dismiss))
        .route("/login/notification", get(notification_fragment))
        // API routes
        .route("/api/validate", post(validate))
        // State and middleware
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
