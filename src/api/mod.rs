//! HTTP surface: router assembly, shared state, handlers per resource.

pub mod auth;
pub mod dealerships;
pub mod drivers;
pub mod error;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod payments;
pub mod ratings;
pub mod response;
pub mod users;

use std::sync::Arc;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use crate::config::AppConfig;
use crate::metrics;
use crate::storage::Database;

pub use error::ApiError;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<AppConfig>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(health::metrics_text))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/auth/dealership-register",
            post(auth::dealership_register),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user).put(users::update_user),
        )
        .route("/api/dealerships", get(dealerships::list))
        .route("/api/dealerships/approve", post(dealerships::approve))
        .route("/api/dealerships/reject", post(dealerships::reject))
        .route("/api/drivers", get(drivers::list))
        .route("/api/jobs", get(jobs::list))
        .route("/api/jobs/create", post(jobs::create))
        .route("/api/jobs/accept", post(jobs::accept))
        .route("/api/jobs/start", post(jobs::start))
        .route("/api/jobs/complete", post(jobs::complete))
        .route("/api/jobs/cancel", post(jobs::cancel))
        .route("/api/payments", get(payments::list))
        .route("/api/payments/summary", get(payments::summary))
        .route("/api/ratings", get(ratings::list).post(ratings::create))
        .route("/api/messages", get(messages::list).post(messages::send))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

/// Counts every served request by method, matched route and status code.
async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    metrics::record_http_request(&method, &route, response.status().as_u16());
    response
}
