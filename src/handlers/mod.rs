mod auth;
mod dashboard;
mod payments;
mod refunds;
mod subscriptions;

pub use auth::*;
pub use dashboard::*;
pub use payments::*;
pub use refunds::*;
pub use subscriptions::*;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::require_session;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard))
        // Payments
        .route("/dashboard/payments", get(list_payments).post(create_payment))
        .route("/dashboard/payments/new", get(new_payment))
        .route("/dashboard/payments/{id}", get(payment_detail))
        // Subscriptions
        .route(
            "/dashboard/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/dashboard/subscriptions/new", get(new_subscription))
        .route("/dashboard/subscriptions/{id}", get(subscription_detail))
        .route("/dashboard/subscriptions/{id}/cancel", post(cancel_subscription))
        .route("/dashboard/subscriptions/{id}/resume", post(resume_subscription))
        // Refunds
        .route("/dashboard/refunds", get(list_refunds).post(create_refund))
        .route("/dashboard/refunds/new", get(new_refund))
        .route("/dashboard/refunds/{id}", get(refund_detail))
        .route("/auth/logout", post(logout))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/health", get(health))
        .route("/login", get(login_page))
        .route("/auth/login", get(start_login))
        .route("/auth/callback", get(oauth_callback))
        .merge(dashboard_routes)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Turn an upstream failure into an in-page message. A rejected token still
/// aborts the request so the browser is sent back to the login page.
fn soft_fail<T>(result: Result<T>) -> Result<std::result::Result<T, String>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => Ok(Err(e.user_message())),
    }
}

/// A form page re-rendered with an error message.
fn rerender(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}
