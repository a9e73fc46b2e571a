mod identity;
mod payment_service;

pub use identity::IdentityClient;
pub use payment_service::PaymentServiceClient;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::ApiErrorEnvelope;

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("paydesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Decode a JSON response, turning failures into `AppError`.
///
/// The payment service wraps errors as `{"error": {"code", "message"}}`;
/// bodies that don't match fall back to the raw text.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    service: &str,
    response: Response,
) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(|e| {
            tracing::error!(service = service, error = %e, "Failed to parse response");
            AppError::Internal(format!("Failed to parse {} response: {}", service, e))
        });
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => (Some(envelope.error.code), envelope.error.message),
        Err(_) if body.trim().is_empty() => (
            None,
            status.canonical_reason().unwrap_or("request failed").to_string(),
        ),
        Err(_) => (None, body),
    };

    match status {
        StatusCode::UNAUTHORIZED => {
            tracing::warn!(service = service, "Upstream rejected access token");
            Err(AppError::Unauthorized)
        }
        StatusCode::NOT_FOUND => Err(AppError::NotFound(message)),
        _ => {
            tracing::error!(
                service = service,
                status = %status,
                code = ?code,
                body = %message,
                "Upstream returned error"
            );
            Err(AppError::Upstream {
                status: status.as_u16(),
                code,
                message,
            })
        }
    }
}
