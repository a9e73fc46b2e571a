use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::session::SESSION_COOKIE;
use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx answer from the payment or identity service.
    #[error("Upstream error ({status}): {message}")]
    Upstream {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { status: 504, .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message suitable for showing to staff in an alert box.
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) | AppError::Forbidden(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::Unauthorized => "Your session has expired, please sign in again".into(),
            AppError::Upstream { message, .. } => format!("API error: {}", message),
            AppError::Internal(_) => "An unexpected error occurred".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Unauthorized) {
            let mut response = Redirect::to("/login").into_response();
            let clear = format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", SESSION_COOKIE);
            if let Ok(value) = clear.parse() {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            return response;
        }

        let status = self.status_code();
        match &self {
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::Upstream { status, code, message } => {
                tracing::warn!(status = %status, code = ?code, "Upstream error: {}", message)
            }
            _ => {}
        }

        (status, Html(views::error_page(status, &self.user_message()))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Internal(format!("Database error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Internal(format!("Connection pool error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::Upstream {
                status: StatusCode::GATEWAY_TIMEOUT.as_u16(),
                code: None,
                message: "request timed out".into(),
            };
        }
        AppError::Upstream {
            status: err
                .status()
                .map(|s| s.as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY.as_u16()),
            code: None,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}
