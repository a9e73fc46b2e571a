//! Server-rendered HTML for the dashboard.

mod components;
mod dashboard;
mod layout;
mod login;
mod payments;
mod refunds;
mod subscriptions;

pub use components::*;
pub use dashboard::*;
pub use layout::*;
pub use login::*;
pub use payments::*;
pub use refunds::*;
pub use subscriptions::*;

use std::borrow::Cow;

use axum::http::StatusCode;

pub(crate) fn esc(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

pub(crate) fn attr(s: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// Standalone page for errors that happen outside the dashboard layout.
pub fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{code} {reason}</title>{style}</head>
<body class="centered">
<div class="card narrow">
<h1>{code} {reason}</h1>
<div class="alert alert-destructive">{message}</div>
<p><a href="/dashboard">Back to dashboard</a></p>
</div>
</body>
</html>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        style = layout::STYLE,
        message = esc(message),
    )
}
