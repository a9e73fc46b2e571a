use axum::{
    extract::{Extension, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::error::Result;
use crate::extractors::{Form, Query};
use crate::forms::CsrfForm;
use crate::middleware::SessionContext;
use crate::models::TokenPair;
use crate::session::{SESSION_COOKIE, Session};
use crate::state::AppState;
use crate::views;

const AUTH_FAILED: &str = "/login?error=auth_failed";

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub error: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(views::login_page(query.error.as_deref()))
}

/// Hand the browser to the identity service's Google login.
pub async fn start_login(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.identity.login_url(&state.oauth_callback_url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Landing point after the identity service finishes the OAuth flow.
///
/// Tokens arrive in the query string. They are checked against
/// `/api/auth/me`, stored server-side, and replaced by a session cookie.
pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect)> {
    let Some(access_token) = query.access_token.filter(|t| !t.trim().is_empty()) else {
        tracing::warn!("OAuth callback without access token");
        return Ok((jar, Redirect::to(AUTH_FAILED)));
    };

    let user = match state.identity.current_user(&access_token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load user after login");
            return Ok((jar, Redirect::to(AUTH_FAILED)));
        }
    };

    let tokens = TokenPair {
        access_token,
        refresh_token: query.refresh_token.filter(|t| !t.trim().is_empty()),
    };
    let (raw_id, session) = Session::start(user, tokens, state.session_ttl_hours);
    state.sessions.insert(&session)?;
    tracing::info!(user = %session.user.email, "Staff signed in");

    let cookie = Cookie::build((SESSION_COOKIE, raw_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies);

    Ok((jar.add(cookie), Redirect::to("/dashboard")))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    jar: CookieJar,
    Form(form): Form<CsrfForm>,
) -> Result<(CookieJar, Redirect)> {
    ctx.check_csrf(&form.csrf_token)?;
    state.sessions.delete(&ctx.session.id_hash)?;
    tracing::info!(user = %ctx.session.user.email, "Staff signed out");

    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/login"),
    ))
}
