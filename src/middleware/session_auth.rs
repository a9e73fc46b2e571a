use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::crypto::hash_secret;
use crate::error::{AppError, Result};
use crate::session::{SESSION_COOKIE, Session};
use crate::state::AppState;
use crate::views::{Nav, PageChrome};

/// The signed-in staff member, inserted into request extensions by
/// [`require_session`].
#[derive(Clone)]
pub struct SessionContext {
    pub session: Session,
}

impl SessionContext {
    /// Access token for calls to the payment service.
    pub fn token(&self) -> &str {
        &self.session.access_token
    }

    pub fn chrome<'a>(&'a self, title: &'a str, nav: Nav) -> PageChrome<'a> {
        PageChrome {
            title,
            nav,
            user: &self.session.user,
            csrf_token: &self.session.csrf_token,
        }
    }

    pub fn check_csrf(&self, submitted: &str) -> Result<()> {
        if self.session.verify_csrf(submitted) {
            Ok(())
        } else {
            tracing::warn!(user = %self.session.user.email, "CSRF token mismatch");
            Err(AppError::Forbidden("Invalid or missing CSRF token".into()))
        }
    }
}

/// Look up the session named by the cookie, refreshing its access token when
/// it is about to expire.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let raw_id = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let now = Utc::now().timestamp();
    let mut session = state
        .sessions
        .get(&hash_secret(raw_id), now)?
        .ok_or(AppError::Unauthorized)?;

    if session.needs_refresh(now) {
        session = refresh_session(&state, session).await?;
    }

    request.extensions_mut().insert(SessionContext { session });
    Ok(next.run(request).await)
}

async fn refresh_session(state: &AppState, mut session: Session) -> Result<Session> {
    let Some(refresh_token) = session.refresh_token.clone() else {
        return Ok(session);
    };

    match state.identity.refresh(&refresh_token).await {
        Ok(tokens) => {
            state.sessions.update_tokens(
                &session.id_hash,
                &tokens.access_token,
                tokens.refresh_token.as_deref(),
            )?;
            session.access_token = tokens.access_token;
            if let Some(rotated) = tokens.refresh_token {
                session.refresh_token = Some(rotated);
            }
            tracing::debug!(user = %session.user.email, "Refreshed access token");
            Ok(session)
        }
        Err(e) => {
            tracing::warn!(
                user = %session.user.email,
                error = %e,
                "Token refresh failed, ending session"
            );
            state.sessions.delete(&session.id_hash)?;
            Err(AppError::Unauthorized)
        }
    }
}
