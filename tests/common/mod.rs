//! Shared setup for integration tests: the dashboard wired to wiremock
//! stand-ins for the payment and identity services, with in-memory sessions.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use wiremock::MockServer;

use paydesk::config::Config;
use paydesk::models::{TokenPair, User};
use paydesk::session::{MemorySessionStore, Session, SessionStore};
use paydesk::state::AppState;

pub const ACCESS_TOKEN: &str = "access-token-1";

pub struct TestApp {
    pub app: Router,
    pub payments: MockServer,
    pub identity: MockServer,
    pub sessions: Arc<MemorySessionStore>,
}

/// A signed-in browser: the cookie header to send and the session behind it.
pub struct SignedIn {
    pub cookie: String,
    pub session: Session,
}

impl SignedIn {
    pub fn csrf(&self) -> &str {
        &self.session.csrf_token
    }
}

pub fn test_config(payment_service_url: String, auth_service_url: String) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 3000,
        base_url: "http://localhost:3000".into(),
        payment_service_url,
        auth_service_url,
        session_database_path: ":memory:".into(),
        session_secret: "test-session-secret".into(),
        session_ttl_hours: 12,
        page_size: 20,
        http_timeout_secs: 5,
        dev_mode: true,
    }
}

pub async fn test_app() -> TestApp {
    test_app_with(|_| {}).await
}

/// Like [`test_app`], with a chance to adjust the config first.
pub async fn test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let payments = MockServer::start().await;
    let identity = MockServer::start().await;
    let sessions = Arc::new(MemorySessionStore::new());

    let mut config = test_config(payments.uri(), identity.uri());
    configure(&mut config);
    let state = AppState::new(&config, sessions.clone()).unwrap();

    TestApp {
        app: paydesk::app(state),
        payments,
        identity,
        sessions,
    }
}

pub fn test_user() -> User {
    User {
        id: "user-1".into(),
        email: "staff@example.com".into(),
        name: "Staff Member".into(),
        role: "admin".into(),
        is_super_admin: false,
    }
}

impl TestApp {
    pub fn sign_in(&self) -> SignedIn {
        self.sign_in_with(TokenPair {
            access_token: ACCESS_TOKEN.into(),
            refresh_token: Some("refresh-token-1".into()),
        })
    }

    pub fn sign_in_with(&self, tokens: TokenPair) -> SignedIn {
        let (raw_id, session) = Session::start(test_user(), tokens, 12);
        self.sessions.insert(&session).unwrap();
        SignedIn {
            cookie: format!("paydesk_session={}", raw_id),
            session,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.app.clone().oneshot(request).await.unwrap()
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: &str, form: &[(&str, &str)]) -> Request<Body> {
    let body = form
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should have a Location header")
        .to_str()
        .unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
}

/// An unsigned JWT carrying only `exp`; enough for the refresh check.
pub fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"user-1","exp":{}}}"#, exp));
    format!("{}.{}.signature", header, payload)
}

// ============ Upstream fixtures ============

pub fn payment_json(id: &str, status: &str, amount: i64) -> Value {
    json!({
        "id": id,
        "customer_id": "cus_1",
        "provider": "stripe",
        "provider_payment_id": format!("pi_{}", id),
        "amount": amount,
        "currency": "SEK",
        "status": status,
        "description": format!("Order {}", id),
        "created_at": "2025-10-05T14:03:00Z",
        "updated_at": "2025-10-05T14:03:00Z"
    })
}

pub fn subscription_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "customer_id": "cus_1",
        "provider": "stripe",
        "provider_subscription_id": format!("sub_{}", id),
        "status": status,
        "amount": 9900,
        "currency": "SEK",
        "interval": "month",
        "interval_count": 1,
        "current_period_start": "2025-10-01T00:00:00Z",
        "current_period_end": "2025-11-01T00:00:00Z",
        "cancel_at_period_end": false,
        "product_name": format!("Plan {}", id),
        "created_at": "2025-10-01T00:00:00Z",
        "updated_at": "2025-10-01T00:00:00Z"
    })
}

pub fn refund_json(id: &str, payment_id: &str, amount: i64) -> Value {
    json!({
        "id": id,
        "payment_id": payment_id,
        "provider": "stripe",
        "provider_refund_id": format!("re_{}", id),
        "amount": amount,
        "currency": "SEK",
        "status": "succeeded",
        "reason": "duplicate",
        "created_at": "2025-10-06T09:00:00Z",
        "updated_at": "2025-10-06T09:00:00Z"
    })
}

pub fn page_json(items: Vec<Value>, total: u64) -> Value {
    json!({ "data": items, "total": total, "limit": 20, "offset": 0 })
}

pub fn error_json(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}
