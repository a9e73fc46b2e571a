use std::sync::Arc;

use crate::client::{IdentityClient, PaymentServiceClient};
use crate::config::Config;
use crate::error::Result;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub payments: PaymentServiceClient,
    pub identity: IdentityClient,
    /// Absolute URL the identity service redirects back to after login
    pub oauth_callback_url: String,
    /// Rows requested per list page
    pub page_size: u32,
    pub session_ttl_hours: i64,
    /// Mark the session cookie `Secure` (off in dev mode, where plain http is normal)
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(config: &Config, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        Ok(Self {
            sessions,
            payments: PaymentServiceClient::new(
                &config.payment_service_url,
                config.http_timeout_secs,
            )?,
            identity: IdentityClient::new(&config.auth_service_url, config.http_timeout_secs)?,
            oauth_callback_url: config.oauth_callback_url(),
            page_size: config.page_size,
            session_ttl_hours: config.session_ttl_hours,
            secure_cookies: !config.dev_mode,
        })
    }
}
