use std::env;

use rand::RngCore;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Public URL of this dashboard (used to build the OAuth redirect_uri)
    pub base_url: String,
    pub payment_service_url: String,
    pub auth_service_url: String,
    pub session_database_path: String,
    /// Secret the session encryption key is derived from
    pub session_secret: String,
    pub session_ttl_hours: i64,
    /// Rows requested per list page (service caps at 100)
    pub page_size: u32,
    pub http_timeout_secs: u64,
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("PAYDESK_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if dev_mode => {
                tracing::warn!("SESSION_SECRET not set, using an ephemeral secret (dev mode)");
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                hex::encode(bytes)
            }
            _ => anyhow::bail!("SESSION_SECRET must be set outside dev mode"),
        };

        let session_ttl_hours: i64 = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|h| *h > 0)
            .unwrap_or(12);

        let page_size: u32 = env::var("PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20)
            .clamp(1, 100);

        let http_timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            base_url: base_url.trim_end_matches('/').to_string(),
            payment_service_url: env::var("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            auth_service_url: env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string())
                .trim_end_matches('/')
                .to_string(),
            session_database_path: env::var("SESSION_DATABASE_PATH")
                .unwrap_or_else(|_| "paydesk_sessions.db".to_string()),
            session_secret,
            session_ttl_hours,
            page_size,
            http_timeout_secs,
            dev_mode,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where the identity service sends the browser back after login.
    pub fn oauth_callback_url(&self) -> String {
        format!("{}/auth/callback", self.base_url)
    }
}
