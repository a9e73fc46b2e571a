use reqwest::Client;
use serde::Serialize;

use super::{build_http_client, decode_response};
use crate::error::{AppError, Result};
use crate::models::{TokenPair, User};

const SERVICE: &str = "identity-service";

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Client for the external identity service (OAuth login, user info, refresh).
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    base_url: String,
}

impl IdentityClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Where to send the browser to start a Google login.
    pub fn login_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/api/auth/google/login?redirect_uri={}",
            self.base_url,
            urlencoding::encode(redirect_uri)
        )
    }

    pub async fn current_user(&self, access_token: &str) -> Result<User> {
        let response = self
            .client
            .get(format!("{}/api/auth/me", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?;
        decode_response(SERVICE, response).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let response = self
            .client
            .post(format!("{}/api/auth/refresh", self.base_url))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let pair: TokenPair = decode_response(SERVICE, response).await?;
        if pair.access_token.is_empty() {
            return Err(AppError::Unauthorized);
        }
        Ok(pair)
    }

    pub async fn health(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Upstream {
                status: response.status().as_u16(),
                code: None,
                message: "identity service is unhealthy".into(),
            })
        }
    }
}
