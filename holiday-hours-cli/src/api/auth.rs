//! Bearer token providers
//!
//! The phone client only needs "a bearer token"; how it is obtained sits
//! behind [`TokenProvider`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::models::TokenResponse;
use crate::config::Credentials;

/// Tokens are refreshed this long before the server-reported expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a bearer token valid for the next request
    async fn access_token(&self) -> Result<String>;
}

/// A fixed, pre-issued token
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    refresh_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.refresh_at.is_none_or(|at| Instant::now() < at)
    }
}

/// Server-to-server OAuth: exchanges account credentials for an access token
#[derive(Debug)]
pub struct ClientCredentialsAuth {
    http: reqwest::Client,
    oauth_base_url: String,
    credentials: Credentials,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentialsAuth {
    pub fn new(
        http: reqwest::Client,
        oauth_base_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            http,
            oauth_base_url: oauth_base_url.into(),
            credentials,
            cached: Mutex::new(None),
        }
    }

    async fn request_token(&self) -> Result<TokenResponse> {
        let url = format!("{}/token", self.oauth_base_url.trim_end_matches('/'));
        debug!("Requesting access token for account {}", self.credentials.account_id);

        let response = self
            .http
            .post(&url)
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.credentials.account_id.as_str()),
            ])
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .send()
            .await
            .context("Failed to reach the OAuth token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token request failed with status {}: {}", status, body);
        }

        response
            .json::<TokenResponse>()
            .await
            .context("Failed to parse token response")
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsAuth {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.token.clone());
        }

        let response = self.request_token().await?;
        let refresh_at = response.expires_in.map(|secs| {
            Instant::now() + Duration::from_secs(secs).saturating_sub(EXPIRY_MARGIN)
        });

        let token = response.access_token;
        *cached = Some(CachedToken {
            token: token.clone(),
            refresh_at,
        });
        Ok(token)
    }
}
