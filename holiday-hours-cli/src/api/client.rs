//! Zoom Phone REST client
//!
//! Thin wrapper over `reqwest` that injects the bearer token, turns every
//! non-success response into an error and exposes the handful of endpoints
//! the holiday sync needs. Nothing here retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::auth::TokenProvider;
use super::constants::{self, HOLIDAY_SUB_SETTING};
use super::models::{
    CallHandlingSettings, HolidaySettingRequest, HolidayWindowPatch, NewHoliday,
};
use crate::sync::HolidayEndpoint;

pub struct PhoneClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl PhoneClient {
    /// Create a client with its own HTTP connection pool
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::with_http_client(http, base_url, tokens))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Fail fast if no token can be obtained
    pub async fn verify_token(&self) -> Result<()> {
        self.tokens.access_token().await.map(|_| ())
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.request(Method::GET, path).await?.query(query);
        let response = self.send(request, &Method::GET, path).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from GET {}", path))
    }

    /// Fetch an extension's call-handling settings
    pub async fn call_handling_settings(&self, extension_id: &str) -> Result<CallHandlingSettings> {
        let path = constants::call_handling_settings_path(extension_id);
        self.get_json(&path, &[])
            .await
            .with_context(|| format!("Failed to fetch call handling settings for extension {}", extension_id))
    }

    async fn send_json<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        let request = self.request(method.clone(), path).await?.json(body);
        self.send(request, &method, path).await.map(|_| ())
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self
            .tokens
            .access_token()
            .await
            .context("Failed to obtain access token")?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, method: &Method, path: &str) -> Result<Response> {
        debug!("{} {}", method, path);
        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} could not be sent", method, path))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} {} failed with status {}: {}", method, path, status, body);
        }
        Ok(response)
    }
}

#[async_trait]
impl HolidayEndpoint for PhoneClient {
    async fn add_holiday(&self, extension_id: &str, name: &str, from: &str, to: &str) -> Result<()> {
        let body = HolidaySettingRequest {
            settings: NewHoliday { name, from, to },
            sub_setting_type: HOLIDAY_SUB_SETTING,
        };
        self.send_json(Method::POST, &constants::holiday_hours_path(extension_id), &body)
            .await
            .with_context(|| format!("Failed to add holiday '{}' to extension {}", name, extension_id))
    }

    async fn update_holiday(
        &self,
        extension_id: &str,
        holiday_id: &str,
        from: &str,
        to: &str,
    ) -> Result<()> {
        let body = HolidaySettingRequest {
            settings: HolidayWindowPatch {
                holiday_id,
                from,
                to,
            },
            sub_setting_type: HOLIDAY_SUB_SETTING,
        };
        self.send_json(Method::PATCH, &constants::holiday_hours_path(extension_id), &body)
            .await
            .with_context(|| {
                format!("Failed to update holiday {} on extension {}", holiday_id, extension_id)
            })
    }

    async fn delete_holiday(&self, extension_id: &str, holiday_id: &str) -> Result<()> {
        let path = constants::holiday_hours_path(extension_id);
        let request = self
            .request(Method::DELETE, &path)
            .await?
            .query(&[("holiday_id", holiday_id)]);
        self.send(request, &Method::DELETE, &path)
            .await
            .map(|_| ())
            .with_context(|| {
                format!("Failed to delete holiday {} from extension {}", holiday_id, extension_id)
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::auth::StaticToken;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn test_client(server: &MockServer) -> PhoneClient {
        PhoneClient::with_http_client(
            reqwest::Client::new(),
            server.uri(),
            Arc::new(StaticToken::new("test-token")),
        )
    }

    #[tokio::test]
    async fn test_add_holiday_posts_holiday_sub_setting() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/phone/extension/ext1/call_handling/settings/holiday_hours"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({
                "settings": {"name": "Christmas", "from": "2024-12-25", "to": "2024-12-26"},
                "sub_setting_type": "holiday"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"holiday_id": "new"})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .add_holiday("ext1", "Christmas", "2024-12-25", "2024-12-26")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_holiday_patches_window_without_name() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/phone/extension/ext1/call_handling/settings/holiday_hours"))
            .and(body_json(json!({
                "settings": {"holiday_id": "h1", "from": "2024-11-27", "to": "2024-11-29"},
                "sub_setting_type": "holiday"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .update_holiday("ext1", "h1", "2024-11-27", "2024-11-29")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_holiday_passes_id_as_query() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/phone/extension/ext1/call_handling/settings/holiday_hours"))
            .and(query_param("holiday_id", "h2"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server).delete_holiday("ext1", "h2").await.unwrap();
    }

    // With the clock paused, any client-side timer would fire long before the
    // server answers, so this only passes when calls wait as long as needed.
    #[tokio::test(start_paused = true)]
    async fn test_slow_mutation_is_not_timed_out() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/phone/extension/ext1/call_handling/settings/holiday_hours"))
            .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(300)))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            PhoneClient::new(server.uri(), Arc::new(StaticToken::new("test-token"))).unwrap();

        client.delete_holiday("ext1", "h1").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_mutation_reports_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Holiday does not exist"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .delete_holiday("ext1", "gone")
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("Failed to delete holiday gone from extension ext1"));
        assert!(message.contains("404"));
        assert!(message.contains("Holiday does not exist"));
    }
}
