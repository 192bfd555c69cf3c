//! Shared HTTP transport for model backends

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::backend::endpoint::EndpointPool;
use crate::config::BackendConfig;
use crate::error::{AppError, Result};

/// Error body returned by inference servers, e.g. `{"error": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client bound to the endpoints of one backend
pub struct BackendHttpClient {
    name: String,
    client: Client,
    endpoints: EndpointPool,
    health_check_path: Option<String>,
    health_check_timeout: Duration,
    auth_token: Option<String>,
    auth_header_name: Option<String>,
}

impl BackendHttpClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        // Get auth token from environment if specified
        let auth_token = match &config.auth.token_env {
            Some(token_env) => std::env::var(token_env).ok(),
            None => config.auth.api_key.clone(),
        };

        Ok(Self {
            name: config.name.clone(),
            client,
            endpoints: EndpointPool::new(&config.name, &config.endpoints),
            health_check_path: config.health_check.path.clone(),
            health_check_timeout: Duration::from_secs(config.health_check.timeout_secs),
            auth_token,
            auth_header_name: config.auth.header_name.clone(),
        })
    }

    pub fn endpoints(&self) -> &EndpointPool {
        &self.endpoints
    }

    /// Get headers with authentication
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            match &self.auth_header_name {
                Some(header_name) => {
                    if let (Ok(name), Ok(value)) = (
                        HeaderName::from_bytes(header_name.as_bytes()),
                        HeaderValue::from_str(token),
                    ) {
                        headers.insert(name, value);
                    }
                }
                None => {
                    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                        headers.insert(AUTHORIZATION, value);
                    }
                }
            }
        }

        headers
    }

    fn url(endpoint: &str, path: &str) -> String {
        if path.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}/{}", endpoint.trim_end_matches('/'), path.trim_start_matches('/'))
        }
    }

    /// POST a JSON body to the next healthy endpoint and decode the JSON reply
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let endpoint = self
            .endpoints
            .next_endpoint()
            .ok_or_else(|| AppError::NoHealthyBackends(self.name.clone()))?;
        let url = Self::url(&endpoint, path);

        debug!(backend = %self.name, url = %url, "Sending model request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                self.endpoints.mark_unhealthy(&endpoint);
                AppError::HttpClient(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            self.endpoints.mark_unhealthy(&endpoint);
            AppError::HttpClient(e)
        })?;

        if !status.is_success() {
            if status.is_server_error() {
                self.endpoints.mark_unhealthy(&endpoint);
            }
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(AppError::ModelInvocation(format!(
                "Backend '{}' returned {}: {}",
                self.name, status, message
            )));
        }

        self.endpoints.mark_healthy(&endpoint);

        if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
            return Err(AppError::ModelInvocation(format!(
                "Backend '{}' reported: {}",
                self.name, body.error
            )));
        }

        serde_json::from_str::<R>(&text).map_err(|e| {
            error!(backend = %self.name, error = %e, "Failed to parse model response");
            AppError::ModelInvocation(format!("Failed to parse response: {}", e))
        })
    }

    /// Probe every endpoint's health path; without a path, report cached state
    pub async fn health_check(&self) -> bool {
        let Some(path) = &self.health_check_path else {
            return self.endpoints.any_healthy();
        };

        let mut any_healthy = false;
        for endpoint in self.endpoints.urls() {
            let url = Self::url(&endpoint, path);

            let result = self
                .client
                .get(&url)
                .headers(self.headers())
                .timeout(self.health_check_timeout)
                .send()
                .await;

            match result {
                // 401 means the server is up but wants credentials
                Ok(response) if response.status().is_success() || response.status().as_u16() == 401 => {
                    self.endpoints.mark_healthy(&endpoint);
                    any_healthy = true;
                    debug!(backend = %self.name, endpoint = %endpoint, "Health check passed");
                }
                Ok(response) => {
                    self.endpoints.mark_unhealthy(&endpoint);
                    debug!(
                        backend = %self.name,
                        endpoint = %endpoint,
                        status = %response.status(),
                        "Health check failed"
                    );
                }
                Err(e) => {
                    self.endpoints.mark_unhealthy(&endpoint);
                    debug!(backend = %self.name, endpoint = %endpoint, error = %e, "Health check failed");
                }
            }
        }

        any_healthy
    }
}
