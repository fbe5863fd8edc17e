//! reqwest implementation of [`VehicleGateway`]

use std::time::Duration;

use async_trait::async_trait;
use fleet_domain::model::LocationUpdate;
use fleet_domain::repository::VehicleGateway;
use fleet_types::{TransportError, Vehicle};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, warn};

const LIST_PATH: &str = "/vehicles/list-with-paginate";

/// Connection settings for the vehicle API
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub base_url: String,
    /// Sent verbatim as the `Authorization` header when present
    pub token: Option<String>,
    pub timeout: Duration,
}

impl GatewayOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the fleet API
#[derive(Debug, Clone)]
pub struct HttpVehicleGateway {
    client: Client,
    base_url: String,
}

impl HttpVehicleGateway {
    /// Build the client; fails only on an unusable token or TLS setup
    pub fn new(options: &GatewayOptions) -> Result<Self, TransportError> {
        let base_url = normalize_base_url(&options.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = options.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(token)
                .map_err(|e| TransportError::Request(format!("invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        info!(base_url = %base_url, "created vehicle API client");

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request; non-2xx statuses become [`TransportError::Status`]
    async fn send(&self, method: &str, url: &str, request: RequestBuilder) -> Result<Response, TransportError> {
        debug!(method, url, "request");

        let response = request.send().await.map_err(|e| {
            warn!(method, url, error = %e, "API request failed");
            TransportError::Request(e.to_string())
        })?;

        let status = response.status();
        debug!(method, url, status = status.as_u16(), "response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(method, url, status = status.as_u16(), body = %body, "API error");
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl VehicleGateway for HttpVehicleGateway {
    async fn list_vehicles(&self) -> Result<serde_json::Value, TransportError> {
        let url = self.url(LIST_PATH);
        let response = self.send("GET", &url, self.client.get(&url)).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn get_vehicle(&self, id: &str) -> Result<Vehicle, TransportError> {
        let url = self.url(&format!("/vehicles/{}", id));
        let response = self.send("GET", &url, self.client.get(&url)).await?;
        response
            .json::<Vehicle>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn update_location(&self, id: &str, update: &LocationUpdate) -> Result<Vehicle, TransportError> {
        let url = self.url(&format!("/vehicles/{}/location", id));
        let request = self.client.patch(&url).json(update);
        let response = self.send("PATCH", &url, request).await?;
        response
            .json::<Vehicle>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Add a scheme when missing and drop trailing slashes
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        let normalized = format!("http://{}", trimmed);
        warn!(from = raw, to = %normalized, "normalized API base URL");
        normalized
    }
}
