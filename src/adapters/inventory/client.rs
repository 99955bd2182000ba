//! reqwest-backed listing transport
//!
//! Sends bearer-authenticated GET requests to the container listing endpoint.

use super::transport::{ListingResponse, ListingTransport};
use crate::config::ApiConfig;
use crate::domain::{ApiError, InventoryError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// HTTP transport for the container listing endpoint
///
/// # Example
///
/// ```no_run
/// use weekly_inventory::adapters::inventory::{HttpListingTransport, ListingTransport};
/// use weekly_inventory::config::{secret_string, ApiConfig};
///
/// # async fn example() -> weekly_inventory::domain::Result<()> {
/// let config = ApiConfig {
///     base_url: "https://gateway.example.com".to_string(),
///     token: Some(secret_string("token".to_string())),
///     ..Default::default()
/// };
/// let transport = HttpListingTransport::new(&config)?;
/// let response = transport
///     .get(&config.listing_url(), Some(&[("limit", "1".to_string())]))
///     .await?;
/// println!("status {}", response.status);
/// # Ok(())
/// # }
/// ```
pub struct HttpListingTransport {
    client: Client,
    auth_header: String,
}

impl HttpListingTransport {
    /// Build the transport from API configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is configured or the HTTP
    /// client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let token = config.token.as_ref().ok_or_else(|| {
            InventoryError::Configuration("missing API token".to_string())
        })?;

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the inventory API");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            InventoryError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            auth_header: format!("Bearer {}", token.expose_secret()),
        })
    }
}

#[async_trait]
impl ListingTransport for HttpListingTransport {
    async fn get(&self, url: &str, query: Option<&[(&str, String)]>) -> Result<ListingResponse> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header("Authorization", &self.auth_header);

        if let Some(params) = query {
            request = request.query(params);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        let status = resp.status().as_u16();
        let link = resp
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::ConnectionFailed(format!("Failed to read body: {e}")))?;

        Ok(ListingResponse { status, link, body })
    }
}
