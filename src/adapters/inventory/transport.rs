//! Listing transport abstraction
//!
//! The paginator only needs one capability from the network: issue a GET and
//! read back status, `Link` header and body. Keeping that behind a trait lets
//! the pagination and orchestration logic run against scripted responses.

use crate::domain::Result;
use async_trait::async_trait;

/// Raw response from the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResponse {
    /// HTTP status code
    pub status: u16,

    /// Value of the `Link` response header, if present
    pub link: Option<String>,

    /// Response body as text
    pub body: String,
}

impl ListingResponse {
    /// Create a response without a `Link` header
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            link: None,
            body: body.into(),
        }
    }

    /// Attach a `Link` header
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Transport used to page through the listing endpoint
///
/// `query` is `Some` only for the first page of a window; follow-up pages use
/// the server-supplied URL verbatim.
///
/// Implementations return `Err` only when no HTTP response was obtained.
/// Every HTTP status, including 401, comes back as an `Ok` response.
#[async_trait]
pub trait ListingTransport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, url: &str, query: Option<&[(&str, String)]>) -> Result<ListingResponse>;
}
