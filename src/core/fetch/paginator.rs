//! Cursor-following pagination over the listing endpoint
//!
//! The first request carries `filter` and `limit`; every later request uses
//! the `rel="next"` URL from the `Link` header verbatim. A 401 aborts the run.
//! Any other failure ends the window with whatever was collected.

use crate::adapters::inventory::{next_page_url, ListingTransport};
use crate::config::ApiConfig;
use crate::domain::{ApiError, InventoryError, Record, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Longest response excerpt kept in an error message
const BODY_EXCERPT_CHARS: usize = 200;

/// Records collected for one filter
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Records from every page, in page order
    pub records: Vec<Record>,

    /// Requests that returned a response
    pub pages: usize,

    /// Why pagination stopped early, if it did
    pub failure: Option<ApiError>,
}

impl FetchOutcome {
    /// True when every signaled page was retrieved
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Drives paged fetches until no next page is signaled
pub struct Paginator {
    transport: Arc<dyn ListingTransport>,
    endpoint: String,
    page_size: usize,
    page_delay: Duration,
    max_pages: usize,
}

impl Paginator {
    pub fn new(transport: Arc<dyn ListingTransport>, config: &ApiConfig) -> Self {
        Self {
            transport,
            endpoint: config.listing_url(),
            page_size: config.page_size,
            page_delay: Duration::from_millis(config.page_delay_ms),
            max_pages: config.max_pages,
        }
    }

    /// Listing URL of the first request
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch every page for `filter`
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Unauthorized`] on a 401. Every other failure
    /// is reported through [`FetchOutcome::failure`].
    pub async fn fetch(&self, filter: &str) -> Result<FetchOutcome> {
        let params = [
            ("filter", filter.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        let mut outcome = FetchOutcome::default();
        let mut next = Some(self.endpoint.clone());

        while let Some(url) = next.take() {
            if outcome.pages >= self.max_pages {
                tracing::error!(
                    max_pages = self.max_pages,
                    records = outcome.records.len(),
                    "Page limit reached, stopping pagination"
                );
                outcome.failure = Some(ApiError::PageLimitExceeded(self.max_pages));
                break;
            }

            if outcome.pages > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let query = (outcome.pages == 0).then_some(&params[..]);
            tracing::debug!(url = %url, page = outcome.pages + 1, "Requesting page");

            let response = match self.transport.get(&url, query).await {
                Ok(response) => response,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(error = %e, url = %url, "Request failed");
                    outcome.failure = Some(into_api_error(e));
                    break;
                }
            };
            outcome.pages += 1;

            if response.status == 401 {
                tracing::error!(url = %url, "Unauthorized, check QUALYS_TOKEN");
                return Err(InventoryError::Unauthorized(format!(
                    "listing request to {url} returned 401"
                )));
            }

            if response.status != 200 {
                let message = excerpt(&response.body);
                tracing::error!(
                    status = response.status,
                    body = %message,
                    "API request failed"
                );
                outcome.failure = Some(ApiError::HttpStatus {
                    status: response.status,
                    message,
                });
                break;
            }

            match parse_page(&response.body) {
                Ok(mut page) => {
                    tracing::info!(
                        page = outcome.pages,
                        records = page.len(),
                        "Fetched page"
                    );
                    outcome.records.append(&mut page);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Unreadable page body");
                    outcome.failure = Some(e);
                    break;
                }
            }

            next = response.link.as_deref().and_then(next_page_url);
        }

        Ok(outcome)
    }
}

/// Records under the `data` key; a missing or null key is an empty page
fn parse_page(body: &str) -> std::result::Result<Vec<Record>, ApiError> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("body is not JSON: {e}")))?;

    match envelope {
        Value::Object(mut map) => match map.remove("data") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(ApiError::InvalidResponse(format!(
                "`data` is not a list but {}",
                json_kind(&other)
            ))),
        },
        other => Err(ApiError::InvalidResponse(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > BODY_EXCERPT_CHARS {
        let cut: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

fn into_api_error(err: InventoryError) -> ApiError {
    match err {
        InventoryError::Api(api) => api,
        other => ApiError::ConnectionFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::inventory::ListingResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request
    struct Scripted {
        responses: Mutex<VecDeque<Result<ListingResponse>>>,
        requests: Mutex<Vec<(String, bool)>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<ListingResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(String, bool)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ListingTransport for Scripted {
        async fn get(&self, url: &str, query: Option<&[(&str, String)]>) -> Result<ListingResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), query.is_some()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ListingResponse::new(500, "script exhausted")))
        }
    }

    fn paginator(transport: Arc<Scripted>, max_pages: usize) -> Paginator {
        let config = ApiConfig {
            base_url: "https://gw.example.com".to_string(),
            page_delay_ms: 0,
            max_pages,
            ..Default::default()
        };
        Paginator::new(transport, &config)
    }

    fn page(ids: &[u32]) -> String {
        let data: Vec<_> = ids.iter().map(|i| serde_json::json!({ "id": i })).collect();
        serde_json::json!({ "data": data }).to_string()
    }

    fn ids(records: &[Record]) -> Vec<u64> {
        records.iter().map(|r| r["id"].as_u64().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_single_page_sends_query() {
        let transport = Scripted::new(vec![Ok(ListingResponse::new(200, page(&[1, 2])))]);
        let outcome = paginator(transport.clone(), 10).fetch("created:[0 ... 1]").await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(ids(&outcome.records), vec![1, 2]);
        assert_eq!(
            transport.requests(),
            vec![(
                "https://gw.example.com/csapi/v1.3/containers/list".to_string(),
                true
            )]
        );
    }

    #[tokio::test]
    async fn test_follows_link_without_query() {
        let transport = Scripted::new(vec![
            Ok(ListingResponse::new(200, page(&[1])).with_link("<https://gw/p2>;rel=next")),
            Ok(ListingResponse::new(200, page(&[2]))),
        ]);
        let outcome = paginator(transport.clone(), 10).fetch("f").await.unwrap();

        assert_eq!(ids(&outcome.records), vec![1, 2]);
        assert_eq!(outcome.pages, 2);
        let requests = transport.requests();
        assert_eq!(requests[1], ("https://gw/p2".to_string(), false));
    }

    #[tokio::test]
    async fn test_non_200_keeps_partial_records() {
        let transport = Scripted::new(vec![
            Ok(ListingResponse::new(200, page(&[1])).with_link("<https://gw/p2>;rel=next")),
            Ok(ListingResponse::new(503, "unavailable")),
        ]);
        let outcome = paginator(transport.clone(), 10).fetch("f").await.unwrap();

        assert_eq!(ids(&outcome.records), vec![1]);
        assert!(matches!(
            outcome.failure,
            Some(ApiError::HttpStatus { status: 503, .. })
        ));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_is_fatal() {
        let transport = Scripted::new(vec![Ok(ListingResponse::new(401, "denied"))]);
        let result = paginator(transport.clone(), 10).fetch("f").await;

        assert!(matches!(result, Err(InventoryError::Unauthorized(_))));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_window_level() {
        let transport = Scripted::new(vec![Err(ApiError::ConnectionFailed(
            "reset".to_string(),
        )
        .into())]);
        let outcome = paginator(transport, 10).fetch("f").await.unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.pages, 0);
        assert!(matches!(outcome.failure, Some(ApiError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_invalid_body_is_window_level() {
        let transport = Scripted::new(vec![Ok(ListingResponse::new(200, "<html>"))]);
        let outcome = paginator(transport, 10).fetch("f").await.unwrap();

        assert!(matches!(outcome.failure, Some(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_data_key_is_empty_page() {
        let transport = Scripted::new(vec![Ok(ListingResponse::new(200, "{}"))]);
        let outcome = paginator(transport, 10).fetch("f").await.unwrap();

        assert!(outcome.is_complete());
        assert!(outcome.records.is_empty());
    }

    #[tokio::test]
    async fn test_page_limit_bounds_self_referencing_link() {
        let looping = || {
            Ok(ListingResponse::new(200, page(&[7])).with_link("<https://gw/same>; rel=\"next\""))
        };
        let transport = Scripted::new(vec![looping(), looping(), looping(), looping()]);
        let outcome = paginator(transport.clone(), 3).fetch("f").await.unwrap();

        assert_eq!(outcome.pages, 3);
        assert_eq!(transport.requests().len(), 3);
        assert!(matches!(outcome.failure, Some(ApiError::PageLimitExceeded(3))));
    }

    #[test]
    fn test_parse_page_rejects_non_list_data() {
        assert!(parse_page(r#"{"data": {"id": 1}}"#).is_err());
        assert!(parse_page("[1, 2]").is_err());
        assert_eq!(parse_page(r#"{"data": null}"#).unwrap().len(), 0);
    }

    #[test]
    fn test_excerpt_truncates() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert!(short.len() < 210);
        assert!(short.ends_with("..."));
        assert_eq!(excerpt("  short \n"), "short");
    }
}
