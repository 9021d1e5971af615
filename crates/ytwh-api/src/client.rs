//! HTTP client for the Data API's list endpoints.
//!
//! Two access patterns cover every job:
//!
//! - [`YoutubeClient::fetch_paginated`] walks a listing by `nextPageToken`.
//! - [`YoutubeClient::fetch_batch`] looks up known IDs in groups of at most
//!   `batch_cap`.
//!
//! Neither retries. A failed request costs its own page or batch and nothing
//! else: a failed page ends the listing with whatever was collected so far,
//! a failed batch is skipped and the remaining batches still run.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::batching::{batch_count, batches};
use crate::error::ApiError;
use crate::types::ListResponse;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Upper bound on pages followed in one listing. Stops a cycling token from
/// looping forever; reaching it is logged and treated as end-of-stream.
pub(crate) const MAX_PAGES: usize = 200;

/// The list endpoints the jobs read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Videos,
    Channels,
    VideoCategories,
}

impl Resource {
    /// Path segment under the API root.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Resource::Videos => "videos",
            Resource::Channels => "channels",
            Resource::VideoCategories => "videoCategories",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Raw items gathered by one paginated or batched fetch.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// `items` from every successful response, in request order.
    pub items: Vec<serde_json::Value>,
    /// HTTP requests issued.
    pub requests: usize,
    /// Requests whose page or batch was skipped.
    pub failed_requests: usize,
}

/// Client for the Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a client pointed at the production API root.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom API root (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` is not
    /// a usable URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so resource paths append rather than
        // replace the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Follows a listing's continuation tokens to the end.
    ///
    /// The first request carries no `pageToken`; each later request carries
    /// the previous page's `nextPageToken`. Stops when a page has no token,
    /// when a request fails, or after [`MAX_PAGES`] requests. Items from
    /// pages already fetched are kept in every case.
    pub async fn fetch_paginated(
        &self,
        resource: Resource,
        params: &[(&str, &str)],
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        let mut page_token: Option<String> = None;

        loop {
            if outcome.requests >= MAX_PAGES {
                tracing::warn!(
                    %resource,
                    max_pages = MAX_PAGES,
                    "page limit reached; treating as end of listing"
                );
                break;
            }

            let url = {
                let mut query = params.to_vec();
                if let Some(token) = page_token.as_deref() {
                    query.push(("pageToken", token));
                }
                self.build_url(resource, &query)
            };

            outcome.requests += 1;
            match self.request_page(resource, url).await {
                Ok(page) => {
                    tracing::debug!(
                        %resource,
                        page = outcome.requests,
                        items = page.items.len(),
                        "fetched page"
                    );
                    outcome.items.extend(page.items);
                    match page.next_page_token.filter(|t| !t.is_empty()) {
                        Some(next) => page_token = Some(next),
                        None => break,
                    }
                }
                Err(e) => {
                    outcome.failed_requests += 1;
                    tracing::warn!(
                        %resource,
                        page = outcome.requests,
                        error = %e,
                        "page request failed; ending listing early"
                    );
                    break;
                }
            }
        }

        outcome
    }

    /// Looks up `ids` in consecutive groups of at most `batch_cap`.
    ///
    /// One request per group with the group comma-joined into the `id`
    /// parameter. A failed group is logged and its items skipped; the
    /// remaining groups still run.
    pub async fn fetch_batch(
        &self,
        resource: Resource,
        ids: &[String],
        batch_cap: usize,
        params: &[(&str, &str)],
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        tracing::debug!(
            resource = resource.path(),
            ids = ids.len(),
            batches = batch_count(ids.len(), batch_cap),
            "batch lookup started"
        );

        for group in batches(ids, batch_cap) {
            let joined = group.join(",");
            let url = {
                let mut query = params.to_vec();
                query.push(("id", joined.as_str()));
                self.build_url(resource, &query)
            };

            outcome.requests += 1;
            match self.request_page(resource, url).await {
                Ok(page) => {
                    if page.items.len() < group.len() {
                        // Deleted or private entities are silently absent.
                        tracing::debug!(
                            %resource,
                            requested = group.len(),
                            returned = page.items.len(),
                            "batch returned fewer items than requested"
                        );
                    }
                    outcome.items.extend(page.items);
                }
                Err(e) => {
                    outcome.failed_requests += 1;
                    tracing::warn!(
                        %resource,
                        batch = outcome.requests,
                        batch_len = group.len(),
                        error = %e,
                        "batch request failed; skipping its items"
                    );
                }
            }
        }

        outcome
    }

    /// Builds the request URL with properly percent-encoded query parameters.
    ///
    /// The API key always comes first, followed by `extra` in order.
    fn build_url(&self, resource: Resource, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource.path());
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx status, and parses the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] on network failure,
    /// [`ApiError::UnexpectedStatus`] on a non-2xx status, or
    /// [`ApiError::Deserialize`] if the body is not a list envelope.
    async fn request_page(&self, resource: Resource, url: Url) -> Result<ListResponse, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                resource: resource.path(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Http(e.without_url()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: format!("{resource} list response"),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
