pub mod auth;
pub mod users;

use crate::config::Config;
use crate::error::{OrgmapError, Result};
use auth::TokenProvider;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Graph API client
///
/// Issues one request per call: throttling, transport and authorization
/// failures are returned to the caller as they come.
pub struct GraphClient {
    client: Client,
    tokens: TokenProvider,
    base_url: String,
    resource: String,
}

impl GraphClient {
    pub fn new(tokens: TokenProvider, config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            tokens,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            resource: config.graph_resource.clone(),
        })
    }

    /// Build an absolute URL for `endpoint` with encoded query parameters
    pub fn endpoint_url(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        Url::parse_with_params(&url, query)
            .map_err(|e| OrgmapError::ConfigError(format!("Invalid Graph URL '{}': {}", url, e)))
    }

    /// Make a GET request to an absolute URL
    pub async fn get_url<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.tokens.token_for(&self.resource).await?;

        let resp = self.client.get(url).bearer_auth(token).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let enhanced_error = crate::error::enhance_graph_error(&error_text);
            return Err(OrgmapError::GraphApiError(format!(
                "HTTP {}: {}",
                status, enhanced_error
            )));
        }

        Ok(resp.json::<T>().await?)
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Standard OData page with `value` array and `@odata.nextLink`
#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl GraphClient {
    /// Fetch all pages starting at `url`, calling `on_page` with the running
    /// item count after each page
    ///
    /// Follows `@odata.nextLink` until it is absent. Items keep server order.
    /// A failing page fails the whole call; nothing collected so far is returned.
    pub async fn get_all_pages_with_progress<T, F>(
        &self,
        url: Url,
        mut on_page: F,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(usize),
    {
        let mut all_items: Vec<T> = Vec::new();
        let mut current_url = url.to_string();
        let mut page_count = 0usize;

        loop {
            let response: PaginatedResponse<T> = self.get_url(&current_url).await?;
            page_count += 1;
            debug!(
                "Page {} returned {} item(s), more: {}",
                page_count,
                response.value.len(),
                response.next_link.is_some()
            );

            all_items.extend(response.value);
            on_page(all_items.len());

            match response.next_link {
                Some(next) => current_url = next,
                None => break,
            }
        }

        Ok(all_items)
    }
}
