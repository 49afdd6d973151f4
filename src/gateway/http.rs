use crate::admin::AdminToken;
use crate::config::Config;
use crate::filters::QueryParameters;
use crate::gateway::error::{GatewayError, Result};
use crate::gateway::traits::{AdminGateway, ListingGateway};
use crate::models::{FilterOptions, ListingPage, NewListing, PropertySummary};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Longest error body kept in [`GatewayError::UnexpectedStatus`]
const MAX_ERROR_BODY: usize = 512;

/// `reqwest`-backed client for the listings API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Create a gateway with a 30 second timeout
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_options(
            base_url,
            Duration::from_secs(30),
            concat!("listing-filters/", env!("CARGO_PKG_VERSION")),
        )
    }

    pub fn with_options(base_url: Url, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_options(
            config.api_base_url.clone(),
            config.http_timeout,
            &config.user_agent,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Bearer-authenticated view of the same API
    pub fn authorized(&self, token: AdminToken) -> HttpAdminGateway {
        HttpAdminGateway {
            inner: self.clone(),
            token,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl ListingGateway for HttpGateway {
    async fn fetch_filtered_listings(&self, params: &QueryParameters) -> Result<ListingPage> {
        let url = self.endpoint("properties/filter")?;
        debug!("GET {} ?{}", url, params.to_query_string());

        let page: ListingPage = self.get_json(self.client.get(url).query(params)).await?;
        info!(
            "Fetched page {}/{} ({} of {} listings)",
            page.page,
            page.total_pages,
            page.data.len(),
            page.total
        );
        Ok(page)
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions> {
        let url = self.endpoint("properties/filter-options")?;
        debug!("GET {}", url);
        self.get_json(self.client.get(url)).await
    }

    async fn fetch_featured(&self) -> Result<Vec<PropertySummary>> {
        let url = self.endpoint("properties/featured")?;
        debug!("GET {}", url);
        self.get_json(self.client.get(url)).await
    }

    async fn fetch_listing(&self, id: i64) -> Result<PropertySummary> {
        let url = self.endpoint(&format!("properties/{}", id))?;
        debug!("GET {}", url);
        self.get_json(self.client.get(url)).await
    }

    async fn fetch_related(&self, id: i64, limit: u32) -> Result<Vec<PropertySummary>> {
        let url = self.endpoint(&format!("properties/{}/related", id))?;
        debug!("GET {} limit={}", url, limit);
        self.get_json(self.client.get(url).query(&[("limit", limit)]))
            .await
    }

    fn source_name(&self) -> &'static str {
        "listings-api"
    }
}

/// [`HttpGateway`] plus the admin bearer token
#[derive(Debug, Clone)]
pub struct HttpAdminGateway {
    inner: HttpGateway,
    token: AdminToken,
}

impl HttpAdminGateway {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.token.expose())
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = self.authorize(request).send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait]
impl AdminGateway for HttpAdminGateway {
    async fn list_listings(&self) -> Result<Vec<PropertySummary>> {
        let url = self.inner.endpoint("properties")?;
        debug!("GET {} (admin)", url);
        let request = self.authorize(self.inner.client.get(url));
        self.inner.get_json(request).await
    }

    async fn delete_listing(&self, id: i64) -> Result<()> {
        let url = self.inner.endpoint(&format!("properties/{}", id))?;
        info!("Deleting listing {}", id);
        self.send_empty(self.inner.client.delete(url)).await
    }

    async fn set_featured(&self, id: i64, featured: bool) -> Result<()> {
        let url = self.inner.endpoint(&format!("properties/{}/featured", id))?;
        info!("Setting featured={} on listing {}", featured, id);
        self.send_empty(self.inner.client.patch(url).json(&json!({ "featured": featured })))
            .await
    }

    async fn create_listing(&self, listing: &NewListing) -> Result<PropertySummary> {
        let url = self.inner.endpoint("properties")?;
        info!("Creating listing {:?}", listing.title);
        let request = self.authorize(self.inner.client.post(url).json(listing));
        self.inner.get_json(request).await
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    warn!("Listings API returned status: {}", status);
    Err(GatewayError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::Parse(e.to_string()))
}
