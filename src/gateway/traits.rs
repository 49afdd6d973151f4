use crate::filters::QueryParameters;
use crate::gateway::error::Result;
use crate::models::{FilterOptions, ListingPage, NewListing, PropertySummary};
use async_trait::async_trait;

/// Read-only side of the listings API.
/// Every call is idempotent and has no side effects.
#[async_trait]
pub trait ListingGateway: Send + Sync {
    /// One page of listings matching the wire-encoded filters
    async fn fetch_filtered_listings(&self, params: &QueryParameters) -> Result<ListingPage>;

    /// Types, cities and neighborhoods the filter form can offer
    async fn fetch_filter_options(&self) -> Result<FilterOptions>;

    /// Listings highlighted on the home page
    async fn fetch_featured(&self) -> Result<Vec<PropertySummary>>;

    async fn fetch_listing(&self, id: i64) -> Result<PropertySummary>;

    /// Listings similar to `id`, at most `limit` of them
    async fn fetch_related(&self, id: i64, limit: u32) -> Result<Vec<PropertySummary>>;

    /// Name of the backing source, for logs
    fn source_name(&self) -> &'static str;
}

/// Mutating side of the listings API. Implementations carry the bearer
/// token; none of these are reachable without one.
#[async_trait]
pub trait AdminGateway: Send + Sync {
    async fn list_listings(&self) -> Result<Vec<PropertySummary>>;

    async fn delete_listing(&self, id: i64) -> Result<()>;

    async fn set_featured(&self, id: i64, featured: bool) -> Result<()>;

    async fn create_listing(&self, listing: &NewListing) -> Result<PropertySummary>;
}
