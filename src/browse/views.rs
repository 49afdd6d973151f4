use crate::filters::{codec, FilterCriteria, QueryParameters};
use crate::gateway::{GatewayError, ListingGateway};
use crate::models::{FilterOptions, PropertySummary};
use tracing::{info, warn};

/// How many similar listings the detail page shows
pub const RELATED_LIMIT: u32 = 3;

/// Home page: featured listings plus the options for the quick search form
#[derive(Debug, Clone, Default)]
pub struct HomeView {
    pub featured: Vec<PropertySummary>,
    pub options: FilterOptions,
    /// Type options as display labels
    pub type_labels: Vec<&'static str>,
    /// True when either request failed
    pub degraded: bool,
}

impl HomeView {
    /// Fetch featured listings and filter options concurrently. Returns once
    /// both have settled; failures are logged and leave their part empty.
    pub async fn load<G: ListingGateway + ?Sized>(gateway: &G) -> Self {
        let (featured, options) =
            tokio::join!(gateway.fetch_featured(), gateway.fetch_filter_options());

        let mut view = Self::default();

        match featured {
            Ok(featured) => view.featured = featured,
            Err(e) => {
                warn!("Failed to fetch featured listings: {}", e);
                view.degraded = true;
            }
        }

        match options {
            Ok(options) => {
                view.type_labels = options.type_labels();
                view.options = options;
            }
            Err(e) => {
                warn!("Failed to fetch filter options: {}", e);
                view.degraded = true;
            }
        }

        info!(
            "🏠 Home: {} featured listings, {} cities",
            view.featured.len(),
            view.options.cities.len()
        );
        view
    }
}

/// Outcome of a lookup by listing code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeLookup {
    /// Navigate here to show the match
    Found(QueryParameters),
    NotFound,
}

/// Check that a code matches something before navigating to it
pub async fn search_by_code<G: ListingGateway + ?Sized>(
    gateway: &G,
    code: &str,
) -> Result<CodeLookup, GatewayError> {
    let criteria = FilterCriteria {
        code: Some(code.to_string()),
        ..Default::default()
    };

    let params = codec::encode(&criteria);
    if params.is_empty() {
        return Ok(CodeLookup::NotFound);
    }

    let page = gateway.fetch_filtered_listings(&params).await?;
    if page.data.is_empty() {
        info!("No listing with code {:?}", code);
        Ok(CodeLookup::NotFound)
    } else {
        Ok(CodeLookup::Found(codec::encode_submission(&criteria)))
    }
}

/// Detail page: one listing and a few similar ones
#[derive(Debug, Clone, Default)]
pub struct ListingDetail {
    pub listing: Option<PropertySummary>,
    pub related: Vec<PropertySummary>,
}

impl ListingDetail {
    pub async fn load<G: ListingGateway + ?Sized>(gateway: &G, id: i64) -> Self {
        let (listing, related) = tokio::join!(
            gateway.fetch_listing(id),
            gateway.fetch_related(id, RELATED_LIMIT)
        );

        let listing = match listing {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("Failed to fetch listing {}: {}", id, e);
                None
            }
        };

        let related = match related {
            Ok(related) => related,
            Err(e) => {
                warn!("Failed to fetch listings related to {}: {}", id, e);
                Vec::new()
            }
        };

        Self { listing, related }
    }
}
