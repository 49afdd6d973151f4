use crate::admin::listing_form::ListingDraft;
use crate::gateway::AdminGateway;
use crate::models::PropertySummary;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message shown to the admin after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Admin listing table.
///
/// Mutations never touch the local list directly: after a successful call
/// the list is reloaded from the API, after a failed one it stays as is.
pub struct AdminDashboard<A: AdminGateway> {
    gateway: A,
    listings: Vec<PropertySummary>,
    loading: bool,
    notices: Vec<Notice>,
}

impl<A: AdminGateway> AdminDashboard<A> {
    pub fn new(gateway: A) -> Self {
        Self {
            gateway,
            listings: Vec::new(),
            loading: false,
            notices: Vec::new(),
        }
    }

    pub fn listings(&self) -> &[PropertySummary] {
        &self.listings
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Fetch the full list. On failure the previous list is kept.
    pub async fn reload(&mut self) -> bool {
        self.loading = true;
        let result = self.gateway.list_listings().await;
        self.loading = false;

        match result {
            Ok(listings) => {
                info!("Loaded {} listings for admin", listings.len());
                self.listings = listings;
                true
            }
            Err(e) => {
                warn!("Failed to load admin listings: {}", e);
                false
            }
        }
    }

    /// Most viewed first
    pub fn sorted_by_views(&self) -> Vec<&PropertySummary> {
        let mut sorted: Vec<&PropertySummary> = self.listings.iter().collect();
        sorted.sort_by(|a, b| b.views.cmp(&a.views));
        sorted
    }

    /// Case-insensitive match on title, id or realtor name, most viewed first
    pub fn search(&self, term: &str) -> Vec<&PropertySummary> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.sorted_by_views();
        }

        self.sorted_by_views()
            .into_iter()
            .filter(|listing| {
                listing.title.to_lowercase().contains(&needle)
                    || listing.id.to_string().contains(&needle)
                    || listing
                        .realtor
                        .as_ref()
                        .map(|r| r.name.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect()
    }

    pub async fn delete(&mut self, id: i64) -> bool {
        match self.gateway.delete_listing(id).await {
            Ok(()) => {
                self.notices.push(Notice::success("Anúncio excluído com sucesso!"));
                self.reload().await;
                true
            }
            Err(e) => {
                warn!("Failed to delete listing {}: {}", id, e);
                self.notices.push(Notice::error("Erro ao excluir anúncio!"));
                false
            }
        }
    }

    /// Flip the featured flag of a listing currently in the table
    pub async fn toggle_featured(&mut self, id: i64) -> bool {
        let Some(current) = self.listings.iter().find(|l| l.id == id).map(|l| l.featured) else {
            warn!("Listing {} is not in the admin table", id);
            self.notices.push(Notice::error("Erro ao destacar o anúncio!"));
            return false;
        };

        match self.gateway.set_featured(id, !current).await {
            Ok(()) => {
                self.notices.push(Notice::success("Anúncio destacado com sucesso!"));
                self.reload().await;
                true
            }
            Err(e) => {
                warn!("Failed to update featured flag on {}: {}", id, e);
                self.notices.push(Notice::error("Erro ao destacar o anúncio!"));
                false
            }
        }
    }

    /// Validate the draft and publish it
    pub async fn create(&mut self, draft: &ListingDraft) -> Option<PropertySummary> {
        let listing = match draft.validate() {
            Ok(listing) => listing,
            Err(e) => {
                self.notices.push(Notice::error(format!("Erro ao enviar anúncio: {}", e)));
                return None;
            }
        };

        match self.gateway.create_listing(&listing).await {
            Ok(created) => {
                self.notices.push(Notice::success("Anúncio enviado com sucesso"));
                self.reload().await;
                Some(created)
            }
            Err(e) => {
                warn!("Failed to create listing: {}", e);
                self.notices.push(Notice::error(format!("Erro ao enviar anúncio: {}", e)));
                None
            }
        }
    }
}
