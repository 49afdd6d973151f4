use crate::browse::navigation::{query_from_href, NavigationTicket, Navigator};
use crate::browse::pagination::PaginationController;
use crate::filters::{codec, Financing, FilterCriteria, FormField, PriceField, QueryParameters};
use crate::gateway::ListingGateway;
use crate::models::{FilterOptions, PaginationInfo, PropertySummary};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Path of the listing page
pub const LISTING_PATH: &str = "/imoveis";

/// What the listing area should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsState {
    /// Nothing fetched yet
    NotLoaded,
    Loaded,
    /// The request succeeded but nothing matched
    Empty,
    /// The last request failed; the previous listings are kept
    Failed,
}

/// Result of [`ListingSession::sync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Committed(ResultsState),
    /// A newer navigation happened; nothing was applied
    Stale,
}

/// Read-only copy of the session for rendering
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub form: FilterCriteria,
    pub location: String,
    pub current_page: u32,
    pub listings: Vec<PropertySummary>,
    pub pagination: Option<PaginationInfo>,
    pub results: ResultsState,
    pub loading: bool,
    pub options: FilterOptions,
}

struct SessionState {
    form: FilterCriteria,
    // Fields the user changed since the latest navigation
    edited: BTreeSet<FormField>,
    pagination: PaginationController,
    listings: Vec<PropertySummary>,
    results: ResultsState,
    options: FilterOptions,
    loading: bool,
}

/// The listing page: filter form, location, pagination and results.
///
/// Every change of filters or page goes through the navigator first; the
/// data for a location is then loaded with [`ListingSession::sync`]. A
/// response is only applied if its navigation is still the latest one.
pub struct ListingSession<G: ListingGateway> {
    gateway: Arc<G>,
    navigator: Navigator,
    state: Mutex<SessionState>,
}

impl<G: ListingGateway> ListingSession<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            navigator: Navigator::new(LISTING_PATH),
            state: Mutex::new(SessionState {
                form: FilterCriteria::default(),
                edited: BTreeSet::new(),
                pagination: PaginationController::new(),
                listings: Vec::new(),
                results: ResultsState::NotLoaded,
                options: FilterOptions::default(),
                loading: false,
            }),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    // Never held across an await point
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn form(&self) -> FilterCriteria {
        self.state().form.clone()
    }

    /// Apply a user edit to the form
    pub fn edit_form<F: FnOnce(&mut FilterCriteria)>(&self, edit: F) {
        let mut state = self.state();
        let before = state.form.clone();
        edit(&mut state.form);
        let changed = before.changed_fields(&state.form);
        state.edited.extend(changed);
    }

    pub fn set_price_input(&self, field: PriceField, raw: &str) {
        self.edit_form(|form| form.set_price_input(field, raw));
    }

    pub fn toggle_financing(&self, value: Financing) {
        self.edit_form(|form| form.toggle_financing(value));
    }

    // Caller holds the state lock so the edit set and location move together
    fn navigate(&self, state: &mut SessionState, query: QueryParameters) -> NavigationTicket {
        let previous = self.navigator.current();
        if previous.query().filters_only() != query.filters_only() {
            state.pagination.clear();
        }
        state.edited.clear();
        self.navigator.push(query)
    }

    /// Submit the form as a new search, always landing on page 1
    pub fn submit(&self) -> NavigationTicket {
        let mut state = self.state();
        if let Err(e) = state.form.validate() {
            debug!("Submitting with unusable field: {}", e);
        }
        let query = codec::encode_submission(&state.form.sanitized());
        info!("🔎 Searching ?{}", query.to_query_string());
        self.navigate(&mut state, query)
    }

    /// Replace the form and submit it
    pub fn submit_criteria(&self, criteria: FilterCriteria) -> NavigationTicket {
        self.edit_form(|form| *form = criteria);
        self.submit()
    }

    /// Clear every filter and go back to the unfiltered first page
    pub fn reset_filters(&self) -> NavigationTicket {
        let mut state = self.state();
        state.form.clear();
        info!("Clearing filters");
        self.navigate(&mut state, QueryParameters::new().with_page(1))
    }

    /// Move to `target`, keeping the active filters. `None` when the page is
    /// outside what the API last reported.
    pub fn request_page(&self, target: u32) -> Option<NavigationTicket> {
        let mut state = self.state();
        let current = self.navigator.current();
        let query = state.pagination.request_page(current.query(), target)?;
        Some(self.navigate(&mut state, query))
    }

    pub fn next_page(&self) -> Option<NavigationTicket> {
        let current_page = self.navigator.current().query().current_page();
        let target = self.state().pagination.next(current_page)?;
        self.request_page(target)
    }

    pub fn previous_page(&self) -> Option<NavigationTicket> {
        let current_page = self.navigator.current().query().current_page();
        let target = self.state().pagination.previous(current_page)?;
        self.request_page(target)
    }

    /// Arrive from an external link
    pub fn open(&self, href: &str) -> NavigationTicket {
        let mut state = self.state();
        self.navigate(&mut state, query_from_href(href))
    }

    /// Load the data for a navigation.
    ///
    /// The form is refreshed from the location, except for fields the user
    /// edited after navigating, which keep their typed value. Listings and filter options are fetched together
    /// and the loading flag clears once both settle, whatever the outcome.
    pub async fn sync(&self, ticket: &NavigationTicket) -> SyncOutcome {
        {
            let mut state = self.state();
            if !self.navigator.is_current(ticket) {
                debug!("Skipping outdated navigation {}", ticket.generation());
                return SyncOutcome::Stale;
            }
            let mut form = codec::decode(ticket.query());
            for field in &state.edited {
                form.copy_field(&state.form, *field);
            }
            if !state.edited.is_empty() {
                debug!("Keeping edited fields {:?} over the location", state.edited);
            }
            state.form = form;
            state.loading = true;
        }

        let params = ticket.query();
        let (listings, options) = tokio::join!(
            self.gateway.fetch_filtered_listings(params),
            self.gateway.fetch_filter_options()
        );

        let mut state = self.state();
        if !self.navigator.is_current(ticket) {
            debug!(
                "Discarding response for ?{} (superseded)",
                params.to_query_string()
            );
            return SyncOutcome::Stale;
        }

        match options {
            Ok(options) => state.options = options,
            Err(e) => warn!("Failed to fetch filter options: {}", e),
        }

        match listings {
            Ok(page) => {
                state.pagination.replace(page.pagination());
                state.results = if page.data.is_empty() {
                    ResultsState::Empty
                } else {
                    ResultsState::Loaded
                };
                info!(
                    "✅ {} listings on page {}/{}",
                    page.data.len(),
                    page.page,
                    page.total_pages
                );
                state.listings = page.data;
            }
            Err(e) => {
                warn!(
                    "Failed to fetch listings from {}: {}",
                    self.gateway.source_name(),
                    e
                );
                state.results = ResultsState::Failed;
            }
        }

        state.loading = false;
        SyncOutcome::Committed(state.results)
    }

    /// Follow the navigator and load the current location, then every new
    /// one. Runs until the returned future is dropped.
    pub async fn follow(self: Arc<Self>)
    where
        G: 'static,
    {
        let mut locations = self.navigator.subscribe();
        loop {
            let ticket = locations.borrow_and_update().clone();
            // Generation 0 is the blank location before any navigation
            if ticket.generation() > 0 {
                let session = Arc::clone(&self);
                tokio::spawn(async move {
                    session.sync(&ticket).await;
                });
            }
            if locations.changed().await.is_err() {
                break;
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        let current = self.navigator.current();
        SessionSnapshot {
            form: state.form.clone(),
            location: self.navigator.href(),
            current_page: current.query().current_page(),
            listings: state.listings.clone(),
            pagination: state.pagination.info(),
            results: state.results,
            loading: state.loading,
            options: state.options.clone(),
        }
    }

    /// Neighborhoods to offer for the city currently in the form
    pub fn neighborhood_options(&self) -> Vec<String> {
        let state = self.state();
        state
            .options
            .neighborhoods_for(state.form.city.as_deref())
            .to_vec()
    }
}
