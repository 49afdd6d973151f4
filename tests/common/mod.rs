#![allow(dead_code)]

use async_trait::async_trait;
use listing_filters::filters::QueryParameters;
use listing_filters::gateway::error::Result;
use listing_filters::gateway::{GatewayError, ListingGateway};
use listing_filters::models::{FilterOptions, ListingPage, PropertySummary};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory listings API with per-page latency and switchable failures
pub struct FakeGateway {
    pub total_pages: u32,
    pub per_page: u32,
    delays: Mutex<HashMap<u32, Duration>>,
    calls: Mutex<Vec<QueryParameters>>,
    pub fail_listings: AtomicBool,
    pub fail_options: AtomicBool,
    pub fail_featured: AtomicBool,
    pub empty: AtomicBool,
}

impl FakeGateway {
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            per_page: 9,
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_listings: AtomicBool::new(false),
            fail_options: AtomicBool::new(false),
            fail_featured: AtomicBool::new(false),
            empty: AtomicBool::new(false),
        }
    }

    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.delays.lock().unwrap().insert(page, delay);
    }

    pub fn calls(&self) -> Vec<QueryParameters> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<QueryParameters> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn listing(id: i64, title: String) -> PropertySummary {
        PropertySummary {
            id,
            title,
            price: 350_000,
            ..Default::default()
        }
    }

    fn server_error() -> GatewayError {
        GatewayError::UnexpectedStatus {
            status: 500,
            body: "boom".to_string(),
        }
    }
}

#[async_trait]
impl ListingGateway for FakeGateway {
    async fn fetch_filtered_listings(&self, params: &QueryParameters) -> Result<ListingPage> {
        self.calls.lock().unwrap().push(params.clone());
        let page = params.current_page();

        let delay = self.delays.lock().unwrap().get(&page).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_listings.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }

        let data = if self.empty.load(Ordering::SeqCst) {
            Vec::new()
        } else {
            vec![Self::listing(i64::from(page) * 100, format!("page {}", page))]
        };

        let total_pages = if data.is_empty() { 0 } else { self.total_pages };
        Ok(ListingPage {
            data,
            limit: self.per_page,
            page,
            total: u64::from(total_pages) * u64::from(self.per_page),
            total_pages,
        })
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions> {
        if self.fail_options.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }

        let mut neighborhoods_by_city = BTreeMap::new();
        neighborhoods_by_city.insert(
            "Belem".to_string(),
            vec!["Marco".to_string(), "Umarizal".to_string()],
        );

        Ok(FilterOptions {
            types: vec!["HOUSE".to_string(), "APARTMENT".to_string()],
            cities: vec!["Belem".to_string()],
            neighborhoods_by_city,
            all_neighborhoods: vec!["Marco".to_string(), "Umarizal".to_string()],
        })
    }

    async fn fetch_featured(&self) -> Result<Vec<PropertySummary>> {
        if self.fail_featured.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        Ok(vec![
            Self::listing(1, "featured 1".to_string()),
            Self::listing(2, "featured 2".to_string()),
        ])
    }

    async fn fetch_listing(&self, id: i64) -> Result<PropertySummary> {
        if id == 404 {
            return Err(GatewayError::UnexpectedStatus {
                status: 404,
                body: "not found".to_string(),
            });
        }
        Ok(Self::listing(id, format!("listing {}", id)))
    }

    async fn fetch_related(&self, id: i64, limit: u32) -> Result<Vec<PropertySummary>> {
        Ok((1..=i64::from(limit))
            .map(|n| Self::listing(id + n, format!("related {}", n)))
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "fake"
    }
}
