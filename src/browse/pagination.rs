use crate::filters::QueryParameters;
use crate::models::PaginationInfo;
use std::ops::RangeInclusive;
use tracing::debug;

/// Keeps page transitions inside what the API last reported.
///
/// Metadata is replaced wholesale on each response and dropped when the
/// filters change, so a new search never runs against old page counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationController {
    info: Option<PaginationInfo>,
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> Option<PaginationInfo> {
        self.info
    }

    pub fn replace(&mut self, info: PaginationInfo) {
        self.info = Some(info);
    }

    pub fn clear(&mut self) {
        self.info = None;
    }

    /// Highest page that may be requested. Page 1 is always reachable.
    pub fn last_page(&self) -> u32 {
        self.info.map(|i| i.total_pages.max(1)).unwrap_or(1)
    }

    pub fn can_request(&self, page: u32) -> bool {
        page >= 1 && page <= self.last_page()
    }

    /// Query for `target`, merged into `current`. `None` when out of range.
    pub fn request_page(&self, current: &QueryParameters, target: u32) -> Option<QueryParameters> {
        if !self.can_request(target) {
            debug!(
                "Ignoring request for page {} (last page is {})",
                target,
                self.last_page()
            );
            return None;
        }
        Some(current.with_page(target))
    }

    pub fn has_previous(&self, current_page: u32) -> bool {
        current_page > 1
    }

    pub fn has_next(&self, current_page: u32) -> bool {
        current_page < self.last_page()
    }

    pub fn previous(&self, current_page: u32) -> Option<u32> {
        self.has_previous(current_page).then(|| current_page - 1)
    }

    pub fn next(&self, current_page: u32) -> Option<u32> {
        self.has_next(current_page).then(|| current_page + 1)
    }

    /// Page buttons to render
    pub fn pages(&self) -> RangeInclusive<u32> {
        1..=self.info.map(|i| i.total_pages).unwrap_or(0)
    }
}
