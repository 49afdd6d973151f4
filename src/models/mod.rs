use crate::filters::property_type::{PropertyType, UnrecognizedType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Realtor responsible for a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Realtor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
}

/// One listing as returned by the API. Only a handful of fields are read
/// here; everything else is carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, rename = "videotour_url")]
    pub video_tour_url: Option<String>,
    #[serde(default, rename = "Realtor")]
    pub realtor: Option<Realtor>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Pagination metadata, authoritative for rendering page controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub limit: u32,
    pub page: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Response of the filter endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(default)]
    pub data: Vec<PropertySummary>,
    pub limit: u32,
    pub page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl ListingPage {
    pub fn pagination(&self) -> PaginationInfo {
        PaginationInfo {
            limit: self.limit,
            page: self.page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Values the filter form can offer, as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Wire codes (`HOUSE`, `LAND`, ...)
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub neighborhoods_by_city: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub all_neighborhoods: Vec<String>,
}

impl FilterOptions {
    /// Type options translated to display labels. Codes missing from the
    /// lookup table are dropped.
    pub fn type_labels(&self) -> Vec<&'static str> {
        self.types
            .iter()
            .filter_map(|code| match PropertyType::from_code(code) {
                Ok(kind) => Some(kind.label()),
                Err(UnrecognizedType(code)) => {
                    warn!("Filter options contain unknown type {:?}", code);
                    None
                }
            })
            .collect()
    }

    /// Neighborhoods to offer for the selected city, or all of them when no
    /// city is selected
    pub fn neighborhoods_for(&self, city: Option<&str>) -> &[String] {
        match city.filter(|c| !c.is_empty()) {
            Some(city) => self
                .neighborhoods_by_city
                .get(city)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            None => &self.all_neighborhoods,
        }
    }
}

/// Payload for creating a listing through the admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: u64,
    pub financeable: bool,
    pub bedroom: u32,
    pub bathroom: u32,
    pub parking_spaces: u32,
    pub useful_area: Option<u64>,
    pub total_area: Option<u64>,
    pub condon_price: Option<u64>,
    pub iptu: Option<u64>,
    #[serde(rename = "realtorId")]
    pub realtor_id: i64,
    pub videotour_url: Option<String>,
    pub images: Vec<String>,
    pub ad_image_cover: Option<usize>,
    pub address: Address,
    #[serde(rename = "Property_type")]
    pub property_type: PropertyType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub neighborhood: String,
    #[serde(default)]
    pub street: Option<String>,
}
