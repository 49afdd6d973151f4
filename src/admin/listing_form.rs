use crate::filters::price::{self, PriceError};
use crate::filters::property_type::{PropertyType, UnrecognizedType};
use crate::models::{Address, NewListing};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingFormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field}: {source}")]
    InvalidAmount {
        field: &'static str,
        #[source]
        source: PriceError,
    },

    #[error(transparent)]
    UnknownType(#[from] UnrecognizedType),

    #[error("cover image {index} is out of range ({count} images)")]
    CoverOutOfRange { index: usize, count: usize },
}

/// Admin listing form as typed by the user: amounts carry thousands
/// separators, counts are strings, the type may be a label or a code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub price: String,
    pub financeable: String,
    pub bedroom: String,
    pub bathroom: String,
    pub parking_spaces: String,
    pub useful_area: String,
    pub total_area: String,
    pub condo_price: String,
    pub iptu: String,
    pub realtor_id: String,
    pub video_tour_url: String,
    pub images: Vec<String>,
    pub cover_image: Option<usize>,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}

impl ListingDraft {
    /// Validate and convert into the payload the API expects
    pub fn validate(&self) -> Result<NewListing, ListingFormError> {
        let title = required("title", &self.title)?;
        let city = required("city", &self.city)?;
        let neighborhood = required("neighborhood", &self.neighborhood)?;

        let type_input = required("type", &self.property_type)?;
        let property_type = PropertyType::from_label(&type_input)
            .or_else(|_| PropertyType::from_code(&type_input))?;

        let price = amount("price", &self.price)?.ok_or(ListingFormError::Missing("price"))?;

        let realtor_raw = required("realtorId", &self.realtor_id)?;
        let realtor_id = realtor_raw
            .parse::<i64>()
            .map_err(|_| ListingFormError::InvalidNumber {
                field: "realtorId",
                value: realtor_raw.clone(),
            })?;

        if let Some(index) = self.cover_image {
            if index >= self.images.len() {
                return Err(ListingFormError::CoverOutOfRange {
                    index,
                    count: self.images.len(),
                });
            }
        }

        let street = self.street.trim();
        let video = self.video_tour_url.trim();

        Ok(NewListing {
            title,
            description: self.description.trim().to_string(),
            price,
            financeable: self.financeable.trim() == "true",
            bedroom: count("bedroom", &self.bedroom)?,
            bathroom: count("bathroom", &self.bathroom)?,
            parking_spaces: count("parking_spaces", &self.parking_spaces)?,
            useful_area: amount("useful_area", &self.useful_area)?,
            total_area: amount("total_area", &self.total_area)?,
            condon_price: amount("condon_price", &self.condo_price)?,
            iptu: amount("iptu", &self.iptu)?,
            realtor_id,
            videotour_url: (!video.is_empty()).then(|| video.to_string()),
            images: self.images.clone(),
            ad_image_cover: self.cover_image,
            address: Address {
                city,
                neighborhood,
                street: (!street.is_empty()).then(|| street.to_string()),
            },
            property_type,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ListingFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ListingFormError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

// Optional thousands-formatted amount; blank means "not informed"
fn amount(field: &'static str, value: &str) -> Result<Option<u64>, ListingFormError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    price::parse_display(value)
        .map(Some)
        .map_err(|source| ListingFormError::InvalidAmount { field, source })
}

// Blank counts default to zero
fn count(field: &'static str, value: &str) -> Result<u32, ListingFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ListingFormError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}
