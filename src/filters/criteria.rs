use crate::filters::price;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Financing filter. Unset means "do not filter on financing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Financing {
    #[serde(rename = "true")]
    Yes,
    #[serde(rename = "false")]
    No,
}

impl Financing {
    /// Value sent as the `financeable` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Financing::Yes => "true",
            Financing::No => "false",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "true" => Some(Financing::Yes),
            "false" => Some(Financing::No),
            _ => None,
        }
    }
}

/// Which end of the price range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Min,
    Max,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Min => f.write_str("minPrice"),
            PriceField::Max => f.write_str("maxPrice"),
        }
    }
}

/// One field of the filter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Code,
    Type,
    City,
    Neighborhood,
    Financing,
    MinPrice,
    MaxPrice,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Code,
        FormField::Type,
        FormField::City,
        FormField::Neighborhood,
        FormField::Financing,
        FormField::MinPrice,
        FormField::MaxPrice,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("{field} is not a thousands-formatted number: {value:?}")]
    MalformedPrice { field: PriceField, value: String },
}

/// Filter form contents in display encoding.
///
/// Every field is optional and an empty record means "no filter". The type
/// is the localized label (`Casa`), prices carry thousands separators
/// (`350.000`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub financing: Option<Financing>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field would produce a filter
    pub fn is_empty(&self) -> bool {
        [
            &self.code,
            &self.property_type,
            &self.city,
            &self.neighborhood,
            &self.min_price,
            &self.max_price,
        ]
        .iter()
        .all(|field| non_empty(field).is_none())
            && self.financing.is_none()
    }

    pub fn price(&self, field: PriceField) -> Option<&str> {
        match field {
            PriceField::Min => self.min_price.as_deref(),
            PriceField::Max => self.max_price.as_deref(),
        }
    }

    fn price_mut(&mut self, field: PriceField) -> &mut Option<String> {
        match field {
            PriceField::Min => &mut self.min_price,
            PriceField::Max => &mut self.max_price,
        }
    }

    /// Apply raw keystrokes to a price field through the price mask
    pub fn set_price_input(&mut self, field: PriceField, raw: &str) {
        let masked = price::price_mask(raw);
        *self.price_mut(field) = if masked.is_empty() { None } else { Some(masked) };
    }

    /// Select-to-clear: choosing the value that is already selected unsets it
    pub fn toggle_financing(&mut self, value: Financing) {
        self.financing = if self.financing == Some(value) {
            None
        } else {
            Some(value)
        };
    }

    /// Clear every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Structural check. Only price fields can be malformed.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        for field in [PriceField::Min, PriceField::Max] {
            if let Some(value) = self.price(field).filter(|v| !v.is_empty()) {
                if !price::is_canonical(value) {
                    return Err(CriteriaError::MalformedPrice {
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fields holding a different value in `other`
    pub fn changed_fields(&self, other: &FilterCriteria) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| !self.same_field(other, *field))
            .collect()
    }

    fn same_field(&self, other: &FilterCriteria, field: FormField) -> bool {
        match field {
            FormField::Code => self.code == other.code,
            FormField::Type => self.property_type == other.property_type,
            FormField::City => self.city == other.city,
            FormField::Neighborhood => self.neighborhood == other.neighborhood,
            FormField::Financing => self.financing == other.financing,
            FormField::MinPrice => self.min_price == other.min_price,
            FormField::MaxPrice => self.max_price == other.max_price,
        }
    }

    /// Overwrite one field with the value `source` holds for it
    pub fn copy_field(&mut self, source: &FilterCriteria, field: FormField) {
        match field {
            FormField::Code => self.code = source.code.clone(),
            FormField::Type => self.property_type = source.property_type.clone(),
            FormField::City => self.city = source.city.clone(),
            FormField::Neighborhood => self.neighborhood = source.neighborhood.clone(),
            FormField::Financing => self.financing = source.financing,
            FormField::MinPrice => self.min_price = source.min_price.clone(),
            FormField::MaxPrice => self.max_price = source.max_price.clone(),
        }
    }

    /// Copy with empty strings unset and unreadable prices dropped
    pub fn sanitized(&self) -> Self {
        let price_or_none = |field: PriceField| {
            let value = non_empty(&self.price(field).map(str::to_string))?;
            match price::parse_display(&value) {
                Ok(parsed) => Some(price::format_thousands(parsed)),
                Err(err) => {
                    debug!("Ignoring {} filter {:?}: {}", field, value, err);
                    None
                }
            }
        };

        Self {
            code: non_empty(&self.code),
            property_type: non_empty(&self.property_type),
            city: non_empty(&self.city),
            neighborhood: non_empty(&self.neighborhood),
            financing: self.financing,
            min_price: price_or_none(PriceField::Min),
            max_price: price_or_none(PriceField::Max),
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
