use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Property category as understood by the listings API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    House,
    Apartment,
    Land,
    Commercial,
}

/// A label or code that has no entry in the lookup table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized property type: {0:?}")]
pub struct UnrecognizedType(pub String);

/// Wire code and display label for every category. Both directions are
/// answered from this one table so they cannot drift apart.
const TABLE: [(PropertyType, &str, &str); 4] = [
    (PropertyType::House, "HOUSE", "Casa"),
    (PropertyType::Apartment, "APARTMENT", "Apartamento"),
    (PropertyType::Land, "LAND", "Terreno"),
    (PropertyType::Commercial, "COMMERCIAL", "Comercial"),
];

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Land,
        PropertyType::Commercial,
    ];

    // Rows are stored in declaration order
    fn entry(self) -> &'static (PropertyType, &'static str, &'static str) {
        &TABLE[self as usize]
    }

    /// Upstream enum code, e.g. `HOUSE`
    pub fn code(self) -> &'static str {
        self.entry().1
    }

    /// Localized label shown in the filter form, e.g. `Casa`
    pub fn label(self) -> &'static str {
        self.entry().2
    }

    /// Look up a category by its wire code
    pub fn from_code(code: &str) -> Result<Self, UnrecognizedType> {
        TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(kind, _, _)| *kind)
            .ok_or_else(|| UnrecognizedType(code.to_string()))
    }

    /// Look up a category by its display label
    pub fn from_label(label: &str) -> Result<Self, UnrecognizedType> {
        TABLE
            .iter()
            .find(|(_, _, l)| *l == label)
            .map(|(kind, _, _)| *kind)
            .ok_or_else(|| UnrecognizedType(label.to_string()))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Translate a wire code into its label
pub fn label_for_code(code: &str) -> Result<&'static str, UnrecognizedType> {
    PropertyType::from_code(code).map(PropertyType::label)
}

/// Translate a display label into its wire code
pub fn code_for_label(label: &str) -> Result<&'static str, UnrecognizedType> {
    PropertyType::from_label(label).map(PropertyType::code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_symmetric() {
        for kind in PropertyType::ALL {
            assert_eq!(PropertyType::from_code(kind.code()), Ok(kind));
            assert_eq!(PropertyType::from_label(kind.label()), Ok(kind));
            assert_eq!(label_for_code(code_for_label(kind.label()).unwrap()), Ok(kind.label()));
        }
    }

    #[test]
    fn rows_follow_declaration_order() {
        for (idx, (kind, _, _)) in TABLE.iter().enumerate() {
            assert_eq!(*kind as usize, idx);
        }
    }

    #[test]
    fn commercial_translates_both_ways() {
        assert_eq!(code_for_label("Comercial"), Ok("COMMERCIAL"));
        assert_eq!(label_for_code("COMMERCIAL"), Ok("Comercial"));
    }

    #[test]
    fn unknown_values_are_reported() {
        assert_eq!(
            code_for_label("Sítio"),
            Err(UnrecognizedType("Sítio".to_string()))
        );
        assert!(label_for_code("casa").is_err());
        assert!(label_for_code("").is_err());
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&PropertyType::Apartment).unwrap();
        assert_eq!(json, "\"APARTMENT\"");
        let back: PropertyType = serde_json::from_str("\"LAND\"").unwrap();
        assert_eq!(back, PropertyType::Land);
    }
}
