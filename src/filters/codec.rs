use crate::filters::criteria::{non_empty, Financing, FilterCriteria, PriceField};
use crate::filters::price;
use crate::filters::property_type::{code_for_label, label_for_code};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use url::form_urlencoded;

pub const CODE_KEY: &str = "code";
pub const TYPE_KEY: &str = "type";
pub const CITY_KEY: &str = "city";
pub const NEIGHBORHOOD_KEY: &str = "neighborhood";
pub const MIN_PRICE_KEY: &str = "minPrice";
pub const MAX_PRICE_KEY: &str = "maxPrice";
pub const FINANCEABLE_KEY: &str = "financeable";
pub const PAGE_KEY: &str = "page";

/// Keys that carry a filter (everything except `page`)
pub const FILTER_KEYS: [&str; 7] = [
    CODE_KEY,
    TYPE_KEY,
    CITY_KEY,
    NEIGHBORHOOD_KEY,
    MIN_PRICE_KEY,
    MAX_PRICE_KEY,
    FINANCEABLE_KEY,
];

/// Flat wire-encoded query string.
///
/// A key is either present with a non-empty value or absent; absence is the
/// "no filter" signal, so empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParameters(BTreeMap<String, String>);

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, or remove it when `value` is empty
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Page number carried by the query, if any and if valid (>= 1)
    pub fn page(&self) -> Option<u32> {
        self.get(PAGE_KEY)
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p >= 1)
    }

    /// Page to display: the query's page, or 1 when missing or invalid
    pub fn current_page(&self) -> u32 {
        self.page().unwrap_or(1)
    }

    /// Merge a page change into this query, leaving filter keys untouched
    pub fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        next.insert(PAGE_KEY, page.to_string());
        next
    }

    /// Query without its `page` key
    pub fn filters_only(&self) -> Self {
        let mut filters = self.clone();
        filters.remove(PAGE_KEY);
        filters
    }

    /// Parse a raw query string (`city=Belem&page=3`, leading `?` allowed).
    /// Empty values are dropped; for repeated keys the last one wins. Keys
    /// outside the filter vocabulary and unusable page numbers are dropped.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == PAGE_KEY {
                match value.parse::<u32>() {
                    Ok(page) if page >= 1 => params.insert(PAGE_KEY, page.to_string()),
                    _ => debug!("Ignoring page {:?}", value),
                }
            } else if FILTER_KEYS.iter().any(|known| *known == key) {
                params.insert(key.into_owned(), value.into_owned());
            } else {
                debug!("Ignoring unknown query key {:?}", key);
            }
        }
        params
    }

    /// Serialize to a percent-encoded query string, keys in sorted order
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Encode criteria into wire parameters. No `page` key is added.
pub fn encode(criteria: &FilterCriteria) -> QueryParameters {
    let mut params = QueryParameters::new();

    if let Some(code) = non_empty(&criteria.code) {
        params.insert(CODE_KEY, code);
    }

    if let Some(label) = non_empty(&criteria.property_type) {
        match code_for_label(&label) {
            Ok(code) => params.insert(TYPE_KEY, code),
            Err(err) => debug!("Dropping type filter: {}", err),
        }
    }

    if let Some(city) = non_empty(&criteria.city) {
        params.insert(CITY_KEY, city);
    }

    if let Some(neighborhood) = non_empty(&criteria.neighborhood) {
        params.insert(NEIGHBORHOOD_KEY, neighborhood);
    }

    for (field, key) in [
        (PriceField::Min, MIN_PRICE_KEY),
        (PriceField::Max, MAX_PRICE_KEY),
    ] {
        if let Some(raw) = criteria.price(field).filter(|v| !v.trim().is_empty()) {
            match price::parse_display(raw) {
                Ok(value) => params.insert(key, value.to_string()),
                Err(err) => debug!("Dropping {} filter {:?}: {}", field, raw, err),
            }
        }
    }

    if let Some(financing) = criteria.financing {
        params.insert(FINANCEABLE_KEY, financing.as_str());
    }

    params
}

/// Encode a fresh filter submission: always lands on page 1
pub fn encode_submission(criteria: &FilterCriteria) -> QueryParameters {
    encode(criteria).with_page(1)
}

/// Decode wire parameters back into display-encoded criteria.
/// Missing or unreadable keys leave the field unset; `page` is ignored.
pub fn decode(params: &QueryParameters) -> FilterCriteria {
    let text = |key: &str| params.get(key).map(str::to_string);

    let property_type = params.get(TYPE_KEY).and_then(|code| match label_for_code(code) {
        Ok(label) => Some(label.to_string()),
        Err(err) => {
            debug!("Ignoring type parameter: {}", err);
            None
        }
    });

    let price_field = |key: &str| {
        let raw = params.get(key)?;
        match price::parse_wire(raw) {
            Ok(value) => Some(price::format_thousands(value)),
            Err(err) => {
                debug!("Ignoring {} parameter {:?}: {}", key, raw, err);
                None
            }
        }
    };

    FilterCriteria {
        code: text(CODE_KEY),
        property_type,
        city: text(CITY_KEY),
        neighborhood: text(NEIGHBORHOOD_KEY),
        financing: params.get(FINANCEABLE_KEY).and_then(Financing::parse),
        min_price: price_field(MIN_PRICE_KEY),
        max_price: price_field(MAX_PRICE_KEY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::property_type::PropertyType;
    use crate::filters::price::format_thousands;

    fn query(pairs: &[(&str, &str)]) -> QueryParameters {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn encodes_type_and_price_to_wire() {
        let criteria = FilterCriteria {
            property_type: Some("Casa".to_string()),
            min_price: Some("100.000".to_string()),
            ..Default::default()
        };

        assert_eq!(
            encode_submission(&criteria),
            query(&[("type", "HOUSE"), ("minPrice", "100000"), ("page", "1")])
        );
    }

    #[test]
    fn empty_fields_are_omitted() {
        let criteria = FilterCriteria {
            code: Some(String::new()),
            city: Some("   ".to_string()),
            property_type: Some(String::new()),
            ..Default::default()
        };
        assert!(encode(&criteria).is_empty());
        assert_eq!(encode_submission(&FilterCriteria::new()), query(&[("page", "1")]));
    }

    #[test]
    fn unknown_type_label_is_omitted() {
        let criteria = FilterCriteria {
            property_type: Some("Chácara".to_string()),
            city: Some("Belem".to_string()),
            ..Default::default()
        };
        assert_eq!(encode(&criteria), query(&[("city", "Belem")]));
    }

    #[test]
    fn malformed_price_degrades_to_no_filter() {
        let criteria = FilterCriteria {
            min_price: Some("abc".to_string()),
            max_price: Some("1.500.000".to_string()),
            ..Default::default()
        };
        assert_eq!(encode(&criteria), query(&[("maxPrice", "1500000")]));
    }

    #[test]
    fn financing_uses_financeable_key() {
        let mut criteria = FilterCriteria::new();
        criteria.toggle_financing(Financing::No);
        assert_eq!(encode(&criteria), query(&[("financeable", "false")]));
    }

    #[test]
    fn decode_ignores_page_and_invents_nothing() {
        let decoded = decode(&query(&[("city", "Belem"), ("page", "3")]));
        assert_eq!(
            decoded,
            FilterCriteria {
                city: Some("Belem".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(decode(&QueryParameters::new()), FilterCriteria::default());
    }

    #[test]
    fn decode_translates_to_display_encoding() {
        let decoded = decode(&query(&[
            ("type", "COMMERCIAL"),
            ("minPrice", "250000"),
            ("maxPrice", "2.000"),
            ("financeable", "true"),
        ]));
        assert_eq!(decoded.property_type.as_deref(), Some("Comercial"));
        assert_eq!(decoded.min_price.as_deref(), Some("250.000"));
        assert_eq!(decoded.max_price, None);
        assert_eq!(decoded.financing, Some(Financing::Yes));
    }

    #[test]
    fn round_trip_for_recognized_values() {
        for kind in PropertyType::ALL {
            for financing in [None, Some(Financing::Yes), Some(Financing::No)] {
                let criteria = FilterCriteria {
                    code: Some("1042".to_string()),
                    property_type: Some(kind.label().to_string()),
                    city: Some("Santarém".to_string()),
                    neighborhood: Some("Aldeia".to_string()),
                    financing,
                    min_price: Some("0".to_string()),
                    max_price: Some("12.500.000".to_string()),
                };
                assert_eq!(decode(&encode(&criteria)), criteria);
                assert_eq!(decode(&encode_submission(&criteria)), criteria);
            }
        }
    }

    #[test]
    fn round_trip_across_price_boundaries() {
        let amounts = [0, 1, 999, 1_000, 999_999, 1_000_000, u64::MAX];
        for min in amounts {
            for max in amounts {
                let criteria = FilterCriteria {
                    min_price: Some(format_thousands(min)),
                    max_price: Some(format_thousands(max)),
                    ..Default::default()
                };
                assert_eq!(decode(&encode(&criteria)), criteria, "{} / {}", min, max);
            }
        }
        assert_eq!(
            encode(&FilterCriteria {
                max_price: Some(format_thousands(u64::MAX)),
                ..Default::default()
            })
            .get("maxPrice"),
            Some("18446744073709551615")
        );
    }

    #[test]
    fn round_trip_with_non_ascii_text() {
        let places = [
            ("Belém", "Nazaré"),
            ("São Luís", "Jardim São Cristóvão"),
            ("Ananindeua", "Cidade Nova & Coqueiro"),
            ("Marabá", "Folha 32 / Nova Marabá"),
        ];
        for (city, neighborhood) in places {
            let criteria = FilterCriteria {
                code: Some("Ç-12".to_string()),
                city: Some(city.to_string()),
                neighborhood: Some(neighborhood.to_string()),
                ..Default::default()
            };
            let encoded = encode_submission(&criteria);
            assert_eq!(decode(&encoded), criteria);
            let reparsed = QueryParameters::parse(&encoded.to_query_string());
            assert_eq!(decode(&reparsed), criteria);
        }
    }

    #[test]
    fn page_merge_keeps_filters() {
        let current = query(&[("city", "Belem"), ("type", "LAND"), ("page", "2")]);
        let next = current.with_page(5);
        assert_eq!(next.page(), Some(5));
        assert_eq!(next.filters_only(), current.filters_only());
    }

    #[test]
    fn current_page_defaults_to_one() {
        assert_eq!(QueryParameters::new().current_page(), 1);
        assert_eq!(query(&[("page", "0")]).current_page(), 1);
        assert_eq!(query(&[("page", "x")]).current_page(), 1);
        assert_eq!(query(&[("page", "4")]).current_page(), 4);
    }

    #[test]
    fn query_string_parsing() {
        let parsed = QueryParameters::parse("?city=Bel%C3%A9m&neighborhood=&page=2");
        assert_eq!(parsed.get("city"), Some("Belém"));
        assert!(!parsed.contains("neighborhood"));
        assert_eq!(parsed.page(), Some(2));
        assert_eq!(QueryParameters::parse(&parsed.to_query_string()), parsed);
    }

    #[test]
    fn query_string_keeps_only_known_keys() {
        let parsed = QueryParameters::parse("foo=bar&page=abc&city=Belem&utm_source=x");
        assert_eq!(parsed, query(&[("city", "Belem")]));

        assert_eq!(QueryParameters::parse("page=0").page(), None);
        assert!(QueryParameters::parse("page=-2").is_empty());
        assert_eq!(QueryParameters::parse("page=7&type=LAND").len(), 2);
    }

    #[test]
    fn filter_keys_cover_every_encoded_field() {
        let criteria = FilterCriteria {
            code: Some("7".to_string()),
            property_type: Some("Terreno".to_string()),
            city: Some("Belem".to_string()),
            neighborhood: Some("Nazaré".to_string()),
            financing: Some(Financing::Yes),
            min_price: Some("1".to_string()),
            max_price: Some("2".to_string()),
        };
        let encoded = encode(&criteria);
        assert_eq!(encoded.len(), FILTER_KEYS.len());
        assert!(FILTER_KEYS.iter().all(|key| encoded.contains(key)));
    }
}
