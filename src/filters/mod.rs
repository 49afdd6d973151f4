pub mod codec;
pub mod criteria;
pub mod price;
pub mod property_type;

pub use codec::{decode, encode, encode_submission, QueryParameters};
pub use criteria::{CriteriaError, Financing, FilterCriteria, FormField, PriceField};
pub use price::{format_thousands, price_mask, PriceError};
pub use property_type::{PropertyType, UnrecognizedType};
