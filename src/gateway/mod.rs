pub mod error;
pub mod http;
pub mod traits;

pub use error::GatewayError;
pub use http::{HttpAdminGateway, HttpGateway};
pub use traits::{AdminGateway, ListingGateway};
