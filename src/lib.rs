//! Filter, pagination and navigation plumbing for a property listing site.
//!
//! The filter form (display encoding) and the page location (wire-encoded
//! query string) are kept in step through [`filters::codec`]; the listings
//! API is reached through the [`gateway`] traits.

pub mod admin;
pub mod browse;
pub mod config;
pub mod filters;
pub mod gateway;
pub mod models;
