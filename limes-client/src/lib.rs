//! Clients for Keystone, Limes and LIQUID
//!
//! This crate provides trait-based access to the APIs `limesctl` talks to,
//! with HTTP implementations on top of an authenticated Keystone
//! [`Session`] and an in-memory [`MockBackend`] for tests.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod auth;
pub mod backend;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod http;
pub mod mock;
pub mod session;

pub use auth::{AuthOptions, Interface};
pub use backend::{IdentityApi, LimesApi, LiquidApi};
pub use catalog::Catalog;
pub use error::{ClientError, Result};
pub use filter::ReportFilter;
pub use http::{HttpIdentity, HttpLimes, HttpLiquid};
pub use mock::MockBackend;
pub use session::Session;

/// Catalog type of the Limes service
pub const LIMES_SERVICE_TYPE: &str = "resources";

/// Catalog type of Keystone
pub const IDENTITY_SERVICE_TYPE: &str = "identity";

/// Catalog type of the LIQUID for a Limes service type
#[must_use]
pub fn liquid_service_type(service_type: &str) -> String {
    format!("liquid-{service_type}")
}
