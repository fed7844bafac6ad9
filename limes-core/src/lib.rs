//! Limes Core - units, quota values and API models
//!
//! This crate provides the types shared by the Limes client and the
//! `limesctl` command line: the byte units Limes measures resources in, the
//! parser for user supplied quota values, and serde models for the Limes,
//! LIQUID and Keystone documents.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod liquid;
pub mod quota;
pub mod reports;
pub mod types;
pub mod units;

pub use error::{Error, Result};
pub use quota::{QuotaOperation, QuotaRequest, QuotaValue, ResourceCatalog, ValueSpec};
pub use reports::{
    ClusterRatesReport, ClusterReport, DomainReport, ProjectRatesReport, ProjectReport,
};
pub use types::{Domain, DomainRef, Project, ProjectRef, TokenScope};
pub use units::Unit;
