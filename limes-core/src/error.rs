//! Error types for Limes values and models

use thiserror::Error;

use crate::Unit;

/// Limes core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Unit name is not one Limes knows
    #[error("unknown unit: {0:?}")]
    UnknownUnit(String),

    /// Value does not follow `service/resource=value[unit]`
    #[error("malformed value {input:?}: expected service/resource=value[unit]")]
    Malformed {
        /// Offending input
        input: String,
    },

    /// Value without a service where one is required
    #[error("value {input:?} does not name a service (expected service/resource=value)")]
    MissingService {
        /// Offending input
        input: String,
    },

    /// Value names a different service than the one being configured
    #[error("value {input:?} refers to service {given:?}, expected {expected:?}")]
    ServiceMismatch {
        /// Offending input
        input: String,
        /// Service named in the value
        given: String,
        /// Service being configured
        expected: String,
    },

    /// Service or resource not present in the catalog
    #[error("unknown resource: {service}/{resource}")]
    UnknownResource {
        /// Service type
        service: String,
        /// Resource name
        resource: String,
    },

    /// Resource does not accept quota
    #[error("resource {service}/{resource} does not accept quota")]
    QuotaNotAccepted {
        /// Service type
        service: String,
        /// Resource name
        resource: String,
    },

    /// Resource only accepts quota per availability zone
    #[error("resource {service}/{resource} needs per-AZ quota, which cannot be given as a single value")]
    PerAzQuotaRequired {
        /// Service type
        service: String,
        /// Resource name
        resource: String,
    },

    /// Same resource given more than once in one request
    #[error("duplicate value for {service}/{resource}")]
    DuplicateValue {
        /// Service type
        service: String,
        /// Resource name
        resource: String,
    },

    /// Value cannot be converted between a countable and a measured unit
    #[error("cannot convert value from {from} to {to}: incompatible units")]
    IncompatibleUnits {
        /// Source unit
        from: Unit,
        /// Target unit
        to: Unit,
    },

    /// Source unit is finer than the target unit's smallest increment
    #[error("cannot convert value from {from} to {to}: {from} is smaller than the smallest increment of {to}")]
    UnitTooSmall {
        /// Source unit
        from: Unit,
        /// Target unit
        to: Unit,
    },

    /// Value without a unit is not a plain integer
    #[error("invalid value {0:?}: expected a non-negative integer")]
    InvalidInteger(String),

    /// Amount is not written as digits with an optional fraction
    #[error("invalid number {0:?}: expected digits with an optional decimal fraction")]
    InvalidNumber(String),

    /// Value does not fit into 64 bits
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),

    /// Relative change without a known current quota
    #[error("cannot apply relative change to {service}/{resource}: current quota is unknown")]
    NoCurrentQuota {
        /// Service type
        service: String,
        /// Resource name
        resource: String,
    },

    /// Relative change would drop the quota below zero
    #[error("cannot reduce quota of {service}/{resource} below zero (current {current}, reduction {amount})")]
    NegativeQuota {
        /// Service type
        service: String,
        /// Resource name
        resource: String,
        /// Current quota
        current: u64,
        /// Requested reduction
        amount: u64,
    },
}

/// Result type alias for Limes core operations
pub type Result<T> = std::result::Result<T, Error>;
