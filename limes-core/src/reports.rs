//! Limes resource and rate reports
//!
//! These mirror the documents returned by the Limes v1 and rates v1 APIs.
//! Nested structures the client only passes through (subresources,
//! per-AZ breakdowns, annotations) are kept as raw JSON so that `--format
//! json` shows them unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Unit;

/// Cluster-level resource report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Cluster ID (`current`)
    pub id: String,
    /// Per-service reports
    #[serde(default)]
    pub services: Vec<ClusterServiceReport>,
    /// Newest scrape timestamp across all services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scraped_at: Option<i64>,
    /// Oldest scrape timestamp across all services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_scraped_at: Option<i64>,
}

/// Service entry of a [`ClusterReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterServiceReport {
    /// Service type
    #[serde(rename = "type")]
    pub service_type: String,
    /// Area the service belongs to
    #[serde(default)]
    pub area: String,
    /// Resources of this service
    #[serde(default)]
    pub resources: Vec<ClusterResourceReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub max_scraped_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub min_scraped_at: Option<i64>,
}

/// Resource entry of a [`ClusterServiceReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterResourceReport {
    /// Resource name
    pub name: String,
    /// Unit of all values in this entry
    #[serde(default)]
    pub unit: Unit,
    /// Category used to group resources in UIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Total capacity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
    /// Sum of all domain quotas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains_quota: Option<u64>,
    /// Sum of all project usages
    #[serde(default)]
    pub usage: u64,
    /// Usage exceeding quota thanks to bursting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst_usage: Option<u64>,
    /// Usage as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_usage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub per_availability_zone: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub subcapacities: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub quota_distribution_model: Option<String>,
}

/// Domain-level resource report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainReport {
    /// Domain ID
    pub id: String,
    /// Domain name
    #[serde(default)]
    pub name: String,
    /// Per-service reports
    #[serde(default)]
    pub services: Vec<DomainServiceReport>,
}

/// Service entry of a [`DomainReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainServiceReport {
    /// Service type
    #[serde(rename = "type")]
    pub service_type: String,
    /// Area the service belongs to
    #[serde(default)]
    pub area: String,
    /// Resources of this service
    #[serde(default)]
    pub resources: Vec<DomainResourceReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub max_scraped_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub min_scraped_at: Option<i64>,
}

/// Resource entry of a [`DomainServiceReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainResourceReport {
    /// Resource name
    pub name: String,
    /// Unit of all values in this entry
    #[serde(default)]
    pub unit: Unit,
    /// Category used to group resources in UIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Domain quota
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
    /// Sum of the quotas of all projects in the domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects_quota: Option<u64>,
    /// Sum of all project usages
    #[serde(default)]
    pub usage: u64,
    /// Usage exceeding quota thanks to bursting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst_usage: Option<u64>,
    /// Usage as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_usage: Option<u64>,
    /// Sum of backend quotas if they differ from the Limes quotas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_quota: Option<i64>,
    /// Whether some project has an infinite backend quota
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infinite_backend_quota: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub per_az: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub annotations: Option<Value>,
}

/// Project-level resource report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectReport {
    /// Project ID
    pub id: String,
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Parent project or domain ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Quota bursting settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bursting: Option<ProjectBursting>,
    /// Per-service reports
    #[serde(default)]
    pub services: Vec<ProjectServiceReport>,
}

/// Quota bursting settings of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectBursting {
    /// Whether bursting is enabled
    pub enabled: bool,
    /// Fraction by which usage may exceed quota
    #[serde(default)]
    pub multiplier: f64,
}

/// Service entry of a [`ProjectReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectServiceReport {
    /// Service type
    #[serde(rename = "type")]
    pub service_type: String,
    /// Area the service belongs to
    #[serde(default)]
    pub area: String,
    /// Resources of this service
    #[serde(default)]
    pub resources: Vec<ProjectResourceReport>,
    /// When usage data was last scraped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<i64>,
}

/// Resource entry of a [`ProjectServiceReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectResourceReport {
    /// Resource name
    pub name: String,
    /// Unit of all values in this entry
    #[serde(default)]
    pub unit: Unit,
    /// Category used to group resources in UIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Project quota
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
    /// Quota including the bursting allowance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usable_quota: Option<u64>,
    /// Usage
    #[serde(default)]
    pub usage: u64,
    /// Usage exceeding quota thanks to bursting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst_usage: Option<u64>,
    /// Usage as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_usage: Option<u64>,
    /// Backend quota if it differs from the Limes quota (`-1` for infinite)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_quota: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub subresources: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub per_az: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub annotations: Option<Value>,
}

impl ProjectReport {
    /// Look up a resource by service type and name
    #[must_use]
    pub fn resource(&self, service: &str, resource: &str) -> Option<&ProjectResourceReport> {
        self.services
            .iter()
            .find(|s| s.service_type == service)?
            .resources
            .iter()
            .find(|r| r.name == resource)
    }
}

/// Cluster-level rate report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterRatesReport {
    /// Cluster ID (`current`)
    pub id: String,
    /// Per-service rates
    #[serde(default)]
    pub services: Vec<ClusterServiceRates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub max_scraped_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub min_scraped_at: Option<i64>,
}

/// Service entry of a [`ClusterRatesReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterServiceRates {
    /// Service type
    #[serde(rename = "type")]
    pub service_type: String,
    /// Area the service belongs to
    #[serde(default)]
    pub area: String,
    /// Rates of this service
    #[serde(default)]
    pub rates: Vec<RateReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub max_scraped_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub min_scraped_at: Option<i64>,
}

/// Project-level rate report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRatesReport {
    /// Project ID
    pub id: String,
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Per-service rates
    #[serde(default)]
    pub services: Vec<ProjectServiceRates>,
}

/// Service entry of a [`ProjectRatesReport`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectServiceRates {
    /// Service type
    #[serde(rename = "type")]
    pub service_type: String,
    /// Area the service belongs to
    #[serde(default)]
    pub area: String,
    /// Rates of this service
    #[serde(default)]
    pub rates: Vec<RateReport>,
    /// When usage data was last scraped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<i64>,
}

/// A single rate limit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateReport {
    /// Rate name
    pub name: String,
    /// Unit of the usage value
    #[serde(default)]
    pub unit: Unit,
    /// Number of requests allowed per window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Window length, e.g. `1s` or `1m`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    /// Limit applied when the project has no override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<u64>,
    /// Window applied when the project has no override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_window: Option<String>,
    /// Usage counter, serialized as a decimal string since it may exceed 64 bits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_as_bigint: Option<String>,
}

/// Response envelope of `GET /v1/clusters/current`
#[derive(Debug, Deserialize)]
pub struct ClusterEnvelope<T> {
    /// Wrapped report
    pub cluster: T,
}

/// Response envelope of `GET /v1/domains/:id`
#[derive(Debug, Deserialize)]
pub struct DomainEnvelope {
    /// Wrapped report
    pub domain: DomainReport,
}

/// Response envelope of `GET /v1/domains`
#[derive(Debug, Deserialize)]
pub struct DomainsEnvelope {
    /// Wrapped reports
    #[serde(default)]
    pub domains: Vec<DomainReport>,
}

/// Response envelope of `GET /v1/domains/:id/projects/:id`
#[derive(Debug, Deserialize)]
pub struct ProjectEnvelope<T> {
    /// Wrapped report
    pub project: T,
}

/// Response envelope of `GET /v1/domains/:id/projects`
#[derive(Debug, Deserialize)]
pub struct ProjectsEnvelope<T> {
    /// Wrapped reports
    pub projects: Vec<T>,
}
