//! LIQUID API documents
//!
//! LIQUID is the API that Limes uses to talk to its backend plugins. Keys
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{Domain, Project, Unit};

/// Response of `GET /v1/info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    /// Version of the service info, bumped whenever it changes
    #[serde(default)]
    pub version: i64,
    /// Human readable service name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Resources the LIQUID manages
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceInfo>,
    /// Rates the LIQUID reports
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rates: BTreeMap<String, Value>,
    /// Prometheus metric families in capacity reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_metric_families: Option<Value>,
    /// Prometheus metric families in usage reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metric_families: Option<Value>,
    /// Whether usage reports need project metadata
    #[serde(default)]
    pub usage_report_needs_project_metadata: bool,
    /// Whether quota requests need project metadata
    #[serde(default)]
    pub quota_update_needs_project_metadata: bool,
}

/// Resource entry of a [`ServiceInfo`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    /// Unit of capacity, usage and quota values
    #[serde(default)]
    pub unit: Unit,
    /// How the resource is distributed across availability zones
    #[serde(default)]
    pub topology: Topology,
    /// Whether capacity is reported
    #[serde(default)]
    pub has_capacity: bool,
    /// Whether the resource accepts quota
    #[serde(default)]
    pub has_quota: bool,
    /// Whether capacity reports need the resource demand
    #[serde(default)]
    pub needs_resource_demand: bool,
}

/// Availability zone topology of a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Resource is not AZ-aware
    #[default]
    #[serde(rename = "flat")]
    Flat,
    /// Usage is reported per AZ, quota is project-wide
    #[serde(rename = "az-aware")]
    AzAware,
    /// Quota is set per AZ
    #[serde(rename = "az-separated")]
    AzSeparated,
}

/// Body of `POST /v1/report-capacity`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCapacityRequest {
    /// All availability zones of the cluster
    #[serde(rename = "allAZs")]
    pub all_azs: Vec<String>,
    /// Resource demand, keyed by resource name
    #[serde(default)]
    pub demand_by_resource: BTreeMap<String, Value>,
}

/// Body of `POST /v1/projects/:uuid/report-usage`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUsageRequest {
    /// All availability zones of the cluster
    #[serde(rename = "allAZs")]
    pub all_azs: Vec<String>,
    /// Project metadata, if the LIQUID asked for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_metadata: Option<Value>,
}

/// Body of `PUT /v1/projects/:uuid/quota`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQuotaRequest {
    /// Quota per resource name
    pub resources: BTreeMap<String, ResourceQuotaRequest>,
    /// Project metadata, if the LIQUID asked for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_metadata: Option<Value>,
}

/// Resource entry of a [`ServiceQuotaRequest`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuotaRequest {
    /// Project-wide quota
    pub quota: u64,
    /// Quota per availability zone for AZ-separated resources
    #[serde(rename = "perAZ", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_az: BTreeMap<String, AzQuotaRequest>,
}

/// Per-AZ entry of a [`ResourceQuotaRequest`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzQuotaRequest {
    /// Quota in this availability zone
    pub quota: u64,
}

/// Project metadata as sent to LIQUIDs that ask for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectMetadata {
    /// Project ID
    pub uuid: String,
    /// Project name
    pub name: String,
    /// Owning domain
    pub domain: DomainMetadata,
}

/// Domain part of [`ProjectMetadata`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainMetadata {
    /// Domain ID
    pub uuid: String,
    /// Domain name
    pub name: String,
}

impl ProjectMetadata {
    /// Metadata for a Keystone project and its domain
    #[must_use]
    pub fn new(project: &Project, domain: &Domain) -> Self {
        Self {
            uuid: project.id.clone(),
            name: project.name.clone(),
            domain: DomainMetadata {
                uuid: domain.id.clone(),
                name: domain.name.clone(),
            },
        }
    }

    /// As a JSON value for the request bodies
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "uuid": self.uuid,
            "name": self.name,
            "domain": {"uuid": self.domain.uuid, "name": self.domain.name},
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_metadata_shape() {
        let project = Project {
            id: "p1".to_string(),
            name: "web".to_string(),
            domain_id: "d1".to_string(),
            parent_id: None,
        };
        let domain = Domain {
            id: "d1".to_string(),
            name: "acme".to_string(),
            enabled: true,
        };
        let value = ProjectMetadata::new(&project, &domain).to_value();
        assert_eq!(
            value,
            serde_json::json!({"uuid": "p1", "name": "web", "domain": {"uuid": "d1", "name": "acme"}})
        );
    }

    #[test]
    fn service_info_deserialize() {
        let info: ServiceInfo = serde_json::from_str(
            r#"{
                "version": 3,
                "resources": {
                    "capacity": {"unit": "GiB", "topology": "az-aware", "hasCapacity": true, "hasQuota": true},
                    "snapshots": {"unit": "", "topology": "flat", "hasQuota": false}
                },
                "usageReportNeedsProjectMetadata": true
            }"#,
        )
        .unwrap();

        assert_eq!(info.version, 3);
        assert_eq!(info.resources["capacity"].unit, Unit::Gibibytes);
        assert_eq!(info.resources["capacity"].topology, Topology::AzAware);
        assert!(!info.resources["snapshots"].has_quota);
        assert!(info.usage_report_needs_project_metadata);
    }

    #[test]
    fn quota_request_wire_format() {
        let mut request = ServiceQuotaRequest::default();
        request.resources.insert(
            "capacity".to_string(),
            ResourceQuotaRequest {
                quota: 100,
                per_az: BTreeMap::new(),
            },
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"resources": {"capacity": {"quota": 100}}})
        );
    }

    #[test]
    fn usage_request_wire_format() {
        let request = ServiceUsageRequest {
            all_azs: vec!["az-a".to_string(), "az-b".to_string()],
            project_metadata: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"allAZs": ["az-a", "az-b"]})
        );
    }
}
