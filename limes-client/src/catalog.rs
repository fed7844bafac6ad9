//! Keystone service catalog

use serde::{Deserialize, Serialize};

use crate::{ClientError, Interface, Result};

/// Service catalog as returned with a Keystone token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

/// One service in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Service type, e.g. `resources`
    #[serde(rename = "type")]
    pub service_type: String,
    /// Service name
    #[serde(default)]
    pub name: Option<String>,
    /// Endpoints of the service
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

/// One endpoint of a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEndpoint {
    /// `public`, `internal` or `admin`
    pub interface: String,
    /// Region ID
    #[serde(default)]
    pub region_id: Option<String>,
    /// Region name (deprecated alias of the ID)
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint URL
    pub url: String,
}

impl Catalog {
    /// URL of the endpoint for a service type, without trailing slash
    ///
    /// # Errors
    /// Returns [`ClientError::EndpointNotFound`] if no endpoint matches the
    /// service type, interface and (if given) region
    pub fn endpoint_for(
        &self,
        service_type: &str,
        interface: Interface,
        region: Option<&str>,
    ) -> Result<String> {
        self.entries
            .iter()
            .filter(|entry| entry.service_type == service_type)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|endpoint| {
                endpoint.interface == interface.as_str()
                    && region.is_none_or(|region| {
                        endpoint.region_id.as_deref() == Some(region)
                            || endpoint.region.as_deref() == Some(region)
                    })
            })
            .map(|endpoint| endpoint.url.trim_end_matches('/').to_string())
            .ok_or_else(|| ClientError::EndpointNotFound {
                service_type: service_type.to_string(),
                interface: interface.to_string(),
                region: region.map(ToString::to_string),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        serde_json::from_value(serde_json::json!([
            {"type": "identity", "name": "keystone", "endpoints": [
                {"interface": "public", "region_id": "eu-1", "url": "https://keystone.eu-1.example.com/v3/"}
            ]},
            {"type": "resources", "name": "limes", "endpoints": [
                {"interface": "public", "region_id": "eu-1", "region": "eu-1", "url": "https://limes.eu-1.example.com"},
                {"interface": "internal", "region_id": "eu-1", "url": "http://limes.internal:8080"},
                {"interface": "public", "region_id": "us-1", "url": "https://limes.us-1.example.com/"}
            ]}
        ]))
        .unwrap()
    }

    #[test]
    fn selects_by_interface_and_region() {
        let catalog = catalog();
        assert_eq!(
            catalog
                .endpoint_for("resources", Interface::Public, Some("us-1"))
                .unwrap(),
            "https://limes.us-1.example.com"
        );
        assert_eq!(
            catalog
                .endpoint_for("resources", Interface::Internal, None)
                .unwrap(),
            "http://limes.internal:8080"
        );
        assert_eq!(
            catalog
                .endpoint_for("resources", Interface::Public, None)
                .unwrap(),
            "https://limes.eu-1.example.com"
        );
    }

    #[test]
    fn missing_endpoint() {
        let catalog = catalog();
        let err = catalog
            .endpoint_for("liquid-compute", Interface::Public, Some("eu-1"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no public endpoint for service type \"liquid-compute\" in region \"eu-1\""
        );
        assert!(catalog.endpoint_for("resources", Interface::Admin, None).is_err());
    }
}
