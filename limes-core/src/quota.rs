//! Quota value parser
//!
//! Users give quota values as `service/resource=value[unit]`, for example
//! `compute/ram=2.5GiB` or `compute/cores+=4`. Parsing happens in two steps:
//! [`ValueSpec::parse`] checks the syntax, then [`ValueSpec::resolve`] looks
//! the resource up in a [`ResourceCatalog`] and converts the value into the
//! resource's own unit.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use tracing::debug;

use crate::liquid::{ResourceQuotaRequest, ServiceInfo, ServiceQuotaRequest, Topology};
use crate::reports::ProjectReport;
use crate::{Error, Result, Unit};

lazy_static! {
    static ref VALUE_RX: Regex = Regex::new(
        r"^\s*(?:([^/=\s]+)/)?([^/=\s]+?)\s*(=|\+=|-=)\s*([0-9]+(?:\.[0-9]+)?)\s*([A-Za-z]*)\s*$"
    )
    .unwrap();
}

/// How a value is applied to the current quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaOperation {
    /// `=`: replace the quota
    Set,
    /// `+=`: raise the quota by the value
    Add,
    /// `-=`: lower the quota by the value
    Subtract,
}

impl QuotaOperation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "=",
            Self::Add => "+=",
            Self::Subtract => "-=",
        }
    }
}

/// A syntactically valid quota value that has not been resolved yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    /// Service type, if given
    pub service: Option<String>,
    /// Resource name
    pub resource: String,
    /// Operator
    pub operation: QuotaOperation,
    /// Number as written by the user
    pub amount: String,
    /// Unit suffix, if given
    pub unit: Option<Unit>,
    input: String,
}

/// What a catalog knows about one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Unit quota values are expressed in
    pub unit: Unit,
    /// Current quota, if known
    pub quota: Option<u64>,
}

/// Source of resource units and current quotas
pub trait ResourceCatalog {
    /// Service all values refer to, for catalogs that describe a single service
    fn fixed_service(&self) -> Option<&str> {
        None
    }

    /// Look up a resource
    ///
    /// # Errors
    /// Returns [`Error::UnknownResource`] if the catalog has no such resource,
    /// or another error if the resource cannot take a quota value
    fn lookup(&self, service: &str, resource: &str) -> Result<ResourceEntry>;
}

/// A resolved quota value in the resource's own unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaValue {
    /// Service type
    pub service: String,
    /// Resource name
    pub resource: String,
    /// New quota
    pub quota: u64,
}

impl ValueSpec {
    /// Check the syntax of a single value
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] or [`Error::UnknownUnit`]
    pub fn parse(input: &str) -> Result<Self> {
        let caps = VALUE_RX.captures(input).ok_or_else(|| Error::Malformed {
            input: input.to_string(),
        })?;

        let operation = match &caps[3] {
            "+=" => QuotaOperation::Add,
            "-=" => QuotaOperation::Subtract,
            _ => QuotaOperation::Set,
        };

        let unit = match &caps[5] {
            "" => None,
            name => Some(Unit::parse(name)?),
        };

        Ok(Self {
            service: caps.get(1).map(|m| m.as_str().to_string()),
            resource: caps[2].to_string(),
            operation,
            amount: caps[4].to_string(),
            unit,
            input: input.trim().to_string(),
        })
    }

    /// Resolve the value against a catalog
    ///
    /// # Errors
    /// Returns an error if the service or resource is unknown, the units do
    /// not fit, or a relative change cannot be applied
    pub fn resolve(&self, catalog: &impl ResourceCatalog) -> Result<QuotaValue> {
        let service = match (catalog.fixed_service(), self.service.as_deref()) {
            (Some(fixed), Some(given)) if given != fixed => {
                return Err(Error::ServiceMismatch {
                    input: self.input.clone(),
                    given: given.to_string(),
                    expected: fixed.to_string(),
                });
            }
            (Some(fixed), _) => fixed.to_string(),
            (None, Some(given)) => given.to_string(),
            (None, None) => {
                return Err(Error::MissingService {
                    input: self.input.clone(),
                });
            }
        };

        let entry = catalog.lookup(&service, &self.resource)?;
        let amount = self.amount_in(entry.unit)?;

        let quota = match self.operation {
            QuotaOperation::Set => amount,
            QuotaOperation::Add | QuotaOperation::Subtract => {
                let current = entry.quota.ok_or_else(|| Error::NoCurrentQuota {
                    service: service.clone(),
                    resource: self.resource.clone(),
                })?;

                if self.operation == QuotaOperation::Add {
                    current
                        .checked_add(amount)
                        .ok_or_else(|| Error::ValueOutOfRange(self.input.clone()))?
                } else {
                    current
                        .checked_sub(amount)
                        .ok_or_else(|| Error::NegativeQuota {
                            service: service.clone(),
                            resource: self.resource.clone(),
                            current,
                            amount,
                        })?
                }
            }
        };

        debug!(
            service = %service,
            resource = %self.resource,
            unit = entry.unit.as_str(),
            quota,
            "Resolved quota value"
        );

        Ok(QuotaValue {
            service,
            resource: self.resource.clone(),
            quota,
        })
    }

    /// Amount converted into `target`
    fn amount_in(&self, target: Unit) -> Result<u64> {
        match self.unit {
            Some(unit) => Unit::convert(&self.amount, unit, target),
            None => self.amount.parse::<u64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow => Error::ValueOutOfRange(self.amount.clone()),
                _ => Error::InvalidInteger(self.amount.clone()),
            }),
        }
    }
}

impl FromStr for ValueSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(service) = &self.service {
            write!(f, "{service}/")?;
        }
        write!(
            f,
            "{}{}{}{}",
            self.resource,
            self.operation.as_str(),
            self.amount,
            self.unit.map_or("", Unit::as_str)
        )
    }
}

/// A set of resolved quota values, at most one per resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaRequest {
    values: BTreeMap<(String, String), u64>,
}

impl QuotaRequest {
    /// Parse and resolve a list of user supplied values
    ///
    /// # Errors
    /// Returns the first parse or resolution error, or
    /// [`Error::DuplicateValue`] if a resource appears twice
    pub fn parse<S: AsRef<str>>(inputs: &[S], catalog: &impl ResourceCatalog) -> Result<Self> {
        let mut request = Self::default();
        for input in inputs {
            let value = ValueSpec::parse(input.as_ref())?.resolve(catalog)?;
            request.insert(value)?;
        }
        Ok(request)
    }

    /// Add a resolved value
    ///
    /// # Errors
    /// Returns [`Error::DuplicateValue`] if the resource already has a value
    pub fn insert(&mut self, value: QuotaValue) -> Result<()> {
        let key = (value.service, value.resource);
        if self.values.contains_key(&key) {
            return Err(Error::DuplicateValue {
                service: key.0,
                resource: key.1,
            });
        }
        self.values.insert(key, value.quota);
        Ok(())
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values ordered by service, then resource
    pub fn values(&self) -> impl Iterator<Item = QuotaValue> + '_ {
        self.values
            .iter()
            .map(|((service, resource), quota)| QuotaValue {
                service: service.clone(),
                resource: resource.clone(),
                quota: *quota,
            })
    }

    /// Body for `PUT /v1/domains/:id/projects/:id`
    #[must_use]
    pub fn to_project_request(&self) -> ProjectQuotaRequest {
        let mut services: Vec<ServiceQuotas> = Vec::new();
        for value in self.values() {
            let resource = ResourceQuota {
                name: value.resource,
                quota: value.quota,
            };
            match services.last_mut() {
                Some(last) if last.service_type == value.service => last.resources.push(resource),
                _ => services.push(ServiceQuotas {
                    service_type: value.service,
                    resources: vec![resource],
                }),
            }
        }

        ProjectQuotaRequest {
            project: ProjectQuotaBody { services },
        }
    }

    /// Body for a LIQUID's `PUT /v1/projects/:uuid/quota`
    #[must_use]
    pub fn to_liquid_request(&self) -> ServiceQuotaRequest {
        ServiceQuotaRequest {
            resources: self
                .values()
                .map(|value| {
                    (
                        value.resource,
                        ResourceQuotaRequest {
                            quota: value.quota,
                            per_az: BTreeMap::new(),
                        },
                    )
                })
                .collect(),
            project_metadata: None,
        }
    }
}

/// Body of a Limes project quota update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectQuotaRequest {
    /// Wrapped body
    pub project: ProjectQuotaBody,
}

/// Inner body of a [`ProjectQuotaRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectQuotaBody {
    /// Quotas grouped by service
    pub services: Vec<ServiceQuotas>,
}

/// Quotas for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceQuotas {
    /// Service type
    #[serde(rename = "type")]
    pub service_type: String,
    /// Quotas per resource
    pub resources: Vec<ResourceQuota>,
}

/// Quota for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceQuota {
    /// Resource name
    pub name: String,
    /// New quota in the resource's unit
    pub quota: u64,
}

impl ResourceCatalog for ProjectReport {
    fn lookup(&self, service: &str, resource: &str) -> Result<ResourceEntry> {
        self.resource(service, resource)
            .map(|r| ResourceEntry {
                unit: r.unit,
                quota: r.quota,
            })
            .ok_or_else(|| Error::UnknownResource {
                service: service.to_string(),
                resource: resource.to_string(),
            })
    }
}

/// Catalog view of a single LIQUID
#[derive(Debug, Clone, Copy)]
pub struct LiquidCatalog<'a> {
    service_type: &'a str,
    info: &'a ServiceInfo,
}

impl<'a> LiquidCatalog<'a> {
    /// Wrap the service info of the LIQUID for `service_type`
    #[must_use]
    pub const fn new(service_type: &'a str, info: &'a ServiceInfo) -> Self {
        Self { service_type, info }
    }
}

impl ResourceCatalog for LiquidCatalog<'_> {
    fn fixed_service(&self) -> Option<&str> {
        Some(self.service_type)
    }

    fn lookup(&self, service: &str, resource: &str) -> Result<ResourceEntry> {
        let info = self
            .info
            .resources
            .get(resource)
            .ok_or_else(|| Error::UnknownResource {
                service: service.to_string(),
                resource: resource.to_string(),
            })?;

        if !info.has_quota {
            return Err(Error::QuotaNotAccepted {
                service: service.to_string(),
                resource: resource.to_string(),
            });
        }
        if info.topology == Topology::AzSeparated {
            return Err(Error::PerAzQuotaRequired {
                service: service.to_string(),
                resource: resource.to_string(),
            });
        }

        Ok(ResourceEntry {
            unit: info.unit,
            quota: None,
        })
    }
}
