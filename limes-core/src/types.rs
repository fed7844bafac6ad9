//! Keystone identity types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keystone domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain ID
    pub id: String,
    /// Domain name
    pub name: String,
    /// Whether the domain is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Keystone project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    pub id: String,
    /// Project name
    pub name: String,
    /// ID of the domain owning the project
    pub domain_id: String,
    /// ID of the parent project (or of the domain for top-level projects)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

const fn default_enabled() -> bool {
    true
}

/// Reference to a domain as it appears in a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRef {
    /// Domain ID
    pub id: String,
    /// Domain name
    #[serde(default)]
    pub name: String,
}

/// Reference to a project as it appears in a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project ID
    pub id: String,
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Domain owning the project
    pub domain: DomainRef,
}

/// What a Keystone token is scoped to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenScope {
    /// Project scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
    /// Domain scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainRef>,
}

impl TokenScope {
    /// Domain the token is scoped to, directly or through its project
    #[must_use]
    pub fn domain(&self) -> Option<&DomainRef> {
        self.domain
            .as_ref()
            .or_else(|| self.project.as_ref().map(|p| &p.domain))
    }
}

impl From<&DomainRef> for Domain {
    fn from(domain: &DomainRef) -> Self {
        Self {
            id: domain.id.clone(),
            name: domain.name.clone(),
            enabled: true,
        }
    }
}

impl From<&ProjectRef> for Project {
    fn from(project: &ProjectRef) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            domain_id: project.domain.id.clone(),
            parent_id: None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
