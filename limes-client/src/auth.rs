//! Keystone v3 authentication options

use serde_json::{Value, json};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{ClientError, Result};

/// Endpoint interface to pick from the service catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interface {
    /// Public endpoints
    #[default]
    Public,
    /// Internal endpoints
    Internal,
    /// Admin endpoints
    Admin,
}

impl Interface {
    /// Interface name as used in the catalog
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interface {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_end_matches("URL") {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "admin" => Ok(Self::Admin),
            other => Err(ClientError::config(format!(
                "unknown interface {other:?} (expected public, internal or admin)"
            ))),
        }
    }
}

/// Credentials and scope for a Keystone token request
///
/// Field names follow the `OS_*` environment variables of the OpenStack
/// command line clients.
#[derive(Clone, Default)]
pub struct AuthOptions {
    /// Keystone URL, e.g. `https://keystone.example.com/v3`
    pub auth_url: String,
    /// User name
    pub username: Option<String>,
    /// User ID
    pub user_id: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Name of the user's domain
    pub user_domain_name: Option<String>,
    /// ID of the user's domain
    pub user_domain_id: Option<String>,
    /// Project name to scope to
    pub project_name: Option<String>,
    /// Project ID to scope to
    pub project_id: Option<String>,
    /// Name of the domain of the project to scope to
    pub project_domain_name: Option<String>,
    /// ID of the domain of the project to scope to
    pub project_domain_id: Option<String>,
    /// Domain name to scope to
    pub domain_name: Option<String>,
    /// Domain ID to scope to
    pub domain_id: Option<String>,
    /// Application credential ID
    pub application_credential_id: Option<String>,
    /// Application credential name
    pub application_credential_name: Option<String>,
    /// Application credential secret
    pub application_credential_secret: Option<String>,
    /// Existing token to rescope
    pub token: Option<String>,
    /// Region to pick endpoints in
    pub region_name: Option<String>,
    /// Interface to pick endpoints for
    pub interface: Interface,
    /// CA bundle for TLS verification
    pub cacert: Option<PathBuf>,
    /// Skip TLS verification
    pub insecure: bool,
}

impl fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthOptions")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("user_id", &self.user_id)
            .field("project_name", &self.project_name)
            .field("project_id", &self.project_id)
            .field("domain_name", &self.domain_name)
            .field("domain_id", &self.domain_id)
            .field("application_credential_id", &self.application_credential_id)
            .field("region_name", &self.region_name)
            .field("interface", &self.interface)
            .finish_non_exhaustive()
    }
}

impl AuthOptions {
    /// URL of the token endpoint
    #[must_use]
    pub fn tokens_url(&self) -> String {
        let base = self.auth_url.trim_end_matches('/');
        if base.ends_with("/v3") {
            format!("{base}/auth/tokens")
        } else {
            format!("{base}/v3/auth/tokens")
        }
    }

    /// Body of `POST /v3/auth/tokens`
    ///
    /// # Errors
    /// Returns [`ClientError::Auth`] when no usable credential combination is
    /// configured
    pub fn token_request(&self) -> Result<Value> {
        if self.auth_url.is_empty() {
            return Err(ClientError::auth(
                "no auth URL given (set --os-auth-url or OS_AUTH_URL)",
            ));
        }

        if let Some(secret) = &self.application_credential_secret {
            let credential = if let Some(id) = &self.application_credential_id {
                json!({"id": id, "secret": secret})
            } else if let Some(name) = &self.application_credential_name {
                json!({"name": name, "secret": secret, "user": self.user()?})
            } else {
                return Err(ClientError::auth(
                    "application credential secret given without credential ID or name",
                ));
            };

            return Ok(json!({"auth": {"identity": {
                "methods": ["application_credential"],
                "application_credential": credential,
            }}}));
        }

        let identity = if let Some(token) = &self.token {
            json!({"methods": ["token"], "token": {"id": token}})
        } else if let Some(password) = &self.password {
            let mut user = self.user()?;
            user["password"] = json!(password);
            json!({"methods": ["password"], "password": {"user": user}})
        } else {
            return Err(ClientError::auth(
                "no credentials given (set a password, token or application credential)",
            ));
        };

        let mut auth = json!({"identity": identity});
        if let Some(scope) = self.scope()? {
            auth["scope"] = scope;
        }

        Ok(json!({"auth": auth}))
    }

    fn user(&self) -> Result<Value> {
        if let Some(id) = &self.user_id {
            return Ok(json!({"id": id}));
        }

        let name = self
            .username
            .as_ref()
            .ok_or_else(|| ClientError::auth("no user name or user ID given"))?;
        let domain = Self::domain_ref(
            self.user_domain_id.as_ref(),
            self.user_domain_name.as_ref(),
        )
        .ok_or_else(|| ClientError::auth(format!("user {name:?} given without user domain")))?;

        Ok(json!({"name": name, "domain": domain}))
    }

    fn scope(&self) -> Result<Option<Value>> {
        if let Some(id) = &self.project_id {
            return Ok(Some(json!({"project": {"id": id}})));
        }

        if let Some(name) = &self.project_name {
            let domain = Self::domain_ref(
                self.project_domain_id.as_ref(),
                self.project_domain_name.as_ref(),
            )
            .or_else(|| {
                Self::domain_ref(self.user_domain_id.as_ref(), self.user_domain_name.as_ref())
            })
            .ok_or_else(|| {
                ClientError::auth(format!("project {name:?} given without project domain"))
            })?;
            return Ok(Some(json!({"project": {"name": name, "domain": domain}})));
        }

        Ok(Self::domain_ref(self.domain_id.as_ref(), self.domain_name.as_ref())
            .map(|domain| json!({"domain": domain})))
    }

    fn domain_ref(id: Option<&String>, name: Option<&String>) -> Option<Value> {
        id.map(|id| json!({"id": id}))
            .or_else(|| name.map(|name| json!({"name": name})))
    }
}
