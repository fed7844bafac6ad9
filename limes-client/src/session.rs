//! Authenticated Keystone session

use limes_core::{DomainRef, ProjectRef, TokenScope};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::{AuthOptions, Catalog, ClientError, IDENTITY_SERVICE_TYPE, Interface, Result};

/// Header carrying the token in requests and the new token in responses
const TOKEN_HEADER: &str = "X-Auth-Token";
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

#[derive(Deserialize)]
struct TokenEnvelope {
    token: TokenBody,
}

#[derive(Deserialize)]
struct TokenBody {
    #[serde(default)]
    project: Option<ProjectRef>,
    #[serde(default)]
    domain: Option<DomainRef>,
    #[serde(default)]
    catalog: Catalog,
    #[serde(default)]
    expires_at: Option<String>,
}

/// An authenticated session against one OpenStack cloud
///
/// Holds the token, its scope and the service catalog. All API clients in
/// this crate send their requests through a session.
pub struct Session {
    http: Client,
    token: String,
    scope: TokenScope,
    catalog: Catalog,
    interface: Interface,
    region: Option<String>,
    auth_url: String,
}

impl Session {
    /// Authenticate against Keystone
    ///
    /// # Errors
    /// Returns an error if the options are incomplete, the HTTP client cannot
    /// be built or Keystone rejects the credentials
    pub async fn authenticate(options: &AuthOptions, timeout: Duration) -> Result<Self> {
        let body = options.token_request()?;
        let http = Self::http_client(options, timeout).await?;
        let url = options.tokens_url();

        info!(url = %url, "Requesting Keystone token");

        let response = http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::auth(format!("cannot reach Keystone at {url}: {e}")))?;
        let response = check_status(response, &Method::POST, &url).await?;

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
            .ok_or_else(|| ClientError::auth("Keystone response lacks X-Subject-Token"))?;

        let envelope: TokenEnvelope = decode(response).await?;
        let TokenBody {
            project,
            domain,
            catalog,
            expires_at,
        } = envelope.token;

        debug!(
            project = project.as_ref().map(|p| p.id.as_str()),
            domain = domain.as_ref().map(|d| d.id.as_str()),
            expires_at = expires_at.as_deref(),
            "Token issued"
        );

        Ok(Self {
            http,
            token,
            scope: TokenScope { project, domain },
            catalog,
            interface: options.interface,
            region: options.region_name.clone(),
            auth_url: options.auth_url.clone(),
        })
    }

    /// Build the HTTP client used for all requests
    ///
    /// # Errors
    /// Returns an error if the CA bundle cannot be read or parsed
    pub async fn http_client(options: &AuthOptions, timeout: Duration) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("limesctl/", env!("CARGO_PKG_VERSION")));

        if let Some(path) = &options.cacert {
            let pem = tokio::fs::read(path).await?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                ClientError::config(format!("invalid CA certificate {}: {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(certificate);
        }

        if options.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder.build()?)
    }

    /// What the token is scoped to
    #[must_use]
    pub const fn scope(&self) -> &TokenScope {
        &self.scope
    }

    /// Endpoint URL for a service type, honoring interface and region
    ///
    /// # Errors
    /// Returns [`ClientError::EndpointNotFound`] if the catalog has no match
    pub fn endpoint_for(&self, service_type: &str) -> Result<String> {
        self.catalog
            .endpoint_for(service_type, self.interface, self.region.as_deref())
    }

    /// Keystone v3 base URL from the catalog, falling back to the auth URL
    #[must_use]
    pub fn identity_endpoint(&self) -> String {
        let base = self
            .endpoint_for(IDENTITY_SERVICE_TYPE)
            .unwrap_or_else(|_| self.auth_url.trim_end_matches('/').to_string());
        if base.ends_with("/v3") {
            base
        } else {
            format!("{base}/v3")
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(TOKEN_HEADER, &self.token)
    }

    async fn execute(&self, builder: RequestBuilder, method: &Method, url: &str) -> Result<Response> {
        debug!(method = %method, url = %url, "Sending request");
        let response = builder.send().await?;
        debug!(status = response.status().as_u16(), "Received response");
        check_status(response, method, url).await
    }

    /// `GET` a JSON document
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut builder = self.request(Method::GET, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = self.execute(builder, &Method::GET, url).await?;
        decode(response).await
    }

    /// `GET` a JSON document that may not exist
    pub(crate) async fn get_optional_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        match self.get_json(url, &[]).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND.as_u16()) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Send a JSON body and decode a JSON answer
    pub(crate) async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(method.clone(), url).json(body);
        let response = self.execute(builder, &method, url).await?;
        decode(response).await
    }

    /// Send an optional JSON body, ignoring the answer body
    pub(crate) async fn send_no_content<B: Serialize + Sync>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<StatusCode> {
        let mut builder = self.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.execute(builder, &method, url).await?;
        Ok(response.status())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("scope", &self.scope)
            .field("interface", &self.interface)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Read a response body as JSON
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn check_status(response: Response, method: &Method, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::UnexpectedStatus {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}
