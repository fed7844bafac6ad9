//! HTTP implementations of the API traits

use async_trait::async_trait;
use limes_core::liquid::{ServiceCapacityRequest, ServiceInfo, ServiceQuotaRequest, ServiceUsageRequest};
use limes_core::quota::ProjectQuotaRequest;
use limes_core::reports::{
    ClusterEnvelope, DomainEnvelope, DomainsEnvelope, ProjectEnvelope, ProjectsEnvelope,
};
use limes_core::{
    ClusterRatesReport, ClusterReport, Domain, DomainReport, Project, ProjectRatesReport,
    ProjectReport, TokenScope,
};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    ClientError, IdentityApi, LIMES_SERVICE_TYPE, LimesApi, LiquidApi, ReportFilter, Result,
    Session, liquid_service_type,
};

/// Append percent-encoded path segments to a base URL
fn join_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ClientError::config(format!("invalid endpoint URL {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ClientError::config(format!("endpoint URL {base:?} cannot have a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Limes API client
#[derive(Debug, Clone)]
pub struct HttpLimes {
    session: Arc<Session>,
    endpoint: String,
}

impl HttpLimes {
    /// Client for the Limes endpoint in the session's catalog
    pub fn new(session: Arc<Session>) -> Result<Self> {
        let endpoint = session.endpoint_for(LIMES_SERVICE_TYPE)?;
        Ok(Self::with_endpoint(session, endpoint))
    }

    /// Client for an explicit Limes endpoint
    #[must_use]
    pub fn with_endpoint(session: Arc<Session>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        debug!(endpoint = %endpoint, "Using Limes endpoint");
        Self { session, endpoint }
    }

    fn url(&self, segments: &[&str]) -> Result<String> {
        join_url(&self.endpoint, segments).map(String::from)
    }

    fn report_url(&self, segments: &[&str], filter: &ReportFilter) -> Result<String> {
        let mut url = join_url(&self.endpoint, segments)?;
        filter.apply_to(&mut url);
        Ok(url.into())
    }
}

#[async_trait]
impl LimesApi for HttpLimes {
    async fn cluster_report(&self, filter: &ReportFilter) -> Result<ClusterReport> {
        let url = self.report_url(&["v1", "clusters", "current"], filter)?;
        let envelope: ClusterEnvelope<ClusterReport> =
            self.session.get_json(&url, &[]).await?;
        Ok(envelope.cluster)
    }

    async fn domain_reports(&self, filter: &ReportFilter) -> Result<Vec<DomainReport>> {
        let url = self.report_url(&["v1", "domains"], filter)?;
        let envelope: DomainsEnvelope = self.session.get_json(&url, &[]).await?;
        Ok(envelope.domains)
    }

    async fn domain_report(&self, domain_id: &str, filter: &ReportFilter) -> Result<DomainReport> {
        let url = self.report_url(&["v1", "domains", domain_id], filter)?;
        let envelope: DomainEnvelope = self.session.get_json(&url, &[]).await?;
        Ok(envelope.domain)
    }

    async fn project_reports(
        &self,
        domain_id: &str,
        filter: &ReportFilter,
    ) -> Result<Vec<ProjectReport>> {
        let url = self.report_url(&["v1", "domains", domain_id, "projects"], filter)?;
        let envelope: ProjectsEnvelope<ProjectReport> =
            self.session.get_json(&url, &[]).await?;
        Ok(envelope.projects)
    }

    async fn project_report(
        &self,
        domain_id: &str,
        project_id: &str,
        filter: &ReportFilter,
    ) -> Result<ProjectReport> {
        let url = self.report_url(
            &["v1", "domains", domain_id, "projects", project_id],
            filter,
        )?;
        let envelope: ProjectEnvelope<ProjectReport> =
            self.session.get_json(&url, &[]).await?;
        Ok(envelope.project)
    }

    async fn sync_project(&self, domain_id: &str, project_id: &str) -> Result<()> {
        let url = self.url(&["v1", "domains", domain_id, "projects", project_id, "sync"])?;
        let status = self
            .session
            .send_no_content(Method::POST, &url, None::<&()>)
            .await?;
        info!(project_id, status = status.as_u16(), "Sync scheduled");
        Ok(())
    }

    async fn set_project_quota(
        &self,
        domain_id: &str,
        project_id: &str,
        request: &ProjectQuotaRequest,
    ) -> Result<()> {
        let url = self.url(&["v1", "domains", domain_id, "projects", project_id])?;
        let status = self
            .session
            .send_no_content(Method::PUT, &url, Some(request))
            .await?;
        info!(project_id, status = status.as_u16(), "Quota updated");
        Ok(())
    }

    async fn cluster_rates(&self, filter: &ReportFilter) -> Result<ClusterRatesReport> {
        let url = self.report_url(
            &["rates", "v1", "clusters", "current"],
            &filter.for_rates(),
        )?;
        let envelope: ClusterEnvelope<ClusterRatesReport> = self
            .session
            .get_json(&url, &[])
            .await?;
        Ok(envelope.cluster)
    }

    async fn project_rates_reports(
        &self,
        domain_id: &str,
        filter: &ReportFilter,
    ) -> Result<Vec<ProjectRatesReport>> {
        let url = self.report_url(
            &["rates", "v1", "domains", domain_id, "projects"],
            &filter.for_rates(),
        )?;
        let envelope: ProjectsEnvelope<ProjectRatesReport> = self
            .session
            .get_json(&url, &[])
            .await?;
        Ok(envelope.projects)
    }

    async fn project_rates(
        &self,
        domain_id: &str,
        project_id: &str,
        filter: &ReportFilter,
    ) -> Result<ProjectRatesReport> {
        let url = self.report_url(
            &["rates", "v1", "domains", domain_id, "projects", project_id],
            &filter.for_rates(),
        )?;
        let envelope: ProjectEnvelope<ProjectRatesReport> = self
            .session
            .get_json(&url, &[])
            .await?;
        Ok(envelope.project)
    }
}

#[derive(Deserialize)]
struct KeystoneDomain {
    domain: Domain,
}

#[derive(Deserialize)]
struct KeystoneDomains {
    #[serde(default)]
    domains: Vec<Domain>,
}

#[derive(Deserialize)]
struct KeystoneProject {
    project: Project,
}

#[derive(Deserialize)]
struct KeystoneProjects {
    #[serde(default)]
    projects: Vec<Project>,
}

/// Keystone client for domain and project lookups
#[derive(Debug, Clone)]
pub struct HttpIdentity {
    session: Arc<Session>,
    endpoint: String,
}

impl HttpIdentity {
    /// Client for the session's Keystone
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        let endpoint = session.identity_endpoint();
        Self { session, endpoint }
    }

    fn url(&self, segments: &[&str]) -> Result<String> {
        join_url(&self.endpoint, segments).map(String::from)
    }
}

#[async_trait]
impl IdentityApi for HttpIdentity {
    fn token_scope(&self) -> TokenScope {
        self.session.scope().clone()
    }

    async fn get_domain(&self, id: &str) -> Result<Option<Domain>> {
        let url = self.url(&["domains", id])?;
        let found: Option<KeystoneDomain> = self.session.get_optional_json(&url).await?;
        Ok(found.map(|d| d.domain))
    }

    async fn find_domains(&self, name: &str) -> Result<Vec<Domain>> {
        let url = self.url(&["domains"])?;
        let found: KeystoneDomains = self
            .session
            .get_json(&url, &[("name", name.to_string())])
            .await?;
        Ok(found.domains)
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let url = self.url(&["projects", id])?;
        let found: Option<KeystoneProject> = self.session.get_optional_json(&url).await?;
        Ok(found.map(|p| p.project))
    }

    async fn find_projects(&self, name: &str, domain_id: Option<&str>) -> Result<Vec<Project>> {
        let url = self.url(&["projects"])?;
        let mut query = vec![("name", name.to_string())];
        if let Some(domain_id) = domain_id {
            query.push(("domain_id", domain_id.to_string()));
        }
        let found: KeystoneProjects = self.session.get_json(&url, &query).await?;
        Ok(found.projects)
    }
}

/// Client for one LIQUID
#[derive(Debug, Clone)]
pub struct HttpLiquid {
    session: Arc<Session>,
    endpoint: String,
}

impl HttpLiquid {
    /// Client for the LIQUID of a Limes service type, found in the catalog
    pub fn new(session: Arc<Session>, service_type: &str) -> Result<Self> {
        let endpoint = session.endpoint_for(&liquid_service_type(service_type))?;
        Ok(Self::with_endpoint(session, endpoint))
    }

    /// Client for an explicit LIQUID endpoint
    #[must_use]
    pub fn with_endpoint(session: Arc<Session>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        debug!(endpoint = %endpoint, "Using LIQUID endpoint");
        Self { session, endpoint }
    }

    fn url(&self, segments: &[&str]) -> Result<String> {
        join_url(&self.endpoint, segments).map(String::from)
    }
}

#[async_trait]
impl LiquidApi for HttpLiquid {
    async fn service_info(&self) -> Result<ServiceInfo> {
        let url = self.url(&["v1", "info"])?;
        self.session.get_json(&url, &[]).await
    }

    async fn report_capacity(&self, request: &ServiceCapacityRequest) -> Result<Value> {
        let url = self.url(&["v1", "report-capacity"])?;
        self.session.send_json(Method::POST, &url, request).await
    }

    async fn report_usage(&self, project_id: &str, request: &ServiceUsageRequest) -> Result<Value> {
        let url = self.url(&["v1", "projects", project_id, "report-usage"])?;
        self.session.send_json(Method::POST, &url, request).await
    }

    async fn set_quota(&self, project_id: &str, request: &ServiceQuotaRequest) -> Result<()> {
        let url = self.url(&["v1", "projects", project_id, "quota"])?;
        let status = self
            .session
            .send_no_content(Method::PUT, &url, Some(request))
            .await?;
        info!(project_id, status = status.as_u16(), "LIQUID quota updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_encodes_segments() {
        assert_eq!(
            join_url("https://limes.example.com", &["v1", "domains", "d1"]).unwrap().as_str(),
            "https://limes.example.com/v1/domains/d1"
        );
        assert_eq!(
            join_url("https://keystone.example.com/v3/", &["projects", "my project"]).unwrap().as_str(),
            "https://keystone.example.com/v3/projects/my%20project"
        );
        assert_eq!(
            join_url("https://keystone.example.com/v3", &["domains", "a/b"]).unwrap().as_str(),
            "https://keystone.example.com/v3/domains/a%2Fb"
        );
    }

    #[test]
    fn join_url_rejects_invalid_base() {
        assert!(matches!(
            join_url("not a url", &["v1"]),
            Err(ClientError::InvalidConfig { .. })
        ));
    }
}
