//! API traits for pluggable implementations
//!
//! Each trait has two implementations:
//! - an HTTP client in [`crate::http`] talking to the real service
//! - [`MockBackend`](crate::MockBackend), keeping everything in memory
//!
//! All implementations must be `Send + Sync` so that command handlers can
//! hold them as trait objects across await points.

use async_trait::async_trait;
use limes_core::liquid::{ServiceCapacityRequest, ServiceInfo, ServiceQuotaRequest, ServiceUsageRequest};
use limes_core::quota::ProjectQuotaRequest;
use limes_core::{
    ClusterRatesReport, ClusterReport, Domain, DomainReport, Project, ProjectRatesReport,
    ProjectReport, TokenScope,
};
use serde_json::Value;

use crate::{ReportFilter, Result};

/// Limes resources and rates API
#[async_trait]
pub trait LimesApi: Send + Sync {
    /// `GET /v1/clusters/current`
    async fn cluster_report(&self, filter: &ReportFilter) -> Result<ClusterReport>;

    /// `GET /v1/domains`
    async fn domain_reports(&self, filter: &ReportFilter) -> Result<Vec<DomainReport>>;

    /// `GET /v1/domains/:id`
    async fn domain_report(&self, domain_id: &str, filter: &ReportFilter) -> Result<DomainReport>;

    /// `GET /v1/domains/:id/projects`
    async fn project_reports(
        &self,
        domain_id: &str,
        filter: &ReportFilter,
    ) -> Result<Vec<ProjectReport>>;

    /// `GET /v1/domains/:id/projects/:id`
    async fn project_report(
        &self,
        domain_id: &str,
        project_id: &str,
        filter: &ReportFilter,
    ) -> Result<ProjectReport>;

    /// `POST /v1/domains/:id/projects/:id/sync`
    async fn sync_project(&self, domain_id: &str, project_id: &str) -> Result<()>;

    /// `PUT /v1/domains/:id/projects/:id`
    async fn set_project_quota(
        &self,
        domain_id: &str,
        project_id: &str,
        request: &ProjectQuotaRequest,
    ) -> Result<()>;

    /// `GET /rates/v1/clusters/current`
    async fn cluster_rates(&self, filter: &ReportFilter) -> Result<ClusterRatesReport>;

    /// `GET /rates/v1/domains/:id/projects`
    async fn project_rates_reports(
        &self,
        domain_id: &str,
        filter: &ReportFilter,
    ) -> Result<Vec<ProjectRatesReport>>;

    /// `GET /rates/v1/domains/:id/projects/:id`
    async fn project_rates(
        &self,
        domain_id: &str,
        project_id: &str,
        filter: &ReportFilter,
    ) -> Result<ProjectRatesReport>;
}

/// The parts of Keystone needed to resolve domains and projects
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// What the current token is scoped to
    fn token_scope(&self) -> TokenScope;

    /// Domain by ID, `None` if it does not exist
    async fn get_domain(&self, id: &str) -> Result<Option<Domain>>;

    /// Domains with the given name
    async fn find_domains(&self, name: &str) -> Result<Vec<Domain>>;

    /// Project by ID, `None` if it does not exist
    async fn get_project(&self, id: &str) -> Result<Option<Project>>;

    /// Projects with the given name, optionally restricted to one domain
    async fn find_projects(&self, name: &str, domain_id: Option<&str>) -> Result<Vec<Project>>;
}

/// One LIQUID endpoint
#[async_trait]
pub trait LiquidApi: Send + Sync {
    /// `GET /v1/info`
    async fn service_info(&self) -> Result<ServiceInfo>;

    /// `POST /v1/report-capacity`
    async fn report_capacity(&self, request: &ServiceCapacityRequest) -> Result<Value>;

    /// `POST /v1/projects/:uuid/report-usage`
    async fn report_usage(&self, project_id: &str, request: &ServiceUsageRequest) -> Result<Value>;

    /// `PUT /v1/projects/:uuid/quota`
    async fn set_quota(&self, project_id: &str, request: &ServiceQuotaRequest) -> Result<()>;
}
