//! In-memory implementation of all API traits

use async_trait::async_trait;
use limes_core::liquid::{ServiceCapacityRequest, ServiceInfo, ServiceQuotaRequest, ServiceUsageRequest};
use limes_core::quota::ProjectQuotaRequest;
use limes_core::reports::{ClusterServiceRates, ProjectServiceReport, ProjectServiceRates};
use limes_core::{
    ClusterRatesReport, ClusterReport, Domain, DomainReport, Project, ProjectRatesReport,
    ProjectReport, TokenScope,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{ClientError, IdentityApi, LimesApi, LiquidApi, ReportFilter, Result};

/// Mock backend for testing (no network access)
///
/// One value stands in for Keystone, Limes and a LIQUID at once. Clones
/// share their state, so a test can hand a clone to the code under test
/// and inspect the recorded calls afterwards.
///
/// # Example
/// ```
/// use limes_client::{LimesApi, MockBackend, ReportFilter};
/// use limes_core::ProjectReport;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let backend = MockBackend::new();
/// backend.add_project_report("d1", ProjectReport {
///     id: "p1".to_string(),
///     name: "web".to_string(),
///     ..Default::default()
/// }).await;
///
/// backend.sync_project("d1", "p1").await.unwrap();
/// assert_eq!(backend.synced_projects().await, vec![("d1".to_string(), "p1".to_string())]);
/// # });
/// ```
#[derive(Clone)]
pub struct MockBackend {
    scope: TokenScope,
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    domains: Vec<Domain>,
    projects: Vec<Project>,
    cluster: ClusterReport,
    cluster_rates: ClusterRatesReport,
    domain_reports: Vec<DomainReport>,
    project_reports: BTreeMap<String, Vec<ProjectReport>>,
    project_rates: BTreeMap<String, Vec<ProjectRatesReport>>,
    service_info: Option<ServiceInfo>,
    capacity_report: Value,
    usage_report: Value,
    quota_requests: Vec<(String, String, ProjectQuotaRequest)>,
    syncs: Vec<(String, String)>,
    liquid_quotas: Vec<(String, ServiceQuotaRequest)>,
    deny_id_lookups: bool,
    call_count: usize,
}

fn forbidden(kind: &str, id: &str) -> ClientError {
    ClientError::UnexpectedStatus {
        method: "GET".to_string(),
        url: format!("/v3/{kind}/{id}"),
        status: 403,
        body: "You are not authorized to perform the requested action.".to_string(),
    }
}

impl MockBackend {
    /// Create an empty mock backend with an unscoped token
    #[must_use]
    pub fn new() -> Self {
        Self {
            scope: TokenScope::default(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Pretend the token is scoped to `scope`
    #[must_use]
    pub fn with_scope(mut self, scope: TokenScope) -> Self {
        self.scope = scope;
        self
    }

    /// Get the number of API calls made (for testing)
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.call_count
    }

    /// Register a Keystone domain
    pub async fn add_domain(&self, domain: Domain) {
        self.state.lock().await.domains.push(domain);
    }

    /// Register a Keystone project
    pub async fn add_project(&self, project: Project) {
        self.state.lock().await.projects.push(project);
    }

    /// Answer domain and project lookups by ID with 403, as Keystone does
    /// for tokens without admin rights
    pub async fn deny_id_lookups(&self) {
        self.state.lock().await.deny_id_lookups = true;
    }

    /// Set the cluster report
    pub async fn set_cluster_report(&self, report: ClusterReport) {
        self.state.lock().await.cluster = report;
    }

    /// Set the cluster rates report
    pub async fn set_cluster_rates(&self, report: ClusterRatesReport) {
        self.state.lock().await.cluster_rates = report;
    }

    /// Add a domain report
    pub async fn add_domain_report(&self, report: DomainReport) {
        self.state.lock().await.domain_reports.push(report);
    }

    /// Add a project report below a domain
    pub async fn add_project_report(&self, domain_id: &str, report: ProjectReport) {
        self.state
            .lock()
            .await
            .project_reports
            .entry(domain_id.to_string())
            .or_default()
            .push(report);
    }

    /// Add a project rates report below a domain
    pub async fn add_project_rates(&self, domain_id: &str, report: ProjectRatesReport) {
        self.state
            .lock()
            .await
            .project_rates
            .entry(domain_id.to_string())
            .or_default()
            .push(report);
    }

    /// Set what the LIQUID returns from `/v1/info`
    pub async fn set_service_info(&self, info: ServiceInfo) {
        self.state.lock().await.service_info = Some(info);
    }

    /// Set the LIQUID capacity report
    pub async fn set_capacity_report(&self, report: Value) {
        self.state.lock().await.capacity_report = report;
    }

    /// Set the LIQUID usage report
    pub async fn set_usage_report(&self, report: Value) {
        self.state.lock().await.usage_report = report;
    }

    /// Quota updates sent to Limes, as `(domain_id, project_id, body)`
    pub async fn quota_requests(&self) -> Vec<(String, String, ProjectQuotaRequest)> {
        self.state.lock().await.quota_requests.clone()
    }

    /// Projects a sync was requested for, as `(domain_id, project_id)`
    pub async fn synced_projects(&self) -> Vec<(String, String)> {
        self.state.lock().await.syncs.clone()
    }

    /// Quota updates sent to the LIQUID, as `(project_id, body)`
    pub async fn liquid_quota_requests(&self) -> Vec<(String, ServiceQuotaRequest)> {
        self.state.lock().await.liquid_quotas.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

fn not_found(kind: &'static str, id: &str) -> ClientError {
    ClientError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn filter_project(mut report: ProjectReport, filter: &ReportFilter) -> ProjectReport {
    report.services = report
        .services
        .into_iter()
        .filter(|srv| filter.accepts_service(&srv.area, &srv.service_type))
        .map(|mut srv: ProjectServiceReport| {
            srv.resources.retain(|res| filter.accepts_resource(&res.name));
            if !filter.detail {
                for res in &mut srv.resources {
                    res.subresources = None;
                }
            }
            srv
        })
        .collect();
    report
}

fn filter_domain(mut report: DomainReport, filter: &ReportFilter) -> DomainReport {
    report
        .services
        .retain(|srv| filter.accepts_service(&srv.area, &srv.service_type));
    for srv in &mut report.services {
        srv.resources.retain(|res| filter.accepts_resource(&res.name));
    }
    report
}

fn filter_project_rates(mut report: ProjectRatesReport, filter: &ReportFilter) -> ProjectRatesReport {
    report
        .services
        .retain(|srv: &ProjectServiceRates| filter.accepts_service(&srv.area, &srv.service_type));
    report
}

#[async_trait]
impl LimesApi for MockBackend {
    async fn cluster_report(&self, filter: &ReportFilter) -> Result<ClusterReport> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        let mut report = state.cluster.clone();
        report
            .services
            .retain(|srv| filter.accepts_service(&srv.area, &srv.service_type));
        for srv in &mut report.services {
            srv.resources.retain(|res| filter.accepts_resource(&res.name));
            if !filter.detail {
                for res in &mut srv.resources {
                    res.subcapacities = None;
                }
            }
        }

        tracing::debug!(services = report.services.len(), "Mock: Cluster report");
        Ok(report)
    }

    async fn domain_reports(&self, filter: &ReportFilter) -> Result<Vec<DomainReport>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        Ok(state
            .domain_reports
            .iter()
            .cloned()
            .map(|report| filter_domain(report, filter))
            .collect())
    }

    async fn domain_report(&self, domain_id: &str, filter: &ReportFilter) -> Result<DomainReport> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        state
            .domain_reports
            .iter()
            .find(|report| report.id == domain_id)
            .cloned()
            .map(|report| filter_domain(report, filter))
            .ok_or_else(|| not_found("domain", domain_id))
    }

    async fn project_reports(
        &self,
        domain_id: &str,
        filter: &ReportFilter,
    ) -> Result<Vec<ProjectReport>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        let reports = state
            .project_reports
            .get(domain_id)
            .ok_or_else(|| not_found("domain", domain_id))?;
        Ok(reports
            .iter()
            .cloned()
            .map(|report| filter_project(report, filter))
            .collect())
    }

    async fn project_report(
        &self,
        domain_id: &str,
        project_id: &str,
        filter: &ReportFilter,
    ) -> Result<ProjectReport> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        state
            .project_reports
            .get(domain_id)
            .and_then(|reports| reports.iter().find(|report| report.id == project_id))
            .cloned()
            .map(|report| filter_project(report, filter))
            .ok_or_else(|| not_found("project", project_id))
    }

    async fn sync_project(&self, domain_id: &str, project_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        let known = state
            .project_reports
            .get(domain_id)
            .is_some_and(|reports| reports.iter().any(|report| report.id == project_id));
        if !known {
            return Err(not_found("project", project_id));
        }

        state
            .syncs
            .push((domain_id.to_string(), project_id.to_string()));
        tracing::debug!(domain_id, project_id, "Mock: Sync project");
        Ok(())
    }

    async fn set_project_quota(
        &self,
        domain_id: &str,
        project_id: &str,
        request: &ProjectQuotaRequest,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        let report = state
            .project_reports
            .get_mut(domain_id)
            .and_then(|reports| reports.iter_mut().find(|report| report.id == project_id))
            .ok_or_else(|| not_found("project", project_id))?;

        for srv in &request.project.services {
            for res in &srv.resources {
                if let Some(entry) = report
                    .services
                    .iter_mut()
                    .filter(|s| s.service_type == srv.service_type)
                    .flat_map(|s| s.resources.iter_mut())
                    .find(|r| r.name == res.name)
                {
                    entry.quota = Some(res.quota);
                }
            }
        }

        state.quota_requests.push((
            domain_id.to_string(),
            project_id.to_string(),
            request.clone(),
        ));
        tracing::debug!(domain_id, project_id, "Mock: Set project quota");
        Ok(())
    }

    async fn cluster_rates(&self, filter: &ReportFilter) -> Result<ClusterRatesReport> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        let mut report = state.cluster_rates.clone();
        report
            .services
            .retain(|srv: &ClusterServiceRates| filter.accepts_service(&srv.area, &srv.service_type));
        Ok(report)
    }

    async fn project_rates_reports(
        &self,
        domain_id: &str,
        filter: &ReportFilter,
    ) -> Result<Vec<ProjectRatesReport>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        let reports = state
            .project_rates
            .get(domain_id)
            .ok_or_else(|| not_found("domain", domain_id))?;
        Ok(reports
            .iter()
            .cloned()
            .map(|report| filter_project_rates(report, filter))
            .collect())
    }

    async fn project_rates(
        &self,
        domain_id: &str,
        project_id: &str,
        filter: &ReportFilter,
    ) -> Result<ProjectRatesReport> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        state
            .project_rates
            .get(domain_id)
            .and_then(|reports| reports.iter().find(|report| report.id == project_id))
            .cloned()
            .map(|report| filter_project_rates(report, filter))
            .ok_or_else(|| not_found("project", project_id))
    }
}

#[async_trait]
impl IdentityApi for MockBackend {
    fn token_scope(&self) -> TokenScope {
        self.scope.clone()
    }

    async fn get_domain(&self, id: &str) -> Result<Option<Domain>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        if state.deny_id_lookups {
            return Err(forbidden("domains", id));
        }
        Ok(state.domains.iter().find(|d| d.id == id).cloned())
    }

    async fn find_domains(&self, name: &str) -> Result<Vec<Domain>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        Ok(state
            .domains
            .iter()
            .filter(|d| d.name == name)
            .cloned()
            .collect())
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        if state.deny_id_lookups {
            return Err(forbidden("projects", id));
        }
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_projects(&self, name: &str, domain_id: Option<&str>) -> Result<Vec<Project>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        Ok(state
            .projects
            .iter()
            .filter(|p| p.name == name && domain_id.is_none_or(|d| p.domain_id == d))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LiquidApi for MockBackend {
    async fn service_info(&self) -> Result<ServiceInfo> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        state
            .service_info
            .clone()
            .ok_or_else(|| not_found("LIQUID", "service info"))
    }

    async fn report_capacity(&self, request: &ServiceCapacityRequest) -> Result<Value> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        tracing::debug!(azs = request.all_azs.len(), "Mock: Report capacity");
        Ok(state.capacity_report.clone())
    }

    async fn report_usage(&self, project_id: &str, request: &ServiceUsageRequest) -> Result<Value> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        tracing::debug!(project_id, azs = request.all_azs.len(), "Mock: Report usage");
        Ok(state.usage_report.clone())
    }

    async fn set_quota(&self, project_id: &str, request: &ServiceQuotaRequest) -> Result<()> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        state
            .liquid_quotas
            .push((project_id.to_string(), request.clone()));
        tracing::debug!(project_id, "Mock: Set LIQUID quota");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limes_core::reports::ProjectResourceReport;
    use limes_core::{DomainRef, ProjectRef};

    fn project_report() -> ProjectReport {
        ProjectReport {
            id: "p1".to_string(),
            name: "web".to_string(),
            services: vec![
                ProjectServiceReport {
                    service_type: "compute".to_string(),
                    area: "compute".to_string(),
                    resources: vec![
                        ProjectResourceReport {
                            name: "cores".to_string(),
                            quota: Some(10),
                            subresources: Some(serde_json::json!([{"id": "vm1"}])),
                            ..Default::default()
                        },
                        ProjectResourceReport {
                            name: "ram".to_string(),
                            quota: Some(20480),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
                ProjectServiceReport {
                    service_type: "network".to_string(),
                    area: "network".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn project_report_filtering() {
        let backend = MockBackend::new();
        backend.add_project_report("d1", project_report()).await;

        let filter = ReportFilter {
            services: vec!["compute".to_string()],
            resources: vec!["cores".to_string()],
            ..Default::default()
        };
        let report = backend.project_report("d1", "p1", &filter).await.unwrap();
        assert_eq!(report.services.len(), 1);
        assert_eq!(report.services[0].resources.len(), 1);
        assert!(report.services[0].resources[0].subresources.is_none());

        let detailed = ReportFilter {
            detail: true,
            ..Default::default()
        };
        let report = backend.project_report("d1", "p1", &detailed).await.unwrap();
        assert_eq!(report.services.len(), 2);
        assert!(report.services[0].resources[0].subresources.is_some());

        assert_eq!(backend.call_count().await, 2);
    }

    #[tokio::test]
    async fn unknown_project() {
        let backend = MockBackend::new();
        let err = backend
            .project_report("d1", "nope", &ReportFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "project not found: nope");
        assert!(backend.sync_project("d1", "nope").await.is_err());
    }

    #[tokio::test]
    async fn set_quota_is_recorded_and_applied() {
        let backend = MockBackend::new();
        backend.add_project_report("d1", project_report()).await;

        let request = ProjectQuotaRequest {
            project: limes_core::quota::ProjectQuotaBody {
                services: vec![limes_core::quota::ServiceQuotas {
                    service_type: "compute".to_string(),
                    resources: vec![limes_core::quota::ResourceQuota {
                        name: "cores".to_string(),
                        quota: 42,
                    }],
                }],
            },
        };
        backend.set_project_quota("d1", "p1", &request).await.unwrap();

        let recorded = backend.quota_requests().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].2, request);

        let report = backend
            .project_report("d1", "p1", &ReportFilter::default())
            .await
            .unwrap();
        assert_eq!(report.resource("compute", "cores").unwrap().quota, Some(42));
    }

    #[tokio::test]
    async fn identity_lookups() {
        let scope = TokenScope {
            project: Some(ProjectRef {
                id: "p1".to_string(),
                name: "web".to_string(),
                domain: DomainRef {
                    id: "d1".to_string(),
                    name: "acme".to_string(),
                },
            }),
            domain: None,
        };
        let backend = MockBackend::new().with_scope(scope.clone());
        backend
            .add_domain(Domain {
                id: "d1".to_string(),
                name: "acme".to_string(),
                enabled: true,
            })
            .await;
        for (id, domain_id) in [("p1", "d1"), ("p2", "d2")] {
            backend
                .add_project(Project {
                    id: id.to_string(),
                    name: "web".to_string(),
                    domain_id: domain_id.to_string(),
                    parent_id: None,
                })
                .await;
        }

        assert_eq!(backend.token_scope(), scope);
        assert!(backend.get_domain("d1").await.unwrap().is_some());
        assert!(backend.get_domain("acme").await.unwrap().is_none());
        assert_eq!(backend.find_domains("acme").await.unwrap().len(), 1);
        assert_eq!(backend.find_projects("web", None).await.unwrap().len(), 2);
        assert_eq!(
            backend.find_projects("web", Some("d2")).await.unwrap()[0].id,
            "p2"
        );
    }
}
