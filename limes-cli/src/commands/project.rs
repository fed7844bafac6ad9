//! Project commands

use anyhow::{Context, Result};
use limes_client::{IdentityApi, LimesApi, ReportFilter};
use limes_core::QuotaRequest;
use limes_render::{ProjectRatesReports, ProjectReports, RenderOptions, render};
use std::io::Write;
use tracing::info;

use crate::lookup::{resolve_domain, resolve_project};

pub async fn list(
    limes: &dyn LimesApi,
    identity: &dyn IdentityApi,
    domain: Option<&str>,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let domain = resolve_domain(identity, domain).await?;
    let reports = limes
        .project_reports(&domain.id, filter)
        .await
        .with_context(|| format!("Failed to list projects of domain {domain}"))?;
    render(out, &ProjectReports::many(&domain.id, &reports), options)?;
    Ok(())
}

pub async fn show(
    limes: &dyn LimesApi,
    identity: &dyn IdentityApi,
    project: Option<&str>,
    domain: Option<&str>,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let project = resolve_project(identity, project, domain).await?;
    let report = limes
        .project_report(&project.domain_id, &project.id, filter)
        .await
        .with_context(|| format!("Failed to get report for project {project}"))?;
    render(out, &ProjectReports::one(&project.domain_id, &report), options)?;
    Ok(())
}

pub async fn sync(
    limes: &dyn LimesApi,
    identity: &dyn IdentityApi,
    project: Option<&str>,
    domain: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let project = resolve_project(identity, project, domain).await?;
    limes
        .sync_project(&project.domain_id, &project.id)
        .await
        .with_context(|| format!("Failed to schedule sync for project {project}"))?;

    writeln!(out, "Successfully scheduled a sync of project {project}")?;
    Ok(())
}

/// Parse the quota values against the project's current report and send
/// them as one update
pub async fn set(
    limes: &dyn LimesApi,
    identity: &dyn IdentityApi,
    project: Option<&str>,
    domain: Option<&str>,
    values: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let project = resolve_project(identity, project, domain).await?;
    let report = limes
        .project_report(&project.domain_id, &project.id, &ReportFilter::default())
        .await
        .with_context(|| format!("Failed to get report for project {project}"))?;

    let request = QuotaRequest::parse(values, &report).context("Invalid quota values")?;
    for value in request.values() {
        info!(
            service = %value.service,
            resource = %value.resource,
            quota = value.quota,
            "Setting quota"
        );
    }

    limes
        .set_project_quota(&project.domain_id, &project.id, &request.to_project_request())
        .await
        .with_context(|| format!("Failed to set quotas of project {project}"))?;

    writeln!(
        out,
        "Successfully updated {} quota(s) of project {project}",
        request.len()
    )?;
    Ok(())
}

pub async fn list_rates(
    limes: &dyn LimesApi,
    identity: &dyn IdentityApi,
    domain: Option<&str>,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let domain = resolve_domain(identity, domain).await?;
    let reports = limes
        .project_rates_reports(&domain.id, filter)
        .await
        .with_context(|| format!("Failed to list project rates of domain {domain}"))?;
    render(out, &ProjectRatesReports::many(&domain.id, &reports), options)?;
    Ok(())
}

pub async fn show_rates(
    limes: &dyn LimesApi,
    identity: &dyn IdentityApi,
    project: Option<&str>,
    domain: Option<&str>,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let project = resolve_project(identity, project, domain).await?;
    let report = limes
        .project_rates(&project.domain_id, &project.id, filter)
        .await
        .with_context(|| format!("Failed to get rates of project {project}"))?;
    render(out, &ProjectRatesReports::one(&project.domain_id, &report), options)?;
    Ok(())
}
