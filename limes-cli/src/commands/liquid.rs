//! LIQUID commands
//!
//! These talk to a LIQUID directly instead of going through Limes and
//! always print JSON.

use anyhow::{Context, Result};
use limes_client::{IdentityApi, LiquidApi};
use limes_core::QuotaRequest;
use limes_core::liquid::{ProjectMetadata, ServiceCapacityRequest, ServiceUsageRequest};
use limes_core::quota::LiquidCatalog;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::cli::LiquidBodyArgs;

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

async fn read_body<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid request body in {}", path.display()))
}

/// The `--project-id` argument, or the project the token is scoped to
fn project_id(identity: &dyn IdentityApi, arg: Option<&str>) -> Result<String> {
    if let Some(id) = arg {
        return Ok(id.to_string());
    }
    identity
        .token_scope()
        .project
        .map(|p| p.id)
        .context("No --project-id given and the token is not scoped to a project")
}

async fn project_metadata(identity: &dyn IdentityApi, project_id: &str) -> Result<Value> {
    let project = identity
        .get_project(project_id)
        .await?
        .with_context(|| format!("Project {project_id} not found"))?;
    let domain = identity
        .get_domain(&project.domain_id)
        .await?
        .with_context(|| format!("Domain {} not found", project.domain_id))?;
    Ok(ProjectMetadata::new(&project, &domain).to_value())
}

pub async fn service_info(liquid: &dyn LiquidApi, out: &mut impl Write) -> Result<()> {
    let info = liquid
        .service_info()
        .await
        .context("Failed to get service info")?;
    print_json(out, &info)
}

pub async fn report_capacity(
    liquid: &dyn LiquidApi,
    body: &LiquidBodyArgs,
    out: &mut impl Write,
) -> Result<()> {
    let request = match &body.body {
        Some(path) => read_body(path).await?,
        None => ServiceCapacityRequest {
            all_azs: body.az.clone(),
            ..Default::default()
        },
    };

    let report = liquid
        .report_capacity(&request)
        .await
        .context("Failed to get capacity report")?;
    print_json(out, &report)
}

pub async fn report_usage(
    liquid: &dyn LiquidApi,
    identity: &dyn IdentityApi,
    project_id_arg: Option<&str>,
    body: &LiquidBodyArgs,
    out: &mut impl Write,
) -> Result<()> {
    let project_id = project_id(identity, project_id_arg)?;

    let request = if let Some(path) = &body.body {
        read_body(path).await?
    } else {
        let info = liquid
            .service_info()
            .await
            .context("Failed to get service info")?;
        let project_metadata = if info.usage_report_needs_project_metadata {
            Some(project_metadata(identity, &project_id).await?)
        } else {
            None
        };
        ServiceUsageRequest {
            all_azs: body.az.clone(),
            project_metadata,
        }
    };

    debug!(project_id = %project_id, "Requesting usage report");
    let report = liquid
        .report_usage(&project_id, &request)
        .await
        .with_context(|| format!("Failed to get usage report for project {project_id}"))?;
    print_json(out, &report)
}

pub async fn set_quota(
    liquid: &dyn LiquidApi,
    identity: &dyn IdentityApi,
    service_type: &str,
    project_id_arg: Option<&str>,
    values: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let project_id = project_id(identity, project_id_arg)?;
    let info = liquid
        .service_info()
        .await
        .context("Failed to get service info")?;

    let catalog = LiquidCatalog::new(service_type, &info);
    let quotas = QuotaRequest::parse(values, &catalog).context("Invalid quota values")?;
    let mut request = quotas.to_liquid_request();
    if info.quota_update_needs_project_metadata {
        request.project_metadata = Some(project_metadata(identity, &project_id).await?);
    }

    liquid
        .set_quota(&project_id, &request)
        .await
        .with_context(|| format!("Failed to set quotas for project {project_id}"))?;

    writeln!(
        out,
        "Successfully set {} quota(s) of project {project_id} on the {service_type} LIQUID",
        quotas.len()
    )?;
    Ok(())
}
