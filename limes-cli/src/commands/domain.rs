//! Domain commands

use anyhow::{Context, Result};
use limes_client::{IdentityApi, LimesApi, ReportFilter};
use limes_render::{RenderOptions, render};
use std::io::Write;

use crate::lookup::resolve_domain;

pub async fn list(
    limes: &dyn LimesApi,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let reports = limes
        .domain_reports(filter)
        .await
        .context("Failed to list domain reports")?;
    render(out, reports.as_slice(), options)?;
    Ok(())
}

pub async fn show(
    limes: &dyn LimesApi,
    identity: &dyn IdentityApi,
    domain: Option<&str>,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let domain = resolve_domain(identity, domain).await?;
    tracing::info!(domain_id = %domain.id, "Showing domain");

    let report = limes
        .domain_report(&domain.id, filter)
        .await
        .with_context(|| format!("Failed to get report for domain {domain}"))?;
    render(out, &report, options)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use limes_client::MockBackend;
    use limes_core::reports::{DomainResourceReport, DomainServiceReport};
    use limes_core::{Domain, DomainReport, Unit};
    use limes_render::{OutputFormat, UnitMode};

    async fn backend() -> MockBackend {
        let backend = MockBackend::new();
        backend
            .add_domain(Domain {
                id: "d1".to_string(),
                name: "acme".to_string(),
                enabled: true,
            })
            .await;
        backend
            .add_domain_report(DomainReport {
                id: "d1".to_string(),
                name: "acme".to_string(),
                services: vec![DomainServiceReport {
                    service_type: "object-store".to_string(),
                    area: "storage".to_string(),
                    resources: vec![DomainResourceReport {
                        name: "capacity".to_string(),
                        unit: Unit::Bytes,
                        quota: Some(2 << 40),
                        projects_quota: Some(1 << 40),
                        usage: 1 << 30,
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
            })
            .await;
        backend
    }

    #[tokio::test]
    async fn show_by_name_humanized() {
        let backend = backend().await;
        let options = RenderOptions {
            format: OutputFormat::Csv,
            long: false,
            unit_mode: UnitMode::Humanize,
        };
        let mut out = Vec::new();
        show(&backend, &backend, Some("acme"), &ReportFilter::default(), &options, &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("d1,acme,storage,object-store,,capacity,2,1,0,TiB"));
    }

    #[tokio::test]
    async fn show_unknown_domain() {
        let backend = backend().await;
        let err = show(
            &backend,
            &backend,
            Some("initech"),
            &ReportFilter::default(),
            &RenderOptions::default(),
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn list_as_json() {
        let backend = backend().await;
        let options = RenderOptions {
            format: OutputFormat::Json,
            ..Default::default()
        };
        let mut out = Vec::new();
        list(&backend, &ReportFilter::default(), &options, &mut out)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["services"][0]["resources"][0]["unit"], "B");
    }
}
