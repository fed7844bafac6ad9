//! Cluster commands

use anyhow::{Context, Result};
use limes_client::{LimesApi, ReportFilter};
use limes_render::{RenderOptions, render};
use std::io::Write;

pub async fn show(
    limes: &dyn LimesApi,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let report = limes
        .cluster_report(filter)
        .await
        .context("Failed to get cluster report")?;
    render(out, &report, options)?;
    Ok(())
}

pub async fn show_rates(
    limes: &dyn LimesApi,
    filter: &ReportFilter,
    options: &RenderOptions,
    out: &mut impl Write,
) -> Result<()> {
    let report = limes
        .cluster_rates(filter)
        .await
        .context("Failed to get cluster rates")?;
    render(out, &report, options)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use limes_client::MockBackend;
    use limes_core::ClusterReport;
    use limes_core::reports::{ClusterResourceReport, ClusterServiceReport};
    use limes_render::OutputFormat;

    #[tokio::test]
    async fn show_filters_and_renders() {
        let backend = MockBackend::new();
        backend
            .set_cluster_report(ClusterReport {
                id: "current".to_string(),
                services: vec![
                    ClusterServiceReport {
                        service_type: "compute".to_string(),
                        area: "compute".to_string(),
                        resources: vec![ClusterResourceReport {
                            name: "cores".to_string(),
                            capacity: Some(100),
                            usage: 7,
                            ..Default::default()
                        }],
                        ..Default::default()
                    },
                    ClusterServiceReport {
                        service_type: "network".to_string(),
                        area: "network".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            })
            .await;

        let filter = ReportFilter {
            services: vec!["compute".to_string()],
            ..Default::default()
        };
        let options = RenderOptions {
            format: OutputFormat::Csv,
            ..Default::default()
        };
        let mut out = Vec::new();
        show(&backend, &filter, &options, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("current,compute,compute,,cores,100,,7,"));
    }
}
