use anyhow::Result;
use std::io::{self, Write};
use std::time::Duration;

use crate::cli::{AuthArgs, ClusterCommand, Commands, DomainCommand, LiquidCommand, ProjectCommand};
use crate::context::Clients;

pub mod cluster;
pub mod domain;
pub mod liquid;
pub mod project;

/// Dispatch command to appropriate handler
pub async fn dispatch(command: Commands, auth: &AuthArgs, timeout: Duration) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matches!(command, Commands::Version) {
        writeln!(out, "limesctl {}", env!("CARGO_PKG_VERSION"))?;
        return Ok(());
    }

    let clients = Clients::connect(auth, timeout).await?;

    match command {
        Commands::Cluster(command) => {
            let limes = clients.limes()?;
            match command {
                ClusterCommand::Show { filter, output } => {
                    cluster::show(&*limes, &filter.to_filter(), &output.to_options(), &mut out)
                        .await
                }
                ClusterCommand::ShowRates { filter, output } => {
                    cluster::show_rates(&*limes, &filter.to_filter(), &output.to_options(), &mut out)
                        .await
                }
            }
        }

        Commands::Domain(command) => {
            let limes = clients.limes()?;
            match command {
                DomainCommand::List { filter, output } => {
                    domain::list(&*limes, &filter.to_filter(), &output.to_options(), &mut out).await
                }
                DomainCommand::Show {
                    domain,
                    filter,
                    output,
                } => {
                    domain::show(
                        &*limes,
                        &*clients.identity(),
                        domain.as_deref(),
                        &filter.to_filter(),
                        &output.to_options(),
                        &mut out,
                    )
                    .await
                }
            }
        }

        Commands::Project(command) => {
            let limes = clients.limes()?;
            let identity = clients.identity();
            dispatch_project(command, &*limes, &*identity, &mut out).await
        }

        Commands::Liquid(command) => {
            let identity = clients.identity();
            match command {
                LiquidCommand::ServiceInfo { target } => {
                    let liquid = clients.liquid(&target.service_type, target.endpoint.as_deref())?;
                    liquid::service_info(&*liquid, &mut out).await
                }
                LiquidCommand::ReportCapacity { target, body } => {
                    let liquid = clients.liquid(&target.service_type, target.endpoint.as_deref())?;
                    liquid::report_capacity(&*liquid, &body, &mut out).await
                }
                LiquidCommand::ReportUsage {
                    target,
                    project_id,
                    body,
                } => {
                    let liquid = clients.liquid(&target.service_type, target.endpoint.as_deref())?;
                    liquid::report_usage(&*liquid, &*identity, project_id.as_deref(), &body, &mut out)
                        .await
                }
                LiquidCommand::SetQuota {
                    target,
                    project_id,
                    quota_values,
                } => {
                    let liquid = clients.liquid(&target.service_type, target.endpoint.as_deref())?;
                    liquid::set_quota(
                        &*liquid,
                        &*identity,
                        &target.service_type,
                        project_id.as_deref(),
                        &quota_values,
                        &mut out,
                    )
                    .await
                }
            }
        }

        Commands::Version => Ok(()),
    }
}

async fn dispatch_project(
    command: ProjectCommand,
    limes: &dyn limes_client::LimesApi,
    identity: &dyn limes_client::IdentityApi,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ProjectCommand::List {
            domain,
            filter,
            output,
        } => {
            project::list(
                limes,
                identity,
                domain.as_deref(),
                &filter.to_filter(),
                &output.to_options(),
                out,
            )
            .await
        }
        ProjectCommand::Show {
            project,
            domain,
            filter,
            output,
        } => {
            project::show(
                limes,
                identity,
                project.as_deref(),
                domain.as_deref(),
                &filter.to_filter(),
                &output.to_options(),
                out,
            )
            .await
        }
        ProjectCommand::Sync { project, domain } => {
            project::sync(limes, identity, project.as_deref(), domain.as_deref(), out).await
        }
        ProjectCommand::Set {
            project,
            domain,
            quotas,
        } => {
            project::set(
                limes,
                identity,
                project.as_deref(),
                domain.as_deref(),
                &quotas,
                out,
            )
            .await
        }
        ProjectCommand::ListRates {
            domain,
            filter,
            output,
        } => {
            project::list_rates(
                limes,
                identity,
                domain.as_deref(),
                &filter.to_filter(),
                &output.to_options(),
                out,
            )
            .await
        }
        ProjectCommand::ShowRates {
            project,
            domain,
            filter,
            output,
        } => {
            project::show_rates(
                limes,
                identity,
                project.as_deref(),
                domain.as_deref(),
                &filter.to_filter(),
                &output.to_options(),
                out,
            )
            .await
        }
    }
}
