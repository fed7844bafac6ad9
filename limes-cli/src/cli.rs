//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use limes_client::{AuthOptions, Interface, ReportFilter};
use limes_core::Unit;
use limes_render::{OutputFormat, RenderOptions, UnitMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "limesctl")]
#[command(about = "Command-line client for Limes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Print debug logs
    #[arg(long, global = true)]
    pub debug: bool,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, global = true, env = "LIMESCTL_TIMEOUT", default_value_t = 60)]
    pub timeout: u64,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// OpenStack credentials, following the `OS_*` conventions
#[derive(Args, Clone, Default)]
pub struct AuthArgs {
    /// Keystone URL
    #[arg(long, global = true, env = "OS_AUTH_URL", hide_env_values = true)]
    pub os_auth_url: Option<String>,

    /// User name
    #[arg(long, global = true, env = "OS_USERNAME", hide_env_values = true)]
    pub os_username: Option<String>,

    /// User ID
    #[arg(long, global = true, env = "OS_USER_ID", hide_env_values = true)]
    pub os_user_id: Option<String>,

    /// User password
    #[arg(long, global = true, env = "OS_PASSWORD", hide_env_values = true)]
    pub os_password: Option<String>,

    /// Domain name of the user
    #[arg(long, global = true, env = "OS_USER_DOMAIN_NAME", hide_env_values = true)]
    pub os_user_domain_name: Option<String>,

    /// Domain ID of the user
    #[arg(long, global = true, env = "OS_USER_DOMAIN_ID", hide_env_values = true)]
    pub os_user_domain_id: Option<String>,

    /// Project name to scope to
    #[arg(long, global = true, env = "OS_PROJECT_NAME", hide_env_values = true)]
    pub os_project_name: Option<String>,

    /// Project ID to scope to
    #[arg(long, global = true, env = "OS_PROJECT_ID", hide_env_values = true)]
    pub os_project_id: Option<String>,

    /// Domain name of the project
    #[arg(long, global = true, env = "OS_PROJECT_DOMAIN_NAME", hide_env_values = true)]
    pub os_project_domain_name: Option<String>,

    /// Domain ID of the project
    #[arg(long, global = true, env = "OS_PROJECT_DOMAIN_ID", hide_env_values = true)]
    pub os_project_domain_id: Option<String>,

    /// Domain name to scope to
    #[arg(long, global = true, env = "OS_DOMAIN_NAME", hide_env_values = true)]
    pub os_domain_name: Option<String>,

    /// Domain ID to scope to
    #[arg(long, global = true, env = "OS_DOMAIN_ID", hide_env_values = true)]
    pub os_domain_id: Option<String>,

    /// Application credential ID
    #[arg(long, global = true, env = "OS_APPLICATION_CREDENTIAL_ID", hide_env_values = true)]
    pub os_application_credential_id: Option<String>,

    /// Application credential name
    #[arg(long, global = true, env = "OS_APPLICATION_CREDENTIAL_NAME", hide_env_values = true)]
    pub os_application_credential_name: Option<String>,

    /// Application credential secret
    #[arg(long, global = true, env = "OS_APPLICATION_CREDENTIAL_SECRET", hide_env_values = true)]
    pub os_application_credential_secret: Option<String>,

    /// Existing Keystone token
    #[arg(long, global = true, env = "OS_TOKEN", hide_env_values = true)]
    pub os_token: Option<String>,

    /// Region to pick endpoints from
    #[arg(long, global = true, env = "OS_REGION_NAME", hide_env_values = true)]
    pub os_region_name: Option<String>,

    /// Endpoint interface (public, internal or admin)
    #[arg(long, global = true, env = "OS_INTERFACE", default_value = "public")]
    pub os_interface: Interface,

    /// CA bundle to verify TLS certificates with
    #[arg(long, global = true, env = "OS_CACERT")]
    pub os_cacert: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, global = true, env = "OS_INSECURE")]
    pub os_insecure: bool,
}

impl AuthArgs {
    pub fn to_options(&self) -> AuthOptions {
        AuthOptions {
            auth_url: self.os_auth_url.clone().unwrap_or_default(),
            username: self.os_username.clone(),
            user_id: self.os_user_id.clone(),
            password: self.os_password.clone(),
            user_domain_name: self.os_user_domain_name.clone(),
            user_domain_id: self.os_user_domain_id.clone(),
            project_name: self.os_project_name.clone(),
            project_id: self.os_project_id.clone(),
            project_domain_name: self.os_project_domain_name.clone(),
            project_domain_id: self.os_project_domain_id.clone(),
            domain_name: self.os_domain_name.clone(),
            domain_id: self.os_domain_id.clone(),
            application_credential_id: self.os_application_credential_id.clone(),
            application_credential_name: self.os_application_credential_name.clone(),
            application_credential_secret: self.os_application_credential_secret.clone(),
            token: self.os_token.clone(),
            region_name: self.os_region_name.clone(),
            interface: self.os_interface,
            cacert: self.os_cacert.clone(),
            insecure: self.os_insecure,
        }
    }
}

/// Report filters for resource reports
#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Only show these areas
    #[arg(long, value_delimiter = ',')]
    pub areas: Vec<String>,

    /// Only show these services
    #[arg(long, value_delimiter = ',')]
    pub services: Vec<String>,

    /// Only show these resources
    #[arg(long, value_delimiter = ',')]
    pub resources: Vec<String>,

    /// Include subresources or subcapacities (JSON output only)
    #[arg(long)]
    pub detail: bool,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ReportFilter {
        ReportFilter {
            areas: self.areas.clone(),
            services: self.services.clone(),
            resources: self.resources.clone(),
            detail: self.detail,
        }
    }
}

/// Report filters for rate reports
#[derive(Args, Clone, Default)]
pub struct RateFilterArgs {
    /// Only show these areas
    #[arg(long, value_delimiter = ',')]
    pub areas: Vec<String>,

    /// Only show these services
    #[arg(long, value_delimiter = ',')]
    pub services: Vec<String>,
}

impl RateFilterArgs {
    pub fn to_filter(&self) -> ReportFilter {
        ReportFilter {
            areas: self.areas.clone(),
            services: self.services.clone(),
            ..ReportFilter::default()
        }
    }
}

fn measured_unit(s: &str) -> Result<Unit, String> {
    let unit: Unit = s.parse().map_err(|e: limes_core::Error| e.to_string())?;
    if unit.is_measured() {
        Ok(unit)
    } else {
        Err("expected one of B, KiB, MiB, GiB, TiB, PiB, EiB".to_string())
    }
}

/// How to print reports
#[derive(Args, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Show extra columns
    #[arg(short, long)]
    pub long: bool,

    /// Show measured values in the largest fitting unit
    #[arg(long, conflicts_with = "unit")]
    pub humanize: bool,

    /// Show measured values in this unit
    #[arg(long, value_parser = measured_unit)]
    pub unit: Option<Unit>,
}

impl OutputArgs {
    pub const fn to_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.format,
            long: self.long,
            unit_mode: UnitMode::from_flags(self.humanize, self.unit),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show cluster data
    #[command(subcommand)]
    Cluster(ClusterCommand),

    /// Show domain data
    #[command(subcommand)]
    Domain(DomainCommand),

    /// Show and change project data
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Talk to a LIQUID directly
    #[command(subcommand)]
    Liquid(LiquidCommand),

    /// Print version information
    Version,
}

#[derive(Subcommand)]
pub enum ClusterCommand {
    /// Show the resource report of the cluster
    Show {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the rate limits of the cluster
    ShowRates {
        #[command(flatten)]
        filter: RateFilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum DomainCommand {
    /// List all domains
    List {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show one domain (default: the token's domain)
    Show {
        /// Domain name or ID
        domain: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List the projects of a domain (default: the token's domain)
    List {
        /// Domain name or ID
        #[arg(short, long)]
        domain: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show one project (default: the token's project)
    Show {
        /// Project name or ID
        project: Option<String>,

        /// Domain name or ID of the project
        #[arg(short, long)]
        domain: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Ask Limes to scrape a project's usage now
    Sync {
        /// Project name or ID
        project: Option<String>,

        /// Domain name or ID of the project
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Change quotas of a project
    Set {
        /// Project name or ID
        project: Option<String>,

        /// Domain name or ID of the project
        #[arg(short, long)]
        domain: Option<String>,

        /// New quotas, e.g. compute/cores=20,compute/ram+=4GiB
        #[arg(short, long, value_delimiter = ',', required = true)]
        quotas: Vec<String>,
    },

    /// List the rate limits of all projects of a domain
    ListRates {
        /// Domain name or ID
        #[arg(short, long)]
        domain: Option<String>,

        #[command(flatten)]
        filter: RateFilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the rate limits of one project
    ShowRates {
        /// Project name or ID
        project: Option<String>,

        /// Domain name or ID of the project
        #[arg(short, long)]
        domain: Option<String>,

        #[command(flatten)]
        filter: RateFilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Arguments shared by all LIQUID commands
#[derive(Args, Clone)]
pub struct LiquidTarget {
    /// Limes service type of the LIQUID, e.g. compute
    pub service_type: String,

    /// LIQUID endpoint (default: `liquid-<service type>` from the catalog)
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Request body source for LIQUID reports
#[derive(Args, Clone, Default)]
pub struct LiquidBodyArgs {
    /// Read the request body from this JSON file
    #[arg(long, conflicts_with = "az")]
    pub body: Option<PathBuf>,

    /// Availability zones to report on
    #[arg(long, value_delimiter = ',')]
    pub az: Vec<String>,
}

#[derive(Subcommand)]
pub enum LiquidCommand {
    /// Print the LIQUID's service info
    ServiceInfo {
        #[command(flatten)]
        target: LiquidTarget,
    },

    /// Print the LIQUID's capacity report
    ReportCapacity {
        #[command(flatten)]
        target: LiquidTarget,

        #[command(flatten)]
        body: LiquidBodyArgs,
    },

    /// Print the LIQUID's usage report for a project
    ReportUsage {
        #[command(flatten)]
        target: LiquidTarget,

        /// Project ID (default: the token's project)
        #[arg(long)]
        project_id: Option<String>,

        #[command(flatten)]
        body: LiquidBodyArgs,
    },

    /// Set quotas of a project on the LIQUID, bypassing Limes
    SetQuota {
        #[command(flatten)]
        target: LiquidTarget,

        /// Project ID (default: the token's project)
        #[arg(long)]
        project_id: Option<String>,

        /// New quotas, e.g. cores=20,ram=4GiB
        #[arg(long, value_delimiter = ',', required = true)]
        quota_values: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_project_set() {
        let cli = Cli::try_parse_from([
            "limesctl",
            "project",
            "set",
            "web",
            "--domain",
            "acme",
            "-q",
            "compute/cores=20,compute/ram+=4GiB",
        ])
        .unwrap();
        let Commands::Project(ProjectCommand::Set {
            project,
            domain,
            quotas,
        }) = cli.command
        else {
            panic!("wrong command");
        };
        assert_eq!(project.as_deref(), Some("web"));
        assert_eq!(domain.as_deref(), Some("acme"));
        assert_eq!(quotas, vec!["compute/cores=20", "compute/ram+=4GiB"]);
    }

    #[test]
    fn humanize_conflicts_with_unit() {
        let result = Cli::try_parse_from([
            "limesctl", "cluster", "show", "--humanize", "--unit", "GiB",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unit_must_be_measured() {
        assert!(measured_unit("GiB").is_ok());
        assert!(measured_unit("").is_err());
        assert!(measured_unit("GB").is_err());
    }

    #[test]
    fn output_options() {
        let cli = Cli::try_parse_from([
            "limesctl", "cluster", "show", "-f", "csv", "-l", "--unit", "TiB", "--services",
            "compute,network",
        ])
        .unwrap();
        let Commands::Cluster(ClusterCommand::Show { filter, output }) = cli.command else {
            panic!("wrong command");
        };
        let options = output.to_options();
        assert_eq!(options.format, OutputFormat::Csv);
        assert!(options.long);
        assert_eq!(options.unit_mode, UnitMode::Fixed(Unit::Tebibytes));
        assert_eq!(filter.to_filter().services, vec!["compute", "network"]);
    }
}
