//! Resolution of domain and project arguments
//!
//! A missing argument falls back to the token scope. A given argument is
//! tried as a Keystone ID first and as a name second.

use anyhow::{Context, Result, bail};
use limes_client::IdentityApi;
use limes_core::{Domain, Project};
use tracing::debug;

/// Result of a lookup by ID, with 403 treated like "not found"
///
/// Keystone refuses `GET /v3/domains/:id` and `GET /v3/projects/:id` for
/// objects outside the token's reach, even when the argument is a name.
fn by_id<T>(result: limes_client::Result<Option<T>>, kind: &str, arg: &str) -> Result<Option<T>> {
    match result {
        Ok(found) => Ok(found),
        Err(e) if e.status() == Some(403) => {
            debug!(kind, arg, "Lookup by ID not permitted, trying name");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to look up {kind} by ID")),
    }
}

/// Resolve the `[domain]` argument
pub async fn resolve_domain(identity: &dyn IdentityApi, arg: Option<&str>) -> Result<Domain> {
    let Some(arg) = arg else {
        let scope = identity.token_scope();
        let domain = scope.domain().context(
            "No domain given and the token is not scoped to a domain or project",
        )?;
        debug!(domain_id = %domain.id, "Using domain from token scope");
        return Ok(Domain::from(domain));
    };

    if let Some(domain) = by_id(identity.get_domain(arg).await, "domain", arg)? {
        return Ok(domain);
    }

    let mut found = identity
        .find_domains(arg)
        .await
        .context("Failed to look up domain by name")?;
    match found.len() {
        0 => bail!("Domain {arg:?} not found"),
        1 => Ok(found.remove(0)),
        n => bail!("Domain name {arg:?} is ambiguous ({n} matches), use the domain ID"),
    }
}

/// Resolve the `[project]` argument and `--domain` option
pub async fn resolve_project(
    identity: &dyn IdentityApi,
    arg: Option<&str>,
    domain_arg: Option<&str>,
) -> Result<Project> {
    let Some(arg) = arg else {
        if domain_arg.is_some() {
            bail!("--domain needs a project name or ID as well");
        }
        let scope = identity.token_scope();
        let project = scope
            .project
            .as_ref()
            .context("No project given and the token is not scoped to a project")?;
        debug!(project_id = %project.id, "Using project from token scope");
        return Ok(Project::from(project));
    };

    let domain = match domain_arg {
        Some(domain_arg) => Some(resolve_domain(identity, Some(domain_arg)).await?),
        None => None,
    };

    if let Some(project) = by_id(identity.get_project(arg).await, "project", arg)? {
        if let Some(domain) = &domain
            && project.domain_id != domain.id
        {
            bail!("Project {project} is not in domain {domain}");
        }
        return Ok(project);
    }

    let mut found = identity
        .find_projects(arg, domain.as_ref().map(|d| d.id.as_str()))
        .await
        .context("Failed to look up project by name")?;
    match (found.len(), &domain) {
        (0, Some(domain)) => bail!("Project {arg:?} not found in domain {domain}"),
        (0, None) => bail!("Project {arg:?} not found"),
        (1, _) => Ok(found.remove(0)),
        (n, _) => bail!(
            "Project name {arg:?} is ambiguous ({n} matches), use --domain to disambiguate"
        ),
    }
}
