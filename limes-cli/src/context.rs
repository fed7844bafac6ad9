//! Authenticated API clients for the command handlers

use anyhow::{Context, Result};
use limes_client::{HttpIdentity, HttpLimes, HttpLiquid, IdentityApi, LimesApi, LiquidApi, Session};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cli::AuthArgs;

/// A Keystone session plus the clients built on it
pub struct Clients {
    session: Arc<Session>,
}

impl Clients {
    /// Authenticate with the given credentials
    pub async fn connect(auth: &AuthArgs, timeout: Duration) -> Result<Self> {
        let options = auth.to_options();
        debug!(options = ?options, "Authenticating");

        let session = Session::authenticate(&options, timeout)
            .await
            .context("Failed to authenticate with Keystone")?;

        Ok(Self {
            session: Arc::new(session),
        })
    }

    /// Keystone client
    pub fn identity(&self) -> Arc<dyn IdentityApi> {
        Arc::new(HttpIdentity::new(Arc::clone(&self.session)))
    }

    /// Limes client
    pub fn limes(&self) -> Result<Arc<dyn LimesApi>> {
        let limes = HttpLimes::new(Arc::clone(&self.session))
            .context("Cannot find the Limes endpoint in the service catalog")?;
        Ok(Arc::new(limes))
    }

    /// Client for the LIQUID of a service type
    pub fn liquid(&self, service_type: &str, endpoint: Option<&str>) -> Result<Arc<dyn LiquidApi>> {
        let liquid = match endpoint {
            Some(endpoint) => HttpLiquid::with_endpoint(Arc::clone(&self.session), endpoint),
            None => HttpLiquid::new(Arc::clone(&self.session), service_type).with_context(|| {
                format!("Cannot find the LIQUID for {service_type:?} (use --endpoint to set it)")
            })?,
        };
        Ok(Arc::new(liquid))
    }
}
