use std::net::IpAddr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use ipopt_common::domain::Domain;
use ipopt_common::model::SYSTEM_SOURCE;

use super::Lookup;

/// The platform's own resolver (getaddrinfo and friends), including the hosts file.
pub struct SystemLookup {
    timeout: Duration,
}

impl SystemLookup {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Lookup for SystemLookup {
    fn source(&self) -> &str {
        SYSTEM_SOURCE
    }

    async fn lookup(&self, domain: &Domain) -> anyhow::Result<Vec<IpAddr>> {
        let addrs = tokio::time::timeout(self.timeout, tokio::net::lookup_host((domain.as_str(), 0)))
            .await
            .with_context(|| format!("system lookup of {domain} timed out"))?
            .with_context(|| format!("system lookup of {domain} failed"))?;

        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
