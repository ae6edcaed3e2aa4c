//! Candidate discovery.
//!
//! A domain is looked up through every configured [`Lookup`] source: the platform resolver
//! first, then each explicit name server in the order given. The answers are folded into
//! one set keyed by address, where the first source to report an address keeps it.
//! A failing source only shrinks the union; resolution as a whole fails only when no
//! address of a selected family was found anywhere.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use ipopt_common::config::{AddressFamilies, ProbeConfig};
use ipopt_common::domain::Domain;
use ipopt_common::model::{Candidate, DomainFailure};
use tracing::debug;

mod nameserver;
mod system;

pub use nameserver::{NameServerLookup, normalize_server};
pub use system::SystemLookup;

/// One place addresses can come from.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Label attached to the candidates this source contributes.
    fn source(&self) -> &str;

    async fn lookup(&self, domain: &Domain) -> anyhow::Result<Vec<IpAddr>>;
}

pub struct CandidateResolver {
    sources: Vec<Arc<dyn Lookup>>,
    families: AddressFamilies,
}

impl CandidateResolver {
    pub fn new(sources: Vec<Arc<dyn Lookup>>, families: AddressFamilies) -> Self {
        Self { sources, families }
    }

    /// The platform resolver followed by every non-blank server of `cfg.dns_servers`.
    pub fn from_config(cfg: &ProbeConfig) -> Self {
        let mut sources: Vec<Arc<dyn Lookup>> = vec![Arc::new(SystemLookup::new(cfg.system_timeout))];
        sources.extend(
            cfg.dns_servers
                .iter()
                .filter_map(|server| NameServerLookup::new(server, cfg.dns_timeout))
                .map(|lookup| Arc::new(lookup) as Arc<dyn Lookup>),
        );
        Self::new(sources, cfg.families)
    }

    pub fn source_labels(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|source| source.source())
    }

    /// Looks `domain` up in every source and returns its candidates ordered by address.
    ///
    /// All sources are queried concurrently; their answers are still folded in source order,
    /// so which source "wins" an address does not depend on timing.
    pub async fn resolve(&self, domain: &Domain) -> Result<Vec<Candidate>, DomainFailure> {
        let pending: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let domain = domain.clone();
                tokio::spawn(async move { source.lookup(&domain).await })
            })
            .collect();

        let mut seen: BTreeMap<IpAddr, &str> = BTreeMap::new();
        let mut failed: usize = 0;

        for (source, handle) in self.sources.iter().zip(pending) {
            let answer = match handle.await {
                Ok(answer) => answer,
                Err(join_err) => Err(anyhow::anyhow!("lookup task failed: {join_err}")),
            };

            match answer {
                Ok(addrs) => {
                    let kept = filter_families(&addrs, self.families);
                    debug!(%domain, source = source.source(), found = addrs.len(), kept = kept.len(), "lookup answered");
                    for addr in kept {
                        seen.entry(addr).or_insert(source.source());
                    }
                }
                Err(e) => {
                    failed += 1;
                    debug!(%domain, source = source.source(), error = %e, "lookup failed");
                }
            }
        }

        if seen.is_empty() {
            if failed > 0 && failed == self.sources.len() {
                return Err(DomainFailure::Resolution(format!(
                    "all {failed} lookup sources failed"
                )));
            }
            return Err(DomainFailure::NoCandidates);
        }

        Ok(seen
            .into_iter()
            .map(|(address, source)| Candidate::new(address, source))
            .collect())
    }
}

/// Keeps the addresses of the selected families, dropping unspecified ones.
///
/// IPv4-mapped IPv6 answers are treated as the IPv4 address they carry.
pub fn filter_families(addrs: &[IpAddr], families: AddressFamilies) -> Vec<IpAddr> {
    addrs
        .iter()
        .map(IpAddr::to_canonical)
        .filter(|addr| !addr.is_unspecified() && families.allows(addr))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
