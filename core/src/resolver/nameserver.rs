use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, ensure};
use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::{LookupIpStrategy, NameServerConfig, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::xfer::Protocol;
use ipopt_common::domain::Domain;
use tokio::sync::OnceCell;

use super::Lookup;

const DNS_PORT: u16 = 53;

/// Queries one explicit name server, bypassing the platform resolver.
///
/// The server may be given by name; it is resolved once, on first use, and the
/// resulting resolver is kept for every later lookup.
pub struct NameServerLookup {
    label: String,
    endpoint: String,
    timeout: Duration,
    resolver: OnceCell<TokioResolver>,
}

impl NameServerLookup {
    /// Returns `None` for a blank server entry.
    pub fn new(server: &str, timeout: Duration) -> Option<Self> {
        let label = server.trim();
        let endpoint = normalize_server(label)?;
        Some(Self {
            label: label.to_string(),
            endpoint,
            timeout,
            resolver: OnceCell::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn resolver(&self) -> anyhow::Result<&TokioResolver> {
        self.resolver
            .get_or_try_init(|| async {
                let addrs: Vec<SocketAddr> = tokio::time::timeout(
                    self.timeout,
                    tokio::net::lookup_host(self.endpoint.as_str()),
                )
                .await
                .with_context(|| format!("locating name server {} timed out", self.endpoint))?
                .with_context(|| format!("locating name server {}", self.endpoint))?
                .collect();
                ensure!(!addrs.is_empty(), "name server {} has no address", self.endpoint);

                Ok::<_, anyhow::Error>(build_resolver(&addrs, self.timeout))
            })
            .await
    }
}

#[async_trait]
impl Lookup for NameServerLookup {
    fn source(&self) -> &str {
        &self.label
    }

    async fn lookup(&self, domain: &Domain) -> anyhow::Result<Vec<IpAddr>> {
        let resolver = self.resolver().await?;
        let fqdn = format!("{domain}.");

        let answer = tokio::time::timeout(self.timeout, resolver.lookup_ip(fqdn))
            .await
            .with_context(|| format!("{} did not answer for {domain}", self.endpoint))?
            .with_context(|| format!("{} failed to resolve {domain}", self.endpoint))?;

        Ok(answer.iter().collect())
    }
}

fn build_resolver(addrs: &[SocketAddr], timeout: Duration) -> TokioResolver {
    let mut config = ResolverConfig::new();
    for addr in addrs {
        config.add_name_server(NameServerConfig::new(*addr, Protocol::Udp));
        config.add_name_server(NameServerConfig::new(*addr, Protocol::Tcp));
    }

    let mut builder = TokioResolver::builder_with_config(config, TokioConnectionProvider::default());
    let opts = builder.options_mut();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
    builder.build()
}

/// Turns a user-supplied server into a `host:port` endpoint.
///
/// - `host:port` and `[v6]:port` are kept as they are
/// - a bare IP literal gets port 53 (bracketed when it is IPv6)
/// - anything else is taken as a host name and gets port 53
///
/// Returns `None` for blank input.
pub fn normalize_server(server: &str) -> Option<String> {
    let server = server.trim();
    if server.is_empty() {
        return None;
    }

    if server.parse::<SocketAddr>().is_ok() {
        return Some(server.to_string());
    }
    if let Ok(ip) = server.parse::<IpAddr>() {
        return Some(SocketAddr::new(ip, DNS_PORT).to_string());
    }
    if let Some((host, port)) = server.rsplit_once(':')
        && !host.is_empty()
        && !host.contains(':')
        && port.parse::<u16>().is_ok()
    {
        return Some(server.to_string());
    }

    Some(format!("{server}:{DNS_PORT}"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
