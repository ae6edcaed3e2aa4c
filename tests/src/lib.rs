//! Fixtures shared by the integration tests: loopback listeners and a lookup table
//! standing in for DNS.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use async_trait::async_trait;
use ipopt_common::domain::Domain;
use ipopt_core::resolver::Lookup;
use tokio::net::TcpListener;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Binds an ephemeral loopback port that accepts and immediately drops every connection.
pub async fn accepting_listener() -> u16 {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    port
}

/// A loopback port nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Answers from a fixed table; names missing from it fail the lookup.
pub struct StaticLookup {
    label: String,
    table: HashMap<String, Vec<IpAddr>>,
}

impl StaticLookup {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            table: HashMap::new(),
        }
    }

    pub fn with(mut self, domain: &str, addrs: &[IpAddr]) -> Self {
        self.table.insert(domain.to_string(), addrs.to_vec());
        self
    }

    pub fn shared(self) -> Arc<dyn Lookup> {
        Arc::new(self)
    }
}

#[async_trait]
impl Lookup for StaticLookup {
    fn source(&self) -> &str {
        &self.label
    }

    async fn lookup(&self, domain: &Domain) -> anyhow::Result<Vec<IpAddr>> {
        self.table
            .get(domain.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{} has no record for {domain}", self.label))
    }
}
