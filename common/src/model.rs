//! Values produced by a probing run.

use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::Domain;

/// Source label for addresses returned by the platform resolver.
pub const SYSTEM_SOURCE: &str = "system";

/// One resolved address of a domain, tagged with the source that produced it first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub address: IpAddr,
    pub source: String,
}

impl Candidate {
    pub fn new(address: IpAddr, source: impl Into<String>) -> Self {
        Self {
            address,
            source: source.into(),
        }
    }
}

/// Outcome of probing one candidate.
///
/// `successes + failures` is the number of handshakes actually attempted; a cancelled
/// probe leaves the remaining budget untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeStatistic {
    pub address: IpAddr,
    pub source: String,
    pub successes: u32,
    pub failures: u32,
    /// Round-trip times of the successful handshakes, in the order they were taken.
    pub samples: Vec<Duration>,
    pub p50: Duration,
    pub p95: Duration,
    /// Population standard deviation of `samples`.
    pub jitter: Duration,
    pub last_error: Option<String>,
}

impl ProbeStatistic {
    pub fn new(candidate: &Candidate) -> Self {
        Self {
            address: candidate.address,
            source: candidate.source.clone(),
            successes: 0,
            failures: 0,
            samples: Vec::new(),
            p50: Duration::ZERO,
            p95: Duration::ZERO,
            jitter: Duration::ZERO,
            last_error: None,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.successes + self.failures
    }

    pub fn success_rate(&self) -> f64 {
        match self.attempts() {
            0 => 0.0,
            attempts => f64::from(self.successes) / f64::from(attempts),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.successes > 0
    }
}

/// Why a domain produced no usable ranking.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainFailure {
    /// Every lookup source failed.
    #[error("resolution failed: {0}")]
    Resolution(String),
    /// Lookups answered, but no address of a selected family came back.
    #[error("no candidate ip")]
    NoCandidates,
    #[error("cancelled")]
    Cancelled,
}

impl DomainFailure {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// The single result emitted for every submitted domain.
#[derive(Debug, Clone)]
pub struct DomainResult {
    pub domain: Domain,
    pub best: Option<ProbeStatistic>,
    /// All probed candidates, best first.
    pub ranked: Vec<ProbeStatistic>,
    pub error: Option<DomainFailure>,
}

impl DomainResult {
    pub fn failed(domain: Domain, failure: DomainFailure) -> Self {
        Self {
            domain,
            best: None,
            ranked: Vec::new(),
            error: Some(failure),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.best.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.error.as_ref().is_some_and(DomainFailure::is_cancelled)
    }
}

/// An address/name pair chosen for the hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub address: String,
    pub domain: String,
}

impl Mapping {
    pub fn new(address: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            domain: domain.into(),
        }
    }
}

/// Which finished domains are turned into mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every domain that finished without error.
    Resolved,
    /// Like `Resolved`, but the best address must have answered at least once.
    #[default]
    Reachable,
}

/// Builds mappings from finished results, in result order.
pub fn select_mappings(results: &[DomainResult], selection: Selection) -> Vec<Mapping> {
    results
        .iter()
        .filter(|result| result.error.is_none())
        .filter_map(|result| {
            let best = result.best.as_ref()?;
            if selection == Selection::Reachable && !best.is_reachable() {
                return None;
            }
            Some(Mapping::new(best.address.to_string(), result.domain.as_str()))
        })
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
