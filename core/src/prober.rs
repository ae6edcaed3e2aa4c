//! Repeated TCP handshakes against one candidate, reduced into a [`ProbeStatistic`].

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use ipopt_common::config::ProbeConfig;
use ipopt_common::model::{Candidate, DomainFailure, ProbeStatistic};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::network::tcp::{self, HandshakeError};
use crate::stats;

/// One handshake against a target, returning its round-trip time.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, target: SocketAddr, timeout: Duration) -> Result<Duration, HandshakeError>;
}

/// Plain TCP handshakes.
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, target: SocketAddr, timeout: Duration) -> Result<Duration, HandshakeError> {
        tcp::handshake(target, timeout).await
    }
}

/// The per-candidate part of a [`ProbeConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ProbePlan {
    pub port: u16,
    pub timeout: Duration,
    pub attempts: u32,
}

impl From<&ProbeConfig> for ProbePlan {
    fn from(cfg: &ProbeConfig) -> Self {
        Self {
            port: cfg.port,
            timeout: cfg.timeout,
            attempts: cfg.attempts,
        }
    }
}

/// Runs up to `plan.attempts` sequential handshakes against `candidate`.
///
/// Cancellation is checked before every attempt and also interrupts a handshake in progress.
/// An interrupted or skipped attempt is not counted at all, so `successes + failures`
/// only covers the attempts that ran to completion.
pub async fn probe_candidate(
    candidate: &Candidate,
    plan: &ProbePlan,
    cancel: &CancellationToken,
) -> ProbeStatistic {
    probe_with(&TcpConnector, candidate, plan, cancel).await
}

/// [`probe_candidate`] over any [`Connector`].
pub async fn probe_with(
    connector: &dyn Connector,
    candidate: &Candidate,
    plan: &ProbePlan,
    cancel: &CancellationToken,
) -> ProbeStatistic {
    let mut stat = ProbeStatistic::new(candidate);
    let target = SocketAddr::new(candidate.address, plan.port);

    for attempt in 0..plan.attempts {
        if cancel.is_cancelled() {
            stat.last_error = Some(DomainFailure::Cancelled.to_string());
            break;
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            res = connector.connect(target, plan.timeout) => Some(res),
        };

        match outcome {
            None => {
                stat.last_error = Some(DomainFailure::Cancelled.to_string());
                break;
            }
            Some(Ok(rtt)) => {
                trace!(%target, attempt, ?rtt, "handshake completed");
                stat.successes += 1;
                stat.samples.push(rtt);
            }
            Some(Err(e)) => {
                trace!(%target, attempt, error = %e, "handshake failed");
                stat.failures += 1;
                stat.last_error = Some(e.to_string());
            }
        }
    }

    stats::summarize(&mut stat, plan.timeout);
    stat
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
