//! Bounded-concurrency driver for a whole run.
//!
//! `concurrency` workers pull domains from one shared queue and push each through
//! resolve → probe (candidates one after another) → rank. Everything the run produces is
//! reported as [`EngineEvent`]s on a single channel:
//!
//! - `Result` is delivered with backpressure, exactly once per submitted domain
//! - `Progress` follows its result and is dropped if the channel is full
//! - `Log` is dropped if the channel is full
//! - `Finished` is sent once, after every worker has drained

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ipopt_common::config::{ConfigError, ProbeConfig};
use ipopt_common::domain::Domain;
use ipopt_common::model::{DomainFailure, DomainResult, ProbeStatistic};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::prober::{self, Connector, ProbePlan, TcpConnector};
use crate::ranking;
use crate::resolver::CandidateResolver;

pub const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    Log(String),
    Result(DomainResult),
    Progress { done: usize, total: usize },
    Finished(RunOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no domains to probe")]
    EmptyDomainList,
    #[error("run cancelled")]
    Cancelled,
}

impl EngineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub fn event_channel() -> (mpsc::Sender<EngineEvent>, mpsc::Receiver<EngineEvent>) {
    mpsc::channel(EVENT_CAPACITY)
}

pub struct Scheduler {
    cfg: ProbeConfig,
    resolver: Arc<CandidateResolver>,
    connector: Arc<dyn Connector>,
}

impl Scheduler {
    /// Builds a scheduler that resolves through the system resolver and `cfg.dns_servers`.
    pub fn new(cfg: ProbeConfig) -> Result<Self, ConfigError> {
        let resolver = Arc::new(CandidateResolver::from_config(&cfg));
        Self::with_resolver(cfg, resolver)
    }

    pub fn with_resolver(cfg: ProbeConfig, resolver: Arc<CandidateResolver>) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            resolver,
            connector: Arc::new(TcpConnector),
        })
    }

    /// Replaces the TCP handshake used for every candidate.
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.cfg
    }

    /// Processes `domains` and reports on `events` until every domain has a result.
    ///
    /// Configuration problems and an empty list are rejected before any event is sent.
    /// Returns [`EngineError::Cancelled`] when at least one domain was cut short by `cancel`;
    /// the results for every domain have still been delivered by then. A cancellation that
    /// arrives after the last domain finished leaves the run completed.
    pub async fn run(
        &self,
        domains: Vec<Domain>,
        cancel: CancellationToken,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<(), EngineError> {
        self.cfg.validate()?;
        if domains.is_empty() {
            return Err(EngineError::EmptyDomainList);
        }

        let total = domains.len();
        let workers = self.cfg.concurrency.min(total);
        info!(
            total,
            workers,
            port = self.cfg.port,
            attempts = self.cfg.attempts,
            "starting probe run"
        );
        let _ = events.try_send(EngineEvent::Progress { done: 0, total });

        let shared = Arc::new(Shared {
            queue: domains.into(),
            next: AtomicUsize::new(0),
            done: Mutex::new(0),
            resolver: Arc::clone(&self.resolver),
            connector: Arc::clone(&self.connector),
            plan: ProbePlan::from(&self.cfg),
            cancel,
            events: events.clone(),
            interrupted: AtomicBool::new(false),
        });

        let mut set: JoinSet<()> = JoinSet::new();
        for worker in 0..workers {
            let shared = Arc::clone(&shared);
            set.spawn(async move { shared.work(worker).await });
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                error!("probe worker stopped unexpectedly: {e}");
            }
        }

        let outcome = if shared.interrupted.load(Ordering::Relaxed) {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Completed
        };
        info!(?outcome, total, "probe run finished");
        let _ = events.send(EngineEvent::Finished(outcome)).await;

        match outcome {
            RunOutcome::Completed => Ok(()),
            RunOutcome::Cancelled => Err(EngineError::Cancelled),
        }
    }
}

struct Shared {
    queue: Arc<[Domain]>,
    next: AtomicUsize,
    done: Mutex<usize>,
    resolver: Arc<CandidateResolver>,
    connector: Arc<dyn Connector>,
    plan: ProbePlan,
    cancel: CancellationToken,
    events: mpsc::Sender<EngineEvent>,
    /// Set once any domain ends with a cancellation result.
    interrupted: AtomicBool,
}

impl Shared {
    async fn work(&self, worker: usize) {
        loop {
            let index = self.next.fetch_add(1, Ordering::Relaxed);
            let Some(domain) = self.queue.get(index) else {
                break;
            };

            debug!(worker, %domain, "picked up domain");
            let result = self.process(domain).await;
            if result.is_cancelled() {
                self.interrupted.store(true, Ordering::Relaxed);
            }
            self.deliver(result).await;
        }
    }

    async fn process(&self, domain: &Domain) -> DomainResult {
        if self.cancel.is_cancelled() {
            return DomainResult::failed(domain.clone(), DomainFailure::Cancelled);
        }

        let resolved = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DomainFailure::Cancelled),
            res = self.resolver.resolve(domain) => res,
        };
        let candidates = match resolved {
            Ok(candidates) => candidates,
            Err(failure) => {
                self.log(format!("{domain}: {failure}"));
                return DomainResult::failed(domain.clone(), failure);
            }
        };

        let mut stats: Vec<ProbeStatistic> = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            if self.cancel.is_cancelled() {
                break;
            }
            let stat = prober::probe_with(self.connector.as_ref(), candidate, &self.plan, &self.cancel).await;
            self.log(describe(domain, &stat));
            stats.push(stat);
        }

        let ranked = ranking::rank(stats);
        if self.cancel.is_cancelled() {
            return DomainResult {
                domain: domain.clone(),
                best: None,
                ranked,
                error: Some(DomainFailure::Cancelled),
            };
        }

        DomainResult {
            domain: domain.clone(),
            best: ranked.first().cloned(),
            ranked,
            error: None,
        }
    }

    /// Sends the result and its progress tick while holding the counter, so ticks stay
    /// in order and never run ahead of the result they count.
    async fn deliver(&self, result: DomainResult) {
        let mut done = self.done.lock().await;
        if self.events.send(EngineEvent::Result(result)).await.is_err() {
            debug!("event receiver dropped; result discarded");
        }
        *done += 1;
        let _ = self.events.try_send(EngineEvent::Progress {
            done: *done,
            total: self.queue.len(),
        });
    }

    fn log(&self, line: String) {
        debug!("{line}");
        let _ = self.events.try_send(EngineEvent::Log(line));
    }
}

fn describe(domain: &Domain, stat: &ProbeStatistic) -> String {
    format!(
        "{domain} -> {} (success {:.0}%, p95 {}ms)",
        stat.address,
        stat.success_rate() * 100.0,
        stat.p95.as_millis()
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
