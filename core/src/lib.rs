//! # ipopt engine
//!
//! Finds the best performing address of each domain and pins the winners in a hosts file.
//!
//! * [`resolver`]: gathers candidate addresses from the platform resolver and explicit name servers.
//! * [`prober`]: times repeated TCP handshakes against one candidate.
//! * [`stats`]: latency quantiles and jitter.
//! * [`ranking`]: orders the candidates of a domain, best first.
//! * [`scheduler`]: drives many domains through the pipeline with a fixed worker pool.
//! * [`hosts`]: renders, merges and persists the managed hosts block with backups.

pub mod hosts;
pub mod network;
pub mod prober;
pub mod ranking;
pub mod resolver;
pub mod scheduler;
pub mod stats;
