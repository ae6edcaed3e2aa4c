//! Orders the probed candidates of one domain.
//!
//! Keys, in priority order:
//! 1. success rate, higher first
//! 2. p95 latency, lower first
//! 3. p50 latency, lower first
//! 4. jitter, lower first
//! 5. address, ascending
//!
//! The address key makes the order strict: two distinct candidates never compare equal.

use std::cmp::Ordering;

use ipopt_common::model::ProbeStatistic;

pub fn compare(a: &ProbeStatistic, b: &ProbeStatistic) -> Ordering {
    compare_success_rate(b, a)
        .then_with(|| a.p95.cmp(&b.p95))
        .then_with(|| a.p50.cmp(&b.p50))
        .then_with(|| a.jitter.cmp(&b.jitter))
        .then_with(|| a.address.cmp(&b.address))
}

/// Compares `successes / attempts` exactly by cross-multiplying.
/// A statistic with no attempts has rate 0 (its successes are 0 as well).
fn compare_success_rate(a: &ProbeStatistic, b: &ProbeStatistic) -> Ordering {
    let lhs = u64::from(a.successes) * u64::from(b.attempts().max(1));
    let rhs = u64::from(b.successes) * u64::from(a.attempts().max(1));
    lhs.cmp(&rhs)
}

/// Sorts `stats` best first. The sort is stable.
pub fn rank(mut stats: Vec<ProbeStatistic>) -> Vec<ProbeStatistic> {
    stats.sort_by(compare);
    stats
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
