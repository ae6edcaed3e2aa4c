//! Latency statistics over successful handshakes.

use std::time::Duration;

use ipopt_common::model::ProbeStatistic;

/// Linear-interpolated quantile of `samples`.
///
/// `q <= 0` yields the minimum, `q >= 1` the maximum. Returns zero for an empty slice.
pub fn quantile(samples: &[Duration], q: f64) -> Duration {
    if samples.is_empty() {
        return Duration::ZERO;
    }

    let mut sorted: Vec<Duration> = samples.to_vec();
    sorted.sort_unstable();
    let last = sorted.len() - 1;

    if q.is_nan() || q <= 0.0 {
        return sorted[0];
    }
    if q >= 1.0 {
        return sorted[last];
    }

    let position = q * last as f64;
    let index = position.floor() as usize;
    if index >= last {
        return sorted[last];
    }
    let fraction = position - index as f64;

    let lower = sorted[index].as_nanos() as f64;
    let upper = sorted[index + 1].as_nanos() as f64;
    Duration::from_nanos((lower + (upper - lower) * fraction).round() as u64)
}

/// Population standard deviation of `samples`.
pub fn std_dev(samples: &[Duration]) -> Duration {
    if samples.is_empty() {
        return Duration::ZERO;
    }

    let count = samples.len() as f64;
    let mean = samples.iter().map(|s| s.as_nanos() as f64).sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|s| {
            let delta = s.as_nanos() as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;

    Duration::from_nanos(variance.sqrt().round() as u64)
}

/// Fills the derived fields of `stat` from its samples.
///
/// Without a single successful sample every derived field is set to `fallback`
/// (the per-attempt timeout), which keeps such candidates behind any reachable one.
pub fn summarize(stat: &mut ProbeStatistic, fallback: Duration) {
    if stat.samples.is_empty() {
        stat.p50 = fallback;
        stat.p95 = fallback;
        stat.jitter = fallback;
        return;
    }

    stat.p50 = quantile(&stat.samples, 0.50);
    stat.p95 = quantile(&stat.samples, 0.95);
    stat.jitter = std_dev(&stat.samples);
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
