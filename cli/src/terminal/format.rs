use std::net::IpAddr;
use std::time::Duration;

use colored::*;
use ipopt_common::model::{DomainResult, ProbeStatistic};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn address(ip: &IpAddr) -> ColoredString {
    match ip {
        IpAddr::V4(v4) => v4.to_string().color(colors::IPV4_ADDR),
        IpAddr::V6(v6) => v6.to_string().color(colors::IPV6_ADDR),
    }
}

pub fn millis(d: Duration) -> String {
    format!("{:.1}ms", d.as_secs_f64() * 1000.0)
}

pub fn success_rate(stat: &ProbeStatistic) -> ColoredString {
    let rate = stat.success_rate();
    let text = format!("{:.0}% ({}/{})", rate * 100.0, stat.successes, stat.attempts());
    match rate {
        r if r >= 1.0 => text.color(colors::GOOD),
        r if r > 0.0 => text.color(colors::DEGRADED),
        _ => text.color(colors::BAD),
    }
}

pub fn stat_to_details(stat: &ProbeStatistic) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Best".to_string(), address(&stat.address)),
        ("Via".to_string(), stat.source.normal()),
        ("Success".to_string(), success_rate(stat)),
    ];

    if stat.is_reachable() {
        details.push(("p50".to_string(), millis(stat.p50).normal()));
        details.push(("p95".to_string(), millis(stat.p95).normal()));
        details.push(("Jitter".to_string(), millis(stat.jitter).normal()));
    } else if let Some(err) = &stat.last_error {
        details.push(("Error".to_string(), err.color(colors::BAD)));
    }

    details
}

pub fn result_to_details(result: &DomainResult) -> Vec<Detail> {
    let mut details: Vec<Detail> = match (&result.best, &result.error) {
        (_, Some(failure)) => vec![("Error".to_string(), failure.to_string().color(colors::BAD))],
        (Some(best), None) => stat_to_details(best),
        (None, None) => vec![("Error".to_string(), "no result".color(colors::BAD))],
    };

    if result.error.is_none() && result.ranked.len() > 1 {
        let others = result.ranked.len() - 1;
        details.push(("Others".to_string(), format!("{others} slower candidate(s)").dimmed()));
    }

    details
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
