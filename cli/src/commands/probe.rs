use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use colored::*;
use ipopt_common::config::{OutputConfig, ProbeConfig};
use ipopt_common::domain::{Domain, parse_domains};
use ipopt_common::model::{DomainResult, Mapping, select_mappings};
use ipopt_common::{error, info, success, warn};
use ipopt_core::hosts::HostsFile;
use ipopt_core::scheduler::{EngineEvent, RunOutcome, Scheduler, event_channel};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::commands::ProbeArgs;
use crate::platform::{self, CurrentPlatform};
use crate::terminal::{colors, format, print, spinner::ProbeProgress};
use crate::{iprint, shutdown};

pub async fn probe(args: ProbeArgs, out: &OutputConfig) -> anyhow::Result<()> {
    let cfg: ProbeConfig = args.probe_config();
    let hosts = HostsFile::new(platform::hosts_path(&CurrentPlatform, args.hosts.as_deref()));

    let domains: Vec<Domain> = collect_domains(&args, &hosts).await?;
    if domains.is_empty() {
        bail!("no valid domain to probe; pass domains as arguments, with --file, or use --from-hosts");
    }

    let scheduler = Scheduler::new(cfg.clone()).context("invalid probe settings")?;
    print_settings(&cfg, &domains, out);

    let order: HashMap<Domain, usize> = domains
        .iter()
        .enumerate()
        .map(|(idx, domain)| (domain.clone(), idx))
        .collect();

    let started = Instant::now();
    let progress = ProbeProgress::new(domains.len());
    let cancel = CancellationToken::new();
    let stopping_span = progress.span();
    let signal = shutdown::cancel_on_signal(cancel.clone(), move || {
        let _entered = stopping_span.enter();
        warn!("interrupted; finishing the domains in flight");
    });

    let (tx, rx) = event_channel();
    let collector = consume(rx, &progress).instrument(progress.span());
    let (run, mut results) = tokio::join!(scheduler.run(domains, cancel.clone(), tx), collector);
    signal.abort();
    drop(progress);

    let stopped = match run {
        Ok(()) => false,
        Err(e) if e.is_cancelled() => true,
        Err(e) => return Err(e).context("probe run failed"),
    };

    results.sort_by_key(|result| order.get(&result.domain).copied().unwrap_or(usize::MAX));
    print_results(&results, out);
    print_summary(&results, started.elapsed(), stopped, out);

    let mappings: Vec<Mapping> = select_mappings(&results, args.selection());
    if mappings.is_empty() {
        if args.preview || args.write {
            warn!("no domain has an address worth pinning; hosts file left alone");
        }
        return Ok(());
    }

    if args.preview {
        print_preview(&hosts, &mappings, out).await?;
    }
    if args.write {
        write_mappings(&hosts, &mappings).await?;
    } else if !args.preview {
        info!("pass --preview to see the hosts changes or --write to apply them");
    }

    Ok(())
}

async fn collect_domains(args: &ProbeArgs, hosts: &HostsFile) -> anyhow::Result<Vec<Domain>> {
    let mut text: String = args.domains.join("\n");

    if let Some(file) = &args.file {
        let listed = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read domain list {}", file.display()))?;
        text.push('\n');
        text.push_str(&listed);
    }

    if args.from_hosts {
        let pinned = hosts.domains().await?;
        info!("{} domains found in {}", pinned.len(), hosts.path().display());
        for domain in pinned {
            text.push('\n');
            text.push_str(domain.as_str());
        }
    }

    Ok(parse_domains(&text))
}

async fn consume(mut rx: mpsc::Receiver<EngineEvent>, progress: &ProbeProgress) -> Vec<DomainResult> {
    let mut results: Vec<DomainResult> = Vec::new();

    while let Some(event) = rx.recv().await {
        match event {
            EngineEvent::Log(line) => tracing::debug!("{line}"),
            EngineEvent::Result(result) => {
                match (&result.best, &result.error) {
                    (Some(best), None) => success!(
                        "{} -> {} ({:.0}%, p95 {})",
                        result.domain,
                        best.address,
                        best.success_rate() * 100.0,
                        format::millis(best.p95)
                    ),
                    (_, Some(failure)) if failure.is_cancelled() => {}
                    (_, Some(failure)) => warn!("{}: {failure}", result.domain),
                    (None, None) => warn!("{}: no result", result.domain),
                }
                results.push(result);
            }
            EngineEvent::Progress { done, total } => progress.report(done, total),
            EngineEvent::Finished(outcome) => {
                if outcome == RunOutcome::Cancelled {
                    progress.stopping();
                }
            }
        }
    }

    results
}

fn print_settings(cfg: &ProbeConfig, domains: &[Domain], out: &OutputConfig) {
    if out.quiet > 0 {
        return;
    }

    print::header("probe settings", out.quiet);
    print::set_key_width(&["Domains", "Port", "Timeout", "Attempts", "Workers", "Families", "DNS"]);
    print::aligned_line("Domains", domains.len().to_string());
    print::aligned_line("Port", cfg.port.to_string());
    print::aligned_line("Timeout", format::millis(cfg.timeout));
    print::aligned_line("Attempts", cfg.attempts.to_string());
    print::aligned_line("Workers", cfg.concurrency.min(domains.len()).to_string());

    let families: Vec<&str> = [("IPv4", cfg.families.ipv4), ("IPv6", cfg.families.ipv6)]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect();
    print::aligned_line("Families", families.join(" + "));

    let mut sources: Vec<&str> = vec!["system"];
    sources.extend(cfg.dns_servers.iter().map(String::as_str));
    print::aligned_line("DNS", sources.join(", "));
    iprint!();
}

fn print_results(results: &[DomainResult], out: &OutputConfig) {
    if out.quiet > 1 {
        return;
    }

    print::header("results", out.quiet);
    for (idx, result) in results.iter().enumerate() {
        print::tree_head(idx, result.domain.as_str());
        print::as_tree_one_level(format::result_to_details(result));
        if idx + 1 != results.len() {
            iprint!();
        }
    }
}

fn print_summary(results: &[DomainResult], total_time: Duration, stopped: bool, out: &OutputConfig) {
    let optimized = results.iter().filter(|r| r.is_ok()).count();
    if optimized == 0 && !stopped {
        print::no_results();
    }

    let verb = if stopped { "Probe Stopped" } else { "Probe Complete" };
    let count: ColoredString = format!("{optimized}/{} domains", results.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("{verb}: {count} optimized in {total_time}").color(colors::TEXT_DEFAULT);

    match out.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => success!("{}", output),
    }
}

async fn print_preview(hosts: &HostsFile, mappings: &[Mapping], out: &OutputConfig) -> anyhow::Result<()> {
    let merged = hosts.preview(mappings).await?;
    print::header("hosts preview", out.quiet);
    for line in String::from_utf8_lossy(&merged).lines() {
        iprint!(line);
    }
    Ok(())
}

async fn write_mappings(hosts: &HostsFile, mappings: &[Mapping]) -> anyhow::Result<()> {
    if platform::needs_elevation(&CurrentPlatform, hosts.path()) {
        warn!("not running elevated; writing {} will probably fail", hosts.path().display());
    }

    match hosts.write(mappings).await {
        Ok(outcome) => {
            success!("{} mappings written to {}", mappings.len(), hosts.path().display());
            print::aligned_line("Backup", outcome.backup_path.display().to_string());
            Ok(())
        }
        Err(e) if e.target_modified() => {
            warn!("{} was rewritten but its permissions could not be set", hosts.path().display());
            Err(e).context("failed to finish updating the hosts file")
        }
        Err(e) => {
            error!("hosts file not changed");
            Err(e).context("failed to update the hosts file")
        }
    }
}
