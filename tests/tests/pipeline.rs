use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use ipopt_common::config::{AddressFamilies, ProbeConfig};
use ipopt_common::domain::parse_domains;
use ipopt_common::model::{DomainFailure, DomainResult, SYSTEM_SOURCE, Selection, select_mappings};
use ipopt_core::hosts::{BEGIN_MARKER, END_MARKER, HostsFile};
use ipopt_core::resolver::CandidateResolver;
use ipopt_core::scheduler::{EngineEvent, RunOutcome, Scheduler, event_channel};
use ipopt_integration_tests::{LOCALHOST, StaticLookup, accepting_listener};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const DEAD: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2));

/*************************************************************
                       Helpers
**************************************************************/

fn config(port: u16) -> ProbeConfig {
    ProbeConfig {
        dns_servers: Vec::new(),
        port,
        timeout: Duration::from_millis(300),
        attempts: 2,
        concurrency: 4,
        families: AddressFamilies { ipv4: true, ipv6: false },
        ..Default::default()
    }
}

async fn run_to_end(sched: &Scheduler, text: &str) -> (Vec<DomainResult>, Vec<EngineEvent>) {
    let (tx, mut rx) = event_channel();
    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });

    sched
        .run(parse_domains(text), CancellationToken::new(), tx)
        .await
        .unwrap();
    let events = collector.await.unwrap();

    let mut results: Vec<DomainResult> = events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::Result(r) => Some(r.clone()),
            _ => None,
        })
        .collect();
    results.sort_by(|a, b| a.domain.cmp(&b.domain));
    (results, events)
}

/*************************************************************
                  Resolve, probe and rank
**************************************************************/

#[tokio::test]
async fn reachable_address_beats_dead_one() {
    let port = accepting_listener().await;
    let resolver = CandidateResolver::new(
        vec![
            StaticLookup::new(SYSTEM_SOURCE)
                .with("fast.test", &[DEAD, LOCALHOST])
                .shared(),
            StaticLookup::new("8.8.8.8")
                .with("fast.test", &[LOCALHOST])
                .with("dead.test", &[DEAD])
                .shared(),
        ],
        AddressFamilies { ipv4: true, ipv6: false },
    );
    let sched = Scheduler::with_resolver(config(port), Arc::new(resolver)).unwrap();

    let (results, events) = run_to_end(&sched, "fast.test\ndead.test\nnowhere.test").await;
    assert_eq!(results.len(), 3);

    let dead = &results[0];
    assert_eq!(dead.domain.as_str(), "dead.test");
    let dead_best = dead.best.as_ref().unwrap();
    assert_eq!(dead_best.address, DEAD);
    assert_eq!(dead_best.source, "8.8.8.8");
    assert!(!dead_best.is_reachable());
    assert_eq!(dead_best.failures, 2);

    let fast = &results[1];
    assert_eq!(fast.domain.as_str(), "fast.test");
    let best = fast.best.as_ref().unwrap();
    assert_eq!(best.address, LOCALHOST);
    assert_eq!(best.source, SYSTEM_SOURCE);
    assert_eq!((best.successes, best.failures), (2, 0));
    assert_eq!(fast.ranked.len(), 2);
    assert_eq!(fast.ranked[1].address, DEAD);

    let nowhere = &results[2];
    assert!(matches!(nowhere.error, Some(DomainFailure::Resolution(_))));

    assert!(matches!(events.last(), Some(EngineEvent::Finished(RunOutcome::Completed))));

    let reachable = select_mappings(&results, Selection::Reachable);
    assert_eq!(reachable.len(), 1);
    assert_eq!(reachable[0].domain, "fast.test");
    assert_eq!(select_mappings(&results, Selection::Resolved).len(), 2);
}

/*************************************************************
                  Probe, then pin in a hosts file
**************************************************************/

#[tokio::test]
async fn results_written_and_restored() {
    let port = accepting_listener().await;
    let resolver = CandidateResolver::new(
        vec![StaticLookup::new(SYSTEM_SOURCE).with("example.com", &[LOCALHOST]).shared()],
        AddressFamilies { ipv4: true, ipv6: false },
    );
    let sched = Scheduler::with_resolver(config(port), Arc::new(resolver)).unwrap();
    let (results, _) = run_to_end(&sched, "Example.COM.").await;

    let dir = TempDir::new().unwrap();
    let hosts = HostsFile::new(dir.path().join("hosts"));
    tokio::fs::write(hosts.path(), "127.0.0.1 localhost\n").await.unwrap();

    let mappings = select_mappings(&results, Selection::Reachable);
    let preview = hosts.preview(&mappings).await.unwrap();
    let outcome = hosts.write(&mappings).await.unwrap();

    assert_eq!(preview, outcome.content);
    assert_eq!(
        outcome.content,
        format!("127.0.0.1 localhost\n{BEGIN_MARKER}\n127.0.0.1 example.com\n{END_MARKER}\n").into_bytes()
    );
    let names: Vec<String> = hosts.domains().await.unwrap().iter().map(|d| d.to_string()).collect();
    assert_eq!(names, vec!["localhost", "example.com"]);

    let latest = hosts.latest_backup().await.unwrap().unwrap();
    assert_eq!(latest, outcome.backup_path);
    hosts.restore(&latest).await.unwrap();
    assert_eq!(hosts.read().await.unwrap(), "127.0.0.1 localhost\n");
}
