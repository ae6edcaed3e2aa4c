use std::sync::Arc;

use ipopt_common::model::Mapping;
use ipopt_core::hosts::{self, BEGIN_MARKER, END_MARKER, HostsFile, ManagedBlock};
use tempfile::TempDir;

fn marker_count(text: &str) -> (usize, usize) {
    let begins = text.lines().filter(|l| l.trim() == BEGIN_MARKER).count();
    let ends = text.lines().filter(|l| l.trim() == END_MARKER).count();
    (begins, ends)
}

/*************************************************************
                       Merge scenarios
**************************************************************/

#[test]
fn existing_region_is_replaced() {
    let existing = "127.0.0.1 localhost\n# ip-opt-gui begin\n1.1.1.1 a.com\n# ip-opt-gui end\n";
    let merged = hosts::merge(existing, &ManagedBlock::render(&[Mapping::new("2.2.2.2", "b.com")]));

    assert_eq!(marker_count(&merged), (1, 1));
    assert!(merged.lines().any(|l| l == "2.2.2.2 b.com"));
    assert!(!merged.contains("1.1.1.1 a.com"));
}

#[test]
fn merging_twice_keeps_one_region() {
    let block = ManagedBlock::render(&[Mapping::new("2.2.2.2", "b.com"), Mapping::new("3.3.3.3", "c.com")]);
    let once = hosts::merge("127.0.0.1 localhost\r\n", &block);
    let twice = hosts::merge(&once, &block);

    assert_eq!(once, twice);
    assert_eq!(marker_count(&twice), (1, 1));
}

/*************************************************************
                    Write, backup, restore
**************************************************************/

#[tokio::test]
async fn backup_holds_pre_write_content() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("hosts");
    tokio::fs::write(&target, "127.0.0.1 localhost\n").await.unwrap();

    let outcome = hosts::write_with_backup(&target, &[Mapping::new("1.2.3.4", "example.com")])
        .await
        .unwrap();

    assert_eq!(tokio::fs::read_to_string(&outcome.backup_path).await.unwrap(), "127.0.0.1 localhost\n");
    assert_eq!(tokio::fs::read(&target).await.unwrap(), outcome.content);
    assert_eq!(outcome.backup_path.parent(), target.parent());

    hosts::restore_backup(&outcome.backup_path, &target).await.unwrap();
    assert_eq!(tokio::fs::read(&target).await.unwrap(), b"127.0.0.1 localhost\n");
}

#[tokio::test]
async fn concurrent_writers_are_serialized() {
    let dir = TempDir::new().unwrap();
    let file = Arc::new(HostsFile::new(dir.path().join("hosts")));
    tokio::fs::write(file.path(), "127.0.0.1 localhost\n").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let file = Arc::clone(&file);
        handles.push(tokio::spawn(async move {
            file.write(&[Mapping::new(format!("10.0.0.{i}"), format!("d{i}.test"))])
                .await
                .unwrap()
        }));
    }
    let mut backups = Vec::new();
    for handle in handles {
        backups.push(handle.await.unwrap().backup_path);
    }

    let content = file.read().await.unwrap();
    assert_eq!(marker_count(&content), (1, 1));
    assert!(content.starts_with("127.0.0.1 localhost\n"));

    backups.sort();
    backups.dedup();
    assert_eq!(backups.len(), 8);
}
