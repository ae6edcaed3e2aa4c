use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use ipopt_common::config::OutputConfig;
use ipopt_common::{success, warn};
use ipopt_core::hosts::HostsFile;

use crate::platform::{self, CurrentPlatform};
use crate::terminal::print;

pub async fn restore(backup: Option<PathBuf>, hosts: Option<&Path>, out: &OutputConfig) -> anyhow::Result<()> {
    let hosts = HostsFile::new(platform::hosts_path(&CurrentPlatform, hosts));

    let backup: PathBuf = match backup {
        Some(path) => path,
        None => hosts
            .latest_backup()
            .await?
            .ok_or_else(|| anyhow!("no backup of {} found", hosts.path().display()))?,
    };

    print::header("restoring hosts file", out.quiet);
    print::set_key_width(&["Backup", "Target"]);
    print::aligned_line("Backup", backup.display().to_string());
    print::aligned_line("Target", hosts.path().display().to_string());

    if platform::needs_elevation(&CurrentPlatform, hosts.path()) {
        warn!("not running elevated; restoring {} will probably fail", hosts.path().display());
    }

    hosts
        .restore(&backup)
        .await
        .with_context(|| format!("failed to restore {}", hosts.path().display()))?;
    success!("{} restored from {}", hosts.path().display(), backup.display());
    Ok(())
}
