use std::path::Path;

use ipopt_common::config::OutputConfig;
use ipopt_common::success;
use ipopt_core::hosts::HostsFile;

use crate::platform::{self, CurrentPlatform};
use crate::terminal::print;

pub async fn import(hosts: Option<&Path>, out: &OutputConfig) -> anyhow::Result<()> {
    let hosts = HostsFile::new(platform::hosts_path(&CurrentPlatform, hosts));
    let domains = hosts.domains().await?;

    if domains.is_empty() {
        print::header("zero domains mapped", out.quiet);
        print::no_results();
        return Ok(());
    }

    print::header("mapped domains", out.quiet);
    for domain in &domains {
        print::print_status(domain.as_str());
    }
    success!("{} domains mapped in {}", domains.len(), hosts.path().display());
    Ok(())
}
