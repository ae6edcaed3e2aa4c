pub mod import;
pub mod probe;
pub mod restore;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use ipopt_common::config::{
    AddressFamilies, DEFAULT_ATTEMPTS, DEFAULT_CONCURRENCY, DEFAULT_PORT, OutputConfig, ProbeConfig,
    parse_server_list,
};
use ipopt_common::model::Selection;

const DEFAULT_TIMEOUT_MS: u64 = 1_200;

#[derive(Parser)]
#[command(name = "ipopt", version)]
#[command(about = "Finds the fastest address of each domain and pins it in the hosts file.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat for even less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve, probe and rank the addresses of one or more domains
    #[command(alias = "p")]
    Probe(ProbeArgs),
    /// List the domains a hosts file already maps
    #[command(alias = "i")]
    Import {
        /// Hosts file to read (defaults to the system hosts file)
        #[arg(long)]
        hosts: Option<PathBuf>,
    },
    /// Put a hosts file back the way a backup recorded it
    #[command(alias = "r")]
    Restore {
        /// Backup to restore (defaults to the newest one next to the hosts file)
        backup: Option<PathBuf>,
        /// Hosts file to restore (defaults to the system hosts file)
        #[arg(long)]
        hosts: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Domains to probe; commas, semicolons and whitespace all separate
    pub domains: Vec<String>,

    /// Read more domains from a file (one or more per line, `#` starts a comment)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Also probe every domain the hosts file already maps
    #[arg(long)]
    pub from_hosts: bool,

    /// DNS servers to ask besides the system resolver (repeatable or comma separated)
    #[arg(long = "dns", value_name = "LIST")]
    pub dns: Vec<String>,

    /// TCP port to probe
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Timeout of a single handshake, in milliseconds
    #[arg(short, long = "timeout", value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Handshakes per candidate address
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: u32,

    /// Domains processed at the same time
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Consider IPv4 addresses (default)
    #[arg(long, overrides_with = "no_ipv4")]
    pub ipv4: bool,

    /// Ignore IPv4 addresses
    #[arg(long, overrides_with = "ipv4")]
    pub no_ipv4: bool,

    /// Consider IPv6 addresses
    #[arg(long)]
    pub ipv6: bool,

    /// Pin a domain even when its best address never answered
    #[arg(long)]
    pub include_unreachable: bool,

    /// Show what the hosts file would look like
    #[arg(long)]
    pub preview: bool,

    /// Write the chosen addresses into the hosts file (a backup is made first)
    #[arg(long)]
    pub write: bool,

    /// Hosts file to use (defaults to the system hosts file)
    #[arg(long, value_name = "PATH")]
    pub hosts: Option<PathBuf>,
}

impl ProbeArgs {
    pub fn probe_config(&self) -> ProbeConfig {
        let defaults = ProbeConfig::default();
        let dns_servers = if self.dns.is_empty() {
            defaults.dns_servers.clone()
        } else {
            self.dns.iter().flat_map(|list| parse_server_list(list)).collect()
        };

        ProbeConfig {
            dns_servers,
            port: self.port,
            timeout: Duration::from_millis(self.timeout_ms),
            attempts: self.attempts,
            concurrency: self.concurrency,
            families: AddressFamilies {
                ipv4: !self.no_ipv4,
                ipv6: self.ipv6,
            },
            ..defaults
        }
    }

    pub fn selection(&self) -> Selection {
        if self.include_unreachable {
            Selection::Resolved
        } else {
            Selection::Reachable
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn output(&self) -> OutputConfig {
        OutputConfig {
            quiet: self.quiet,
            no_banner: self.no_banner,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
