use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;

use crate::text::split_tokens;

pub const DEFAULT_DNS_SERVERS: [&str; 4] = ["223.5.5.5", "114.114.114.114", "1.1.1.1", "8.8.8.8"];
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1_200);
pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_SYSTEM_TIMEOUT: Duration = Duration::from_secs(5);

/// Terminal output settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Each level hides more of the decorative output.
    pub quiet: u8,
    pub no_banner: bool,
}

/// Which IP families are kept after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFamilies {
    pub ipv4: bool,
    pub ipv6: bool,
}

impl AddressFamilies {
    pub fn allows(&self, addr: &IpAddr) -> bool {
        match addr {
            IpAddr::V4(_) => self.ipv4,
            IpAddr::V6(_) => self.ipv6,
        }
    }

    pub fn any(&self) -> bool {
        self.ipv4 || self.ipv6
    }
}

impl Default for AddressFamilies {
    fn default() -> Self {
        Self {
            ipv4: true,
            ipv6: false,
        }
    }
}

/// Everything a probing run needs. Checked with [`ProbeConfig::validate`] before any
/// lookup or connection is made.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Explicit name servers, each a bare host, `host:port` or literal IP.
    pub dns_servers: Vec<String>,
    /// Destination port of the TCP handshake.
    pub port: u16,
    /// Bound on a single handshake attempt.
    pub timeout: Duration,
    /// Handshake attempts per candidate address.
    pub attempts: u32,
    /// Number of domains processed at once.
    pub concurrency: usize,
    pub families: AddressFamilies,
    /// Bound on one explicit name server lookup.
    pub dns_timeout: Duration,
    /// Bound on the platform resolver lookup.
    pub system_timeout: Duration,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port: {0} (expected 1-65535)")]
    InvalidPort(u16),
    #[error("invalid timeout: must be greater than zero")]
    InvalidTimeout,
    #[error("invalid attempts: must be at least 1")]
    InvalidAttempts,
    #[error("invalid concurrency: must be at least 1")]
    InvalidConcurrency,
    #[error("invalid dns timeout: must be greater than zero")]
    InvalidDnsTimeout,
    #[error("select ipv4 and/or ipv6")]
    NoAddressFamily,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            dns_servers: DEFAULT_DNS_SERVERS.iter().map(|s| s.to_string()).collect(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
            concurrency: DEFAULT_CONCURRENCY,
            families: AddressFamilies::default(),
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            system_timeout: DEFAULT_SYSTEM_TIMEOUT,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.attempts == 0 {
            return Err(ConfigError::InvalidAttempts);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if self.dns_timeout.is_zero() || self.system_timeout.is_zero() {
            return Err(ConfigError::InvalidDnsTimeout);
        }
        if !self.families.any() {
            return Err(ConfigError::NoAddressFamily);
        }
        Ok(())
    }
}

/// Splits a server list written as free text (newlines, commas, semicolons or spaces).
pub fn parse_server_list(text: &str) -> Vec<String> {
    split_tokens(text).map(str::to_string).collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
