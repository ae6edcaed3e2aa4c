//! # Domain Names
//!
//! Normalizes free-form input into validated host names.
//!
//! Input can come from:
//! * A hand-written list (one or more names per line, `,` / `;` / whitespace separated).
//! * A hosts file, where every column after the address is a name.
//!
//! Both paths share the same rules: a trailing `#` comment is dropped, names are lowercased,
//! a single trailing dot is removed and anything that is not a plain `[a-z0-9-]` label sequence
//! is skipped without complaint. The first spelling of a name wins, later duplicates vanish.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::text::{normalize_line_endings, split_tokens, strip_comment};

pub const MAX_DOMAIN_LEN: usize = 253;
pub const MAX_LABEL_LEN: usize = 63;

/// A normalized host name. Only constructed through [`normalize`], so every value upholds
/// the lowercase / label-length / charset rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidDomain {
    #[error("empty domain name")]
    Empty,
    #[error("domain name is {0} characters long, the limit is {MAX_DOMAIN_LEN}")]
    TooLong(usize),
    #[error("label '{0}' must be 1 to {MAX_LABEL_LEN} characters")]
    BadLabel(String),
    #[error("character '{0}' is not allowed in a domain name")]
    BadCharacter(char),
}

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Domain {
    type Err = InvalidDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

/// Normalizes a single token: trims, strips one trailing dot, lowercases, validates.
pub fn normalize(token: &str) -> Result<Domain, InvalidDomain> {
    let trimmed = token.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    let lower = trimmed.to_ascii_lowercase();
    validate(&lower)?;
    Ok(Domain(lower))
}

fn validate(name: &str) -> Result<(), InvalidDomain> {
    if name.is_empty() {
        return Err(InvalidDomain::Empty);
    }
    if name.len() > MAX_DOMAIN_LEN {
        return Err(InvalidDomain::TooLong(name.len()));
    }

    for label in name.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(InvalidDomain::BadLabel(label.to_string()));
        }
        if let Some(bad) = label
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(InvalidDomain::BadCharacter(bad));
        }
    }
    Ok(())
}

/// Parses a free-form domain list.
///
/// Invalid tokens are dropped silently; the result keeps first-seen order with no duplicates.
pub fn parse_domains(text: &str) -> Vec<Domain> {
    let text = normalize_line_endings(text);
    let mut collector = Collector::default();

    for line in text.split('\n') {
        for token in split_tokens(strip_comment(line)) {
            collector.push(token);
        }
    }
    collector.finish()
}

/// Extracts the names mapped by a hosts-formatted text (every column after the address).
///
/// Lines with fewer than two columns are ignored.
pub fn extract_hosts_domains(text: &str) -> Vec<Domain> {
    let text = normalize_line_endings(text);
    let mut collector = Collector::default();

    for line in text.split('\n') {
        let mut columns = strip_comment(line).split_whitespace();
        if columns.next().is_none() {
            continue;
        }
        for token in columns {
            collector.push(token);
        }
    }
    collector.finish()
}

#[derive(Default)]
struct Collector {
    seen: HashSet<Domain>,
    ordered: Vec<Domain>,
}

impl Collector {
    fn push(&mut self, token: &str) {
        if let Ok(domain) = normalize(token)
            && self.seen.insert(domain.clone())
        {
            self.ordered.push(domain);
        }
    }

    fn finish(self) -> Vec<Domain> {
        self.ordered
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
