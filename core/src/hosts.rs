//! The managed region of a hosts file.
//!
//! Everything this tool writes lives between [`BEGIN_MARKER`] and [`END_MARKER`]. Lines
//! outside the region are kept byte for byte, whatever their encoding; only line endings
//! are normalized to LF and blank lines right before the appended region are dropped.

use std::borrow::Cow;
use std::fs::Permissions;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use ipopt_common::domain::{Domain, extract_hosts_domains};
use ipopt_common::model::Mapping;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

pub const BEGIN_MARKER: &str = "# ip-opt-gui begin";
pub const END_MARKER: &str = "# ip-opt-gui end";

const BACKUP_INFIX: &str = ".bak.";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum HostsError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write backup {}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to set permissions on {}", .path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("empty backup path")]
    EmptyBackupPath,
    #[error("backup {} does not exist", .0.display())]
    BackupMissing(PathBuf),
}

impl HostsError {
    /// True when the target was rewritten before the operation failed.
    pub fn target_modified(&self) -> bool {
        matches!(self, Self::Permissions { .. })
    }
}

/// The rendered managed region, markers included, always LF-terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedBlock(String);

impl ManagedBlock {
    /// One `<address> <domain>` line per mapping; mappings with a blank field are skipped.
    pub fn render(mappings: &[Mapping]) -> Self {
        let mut block = String::with_capacity(64 + mappings.len() * 32);
        block.push_str(BEGIN_MARKER);
        block.push('\n');
        for mapping in mappings {
            let address = mapping.address.trim();
            let domain = mapping.domain.trim();
            if address.is_empty() || domain.is_empty() {
                continue;
            }
            block.push_str(address);
            block.push(' ');
            block.push_str(domain);
            block.push('\n');
        }
        block.push_str(END_MARKER);
        block.push('\n');
        Self(block)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Replaces any managed region in `existing` with `block`, appended at the end.
///
/// A begin marker without an end marker swallows the rest of the file. End markers
/// outside a region are dropped.
pub fn merge(existing: &str, block: &ManagedBlock) -> String {
    String::from_utf8_lossy(&merge_bytes(existing.as_bytes(), block)).into_owned()
}

/// [`merge`] on raw file content. Foreign lines need not be valid UTF-8.
pub fn merge_bytes(existing: &[u8], block: &ManagedBlock) -> Vec<u8> {
    let text: Cow<'_, [u8]> = lf_only(existing);
    let begin = BEGIN_MARKER.as_bytes();
    let end = END_MARKER.as_bytes();

    let mut kept: Vec<&[u8]> = Vec::new();
    let mut in_region = false;
    for line in text.split(|b| *b == b'\n') {
        let marker = line.trim_ascii();
        if in_region {
            if marker == end {
                in_region = false;
            }
            continue;
        }
        if marker == begin {
            in_region = true;
            continue;
        }
        if marker == end {
            continue;
        }
        kept.push(line);
    }

    while kept.last().is_some_and(|line| line.trim_ascii().is_empty()) {
        kept.pop();
    }

    let mut merged: Vec<u8> = kept.join(&b'\n');
    if !merged.is_empty() {
        merged.push(b'\n');
    }
    merged.extend_from_slice(block.as_str().as_bytes());
    merged
}

/// CRLF and lone CR become LF.
fn lf_only(raw: &[u8]) -> Cow<'_, [u8]> {
    if !raw.contains(&b'\r') {
        return Cow::Borrowed(raw);
    }

    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == b'\r' {
            bytes.next_if_eq(&b'\n');
            out.push(b'\n');
        } else {
            out.push(b);
        }
    }
    Cow::Owned(out)
}

#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub backup_path: PathBuf,
    /// What the target now contains.
    pub content: Vec<u8>,
}

/// Content of `path`, or `None` when it does not exist.
async fn read_raw(path: &Path) -> Result<Option<Vec<u8>>, HostsError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(HostsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads `path` as text for display and domain extraction. A missing file reads as empty.
/// Invalid UTF-8 is replaced, so never write this back.
pub async fn read(path: &Path) -> Result<String, HostsError> {
    let raw = read_raw(path).await?.unwrap_or_default();
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// What [`write_with_backup`] would leave in `path`, without touching the disk.
pub async fn preview(path: &Path, mappings: &[Mapping]) -> Result<Vec<u8>, HostsError> {
    let existing = read_raw(path).await?.unwrap_or_default();
    Ok(merge_bytes(&existing, &ManagedBlock::render(mappings)))
}

/// Snapshots `path` next to itself, then rewrites it with `mappings` as its managed region.
///
/// The target is not touched unless the snapshot was written in full.
pub async fn write_with_backup(path: &Path, mappings: &[Mapping]) -> Result<WriteOutcome, HostsError> {
    let original = read_raw(path).await?;
    let existed = original.is_some();
    let original = original.unwrap_or_default();

    let content = merge_bytes(&original, &ManagedBlock::render(mappings));
    let backup_path = write_backup(path, &original).await?;
    debug!(backup = %backup_path.display(), bytes = original.len(), "hosts snapshot written");

    replace_contents(path, &content, existed).await?;
    debug!(target = %path.display(), mappings = mappings.len(), "hosts file updated");

    Ok(WriteOutcome { backup_path, content })
}

/// Copies the raw bytes of `backup` over `target`.
pub async fn restore_backup(backup: &Path, target: &Path) -> Result<(), HostsError> {
    if backup.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(HostsError::EmptyBackupPath);
    }
    let Some(content) = read_raw(backup).await? else {
        return Err(HostsError::BackupMissing(backup.to_path_buf()));
    };

    let existed = fs::try_exists(target).await.unwrap_or(false);
    replace_contents(target, &content, existed).await?;
    debug!(backup = %backup.display(), target = %target.display(), "hosts file restored");
    Ok(())
}

/// The most recent `<name>.bak.<timestamp>[.N]` snapshot next to `target`.
pub async fn latest_backup(target: &Path) -> Result<Option<PathBuf>, HostsError> {
    let dir = parent_dir(target);
    let prefix = format!("{}{BACKUP_INFIX}", base_name(target));

    let mut entries = fs::read_dir(&dir).await.map_err(|source| HostsError::Read {
        path: dir.clone(),
        source,
    })?;

    let mut newest: Option<((String, u32), PathBuf)> = None;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => return Err(HostsError::Read { path: dir, source }),
        };

        let name = entry.file_name();
        let Some(stamp) = name.to_str().and_then(|n| n.strip_prefix(&prefix)) else {
            continue;
        };
        let key = match stamp.split_once('.') {
            Some((ts, n)) => (ts.to_string(), n.parse::<u32>().unwrap_or(0)),
            None => (stamp.to_string(), 0),
        };
        if newest.as_ref().is_none_or(|(best, _)| key > *best) {
            newest = Some((key, entry.path()));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

async fn write_backup(target: &Path, content: &[u8]) -> Result<PathBuf, HostsError> {
    let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let stem = parent_dir(target).join(format!("{}{BACKUP_INFIX}{stamp}", base_name(target)));

    let mut attempt: u32 = 0;
    loop {
        let path = match attempt {
            0 => stem.clone(),
            n => PathBuf::from(format!("{}.{n}", stem.display())),
        };

        let opened = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;
        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                attempt += 1;
                continue;
            }
            Err(source) => return Err(HostsError::Backup { path, source }),
        };

        let written = async {
            file.write_all(content).await?;
            file.sync_all().await
        }
        .await;
        return match written {
            Ok(()) => Ok(path),
            Err(source) => Err(HostsError::Backup { path, source }),
        };
    }
}

/// Overwrites `path` in place, which keeps an existing file's mode.
/// A newly created file gets the conventional hosts mode.
async fn replace_contents(path: &Path, content: &[u8], existed: bool) -> Result<(), HostsError> {
    fs::write(path, content).await.map_err(|source| HostsError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    if !existed && let Some(perms) = default_permissions() {
        fs::set_permissions(path, perms)
            .await
            .map_err(|source| HostsError::Permissions {
                path: path.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hosts".to_string())
}

/// A hosts file with write and restore serialized through one lock.
pub struct HostsFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HostsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<String, HostsError> {
        read(&self.path).await
    }

    /// Domains already mapped anywhere in the file.
    pub async fn domains(&self) -> Result<Vec<Domain>, HostsError> {
        Ok(extract_hosts_domains(&self.read().await?))
    }

    pub async fn preview(&self, mappings: &[Mapping]) -> Result<Vec<u8>, HostsError> {
        preview(&self.path, mappings).await
    }

    pub async fn write(&self, mappings: &[Mapping]) -> Result<WriteOutcome, HostsError> {
        let _guard = self.lock.lock().await;
        write_with_backup(&self.path, mappings).await
    }

    pub async fn restore(&self, backup: &Path) -> Result<(), HostsError> {
        let _guard = self.lock.lock().await;
        restore_backup(backup, &self.path).await
    }

    pub async fn latest_backup(&self) -> Result<Option<PathBuf>, HostsError> {
        latest_backup(&self.path).await
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn block(pairs: &[(&str, &str)]) -> ManagedBlock {
        let mappings: Vec<Mapping> = pairs.iter().map(|(a, d)| Mapping::new(*a, *d)).collect();
        ManagedBlock::render(&mappings)
    }

    fn count(haystack: &str, line: &str) -> usize {
        haystack.lines().filter(|l| l.trim() == line).count()
    }

    #[test]
    fn render_skips_blank_mappings() {
        let rendered = block(&[("1.1.1.1", "a.com"), ("", "b.com"), ("2.2.2.2", "  "), (" 3.3.3.3 ", "c.com")]);
        assert_eq!(
            rendered.as_str(),
            "# ip-opt-gui begin\n1.1.1.1 a.com\n3.3.3.3 c.com\n# ip-opt-gui end\n"
        );
        assert_eq!(block(&[]).as_str(), "# ip-opt-gui begin\n# ip-opt-gui end\n");
    }

    #[test]
    fn merge_replaces_existing_region() {
        let existing = "127.0.0.1 localhost\n# ip-opt-gui begin\n1.1.1.1 a.com\n# ip-opt-gui end\n";
        let merged = merge(existing, &block(&[("2.2.2.2", "b.com")]));

        assert_eq!(
            merged,
            "127.0.0.1 localhost\n# ip-opt-gui begin\n2.2.2.2 b.com\n# ip-opt-gui end\n"
        );
        assert!(!merged.contains("1.1.1.1 a.com"));
    }

    #[test]
    fn merge_is_idempotent() {
        let b = block(&[("2.2.2.2", "b.com")]);
        let once = merge("127.0.0.1 localhost\n\n\n", &b);
        let twice = merge(&once, &b);

        assert_eq!(once, twice);
        assert_eq!(count(&twice, BEGIN_MARKER), 1);
        assert_eq!(count(&twice, END_MARKER), 1);
    }

    #[test]
    fn merge_keeps_foreign_lines_around_a_middle_region() {
        let existing = "# top\r\n127.0.0.1 localhost\r\n# ip-opt-gui begin\r\n9.9.9.9 old.com\r\n# ip-opt-gui end\r\n10.0.0.1 nas.lan\r\n";
        let merged = merge(existing, &block(&[("1.2.3.4", "new.com")]));

        assert_eq!(
            merged,
            "# top\n127.0.0.1 localhost\n10.0.0.1 nas.lan\n# ip-opt-gui begin\n1.2.3.4 new.com\n# ip-opt-gui end\n"
        );
        assert!(!merged.contains('\r'));
    }

    #[test]
    fn merge_handles_bare_cr_line_endings() {
        let merged = merge("127.0.0.1 localhost\r::1 localhost\r", &block(&[]));
        assert!(merged.starts_with("127.0.0.1 localhost\n::1 localhost\n# ip-opt-gui begin\n"));
    }

    #[test]
    fn merge_drops_unterminated_region_to_end_of_file() {
        let existing = "127.0.0.1 localhost\n# ip-opt-gui begin\n1.1.1.1 a.com\n10.0.0.1 nas.lan\n";
        let merged = merge(existing, &block(&[("2.2.2.2", "b.com")]));

        assert_eq!(
            merged,
            "127.0.0.1 localhost\n# ip-opt-gui begin\n2.2.2.2 b.com\n# ip-opt-gui end\n"
        );
    }

    #[test]
    fn merge_removes_every_region_and_stray_end_markers() {
        let existing = "# ip-opt-gui end\na\n  # ip-opt-gui begin  \nx\n# ip-opt-gui end\nb\n# ip-opt-gui begin\ny\n# ip-opt-gui end\n";
        let merged = merge(existing, &block(&[]));

        assert_eq!(merged, "a\nb\n# ip-opt-gui begin\n# ip-opt-gui end\n");
    }

    #[test]
    fn merge_trims_whitespace_only_tail() {
        let merged = merge("127.0.0.1 localhost\n \t\n\n", &block(&[]));
        assert_eq!(merged, "127.0.0.1 localhost\n# ip-opt-gui begin\n# ip-opt-gui end\n");
    }

    #[test]
    fn merge_into_empty_file_is_just_the_block() {
        let b = block(&[("1.1.1.1", "a.com")]);
        assert_eq!(merge("", &b), b.as_str());
        assert_eq!(merge("\n\n", &b), b.as_str());
    }

    #[tokio::test]
    async fn write_then_restore_round_trips_the_original() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        fs::write(&target, "127.0.0.1 localhost\n").await.unwrap();

        let outcome = write_with_backup(&target, &[Mapping::new("1.2.3.4", "example.com")])
            .await
            .unwrap();

        let backup = fs::read_to_string(&outcome.backup_path).await.unwrap();
        assert_eq!(backup, "127.0.0.1 localhost\n");
        let written = fs::read_to_string(&target).await.unwrap();
        assert_eq!(written.as_bytes(), outcome.content);
        assert!(written.contains("1.2.3.4 example.com"));

        let backup_name = outcome.backup_path.file_name().unwrap().to_string_lossy().into_owned();
        let stamp = backup_name.strip_prefix("hosts.bak.").unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));

        restore_backup(&outcome.backup_path, &target).await.unwrap();
        assert_eq!(fs::read(&target).await.unwrap(), b"127.0.0.1 localhost\n");
    }

    #[tokio::test]
    async fn backup_keeps_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        let original: &[u8] = b"127.0.0.1 localhost\r\n\r\n";
        fs::write(&target, original).await.unwrap();

        let outcome = write_with_backup(&target, &[]).await.unwrap();
        assert_eq!(fs::read(&outcome.backup_path).await.unwrap(), original);
        assert!(!outcome.content.contains(&b'\r'));
    }

    #[test]
    fn merge_bytes_keeps_non_utf8_lines() {
        let existing: &[u8] = b"# \xb2\xe2\xca\xd4\r\n127.0.0.1 localhost\r\n# ip-opt-gui begin\r\n9.9.9.9 old.com\r\n# ip-opt-gui end\r\n";
        let merged = merge_bytes(existing, &block(&[("1.2.3.4", "new.com")]));

        assert_eq!(
            merged,
            b"# \xb2\xe2\xca\xd4\n127.0.0.1 localhost\n# ip-opt-gui begin\n1.2.3.4 new.com\n# ip-opt-gui end\n"
        );
    }

    #[tokio::test]
    async fn write_keeps_foreign_bytes_that_are_not_utf8() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        let original: &[u8] = b"# \xb2\xe2\xca\xd4\n127.0.0.1 localhost # caf\xe9\n";
        fs::write(&target, original).await.unwrap();

        let outcome = write_with_backup(&target, &[Mapping::new("1.1.1.1", "a.com")]).await.unwrap();

        let written = fs::read(&target).await.unwrap();
        assert!(written.starts_with(original));
        assert_eq!(&written[original.len()..], block(&[("1.1.1.1", "a.com")]).as_str().as_bytes());
        assert_eq!(written, outcome.content);
        assert_eq!(preview(&target, &[Mapping::new("1.1.1.1", "a.com")]).await.unwrap(), written);
        assert_eq!(fs::read(&outcome.backup_path).await.unwrap(), original);
    }

    #[test]
    fn only_permission_failures_leave_the_target_modified() {
        let path = PathBuf::from("/etc/hosts");
        let io_err = || io::Error::from(ErrorKind::PermissionDenied);

        assert!(HostsError::Permissions { path: path.clone(), source: io_err() }.target_modified());
        assert!(!HostsError::Write { path: path.clone(), source: io_err() }.target_modified());
        assert!(!HostsError::Backup { path: path.clone(), source: io_err() }.target_modified());
        assert!(!HostsError::Read { path, source: io_err() }.target_modified());
        assert!(!HostsError::EmptyBackupPath.target_modified());
    }

    #[tokio::test]
    async fn backups_never_overwrite_each_other() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        fs::write(&target, "first\n").await.unwrap();

        let one = write_with_backup(&target, &[Mapping::new("1.1.1.1", "a.com")]).await.unwrap();
        let two = write_with_backup(&target, &[Mapping::new("2.2.2.2", "b.com")]).await.unwrap();

        assert_ne!(one.backup_path, two.backup_path);
        assert_eq!(fs::read_to_string(&one.backup_path).await.unwrap(), "first\n");
        assert_eq!(fs::read_to_string(&two.backup_path).await.unwrap().as_bytes(), one.content);
        assert_eq!(latest_backup(&target).await.unwrap(), Some(two.backup_path));
    }

    #[tokio::test]
    async fn write_creates_missing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");

        let outcome = write_with_backup(&target, &[Mapping::new("1.1.1.1", "a.com")]).await.unwrap();

        assert_eq!(fs::read(&outcome.backup_path).await.unwrap(), b"");
        assert_eq!(
            fs::read_to_string(&target).await.unwrap(),
            "# ip-opt-gui begin\n1.1.1.1 a.com\n# ip-opt-gui end\n"
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target).await.unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o644);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn write_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        fs::write(&target, "127.0.0.1 localhost\n").await.unwrap();
        fs::set_permissions(&target, Permissions::from_mode(0o600)).await.unwrap();

        write_with_backup(&target, &[Mapping::new("1.1.1.1", "a.com")]).await.unwrap();

        let mode = fs::metadata(&target).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn restore_rejects_empty_or_missing_backup() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        fs::write(&target, "keep\n").await.unwrap();

        assert!(matches!(
            restore_backup(Path::new(""), &target).await,
            Err(HostsError::EmptyBackupPath)
        ));
        assert!(matches!(
            restore_backup(&dir.path().join("hosts.bak.19700101000000"), &target).await,
            Err(HostsError::BackupMissing(_))
        ));
        assert_eq!(fs::read_to_string(&target).await.unwrap(), "keep\n");
    }

    #[tokio::test]
    async fn failed_backup_prevents_write() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        fs::write(&target, "keep\n").await.unwrap();

        let orphan = dir.path().join("missing-dir").join("hosts");

        assert!(matches!(
            write_with_backup(&orphan, &[Mapping::new("1.1.1.1", "a.com")]).await,
            Err(HostsError::Backup { .. })
        ));
        assert!(!fs::try_exists(&orphan).await.unwrap());
        assert_eq!(fs::read_to_string(&target).await.unwrap(), "keep\n");
    }

    #[tokio::test]
    async fn latest_backup_orders_suffixes_numerically() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        for name in [
            "hosts.bak.20260101000000",
            "hosts.bak.20260101000000.9",
            "hosts.bak.20260101000000.10",
            "hosts.bak.20250101000000.99",
            "other.bak.20990101000000",
        ] {
            fs::write(dir.path().join(name), "").await.unwrap();
        }

        let newest = latest_backup(&target).await.unwrap().unwrap();
        assert_eq!(newest.file_name().unwrap(), "hosts.bak.20260101000000.10");
        assert_eq!(latest_backup(&dir.path().join("absent")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn hosts_file_lists_mapped_domains() {
        let dir = TempDir::new().unwrap();
        let hosts = HostsFile::new(dir.path().join("hosts"));
        fs::write(hosts.path(), "127.0.0.1 localhost\n# comment\n1.1.1.1 a.com www.a.com # pinned\n")
            .await
            .unwrap();

        let names: Vec<String> = hosts.domains().await.unwrap().iter().map(|d| d.to_string()).collect();
        assert_eq!(names, vec!["localhost", "a.com", "www.a.com"]);
    }
}
