use std::path::{Path, PathBuf};

/// Where this platform keeps its hosts file.
pub trait PlatformPaths {
    fn default_hosts_path(&self) -> PathBuf;

    fn is_elevated(&self) -> bool;
}

pub struct CurrentPlatform;

impl PlatformPaths for CurrentPlatform {
    #[cfg(windows)]
    fn default_hosts_path(&self) -> PathBuf {
        let windir = std::env::var_os("WINDIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
        windir.join("System32").join("drivers").join("etc").join("hosts")
    }

    #[cfg(not(windows))]
    fn default_hosts_path(&self) -> PathBuf {
        PathBuf::from("/etc/hosts")
    }

    fn is_elevated(&self) -> bool {
        is_root::is_root()
    }
}

pub fn hosts_path(platform: &impl PlatformPaths, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => platform.default_hosts_path(),
    }
}

/// True when modifying `target` probably needs elevated privileges the process lacks.
pub fn needs_elevation(platform: &impl PlatformPaths, target: &Path) -> bool {
    target == platform.default_hosts_path() && !platform.is_elevated()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
