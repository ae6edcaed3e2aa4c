//! Shared model for `ipopt`: domain names, probe results, run configuration and the
//! logging macros used across the workspace.

pub mod config;
pub mod domain;
pub mod model;
pub mod text;

#[doc(hidden)]
pub use tracing as __tracing;

/// Logs a line that reports a completed step. Rendered with the success marker by the CLI.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "ipopt::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
