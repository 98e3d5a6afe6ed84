//! Error types for the window manager core
//!
//! Contract operations never surface these to collaborators; they are
//! absorbed into a debug log at the public boundary.

use thiserror::Error;

/// Errors raised inside the window manager
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// Operation referenced a window id that was never registered
    #[error("window not found: {0}")]
    NotFound(String),
}

/// Result type alias for window manager internals
pub type ShellResult<T> = Result<T, ShellError>;
