//! # deskshell - Desktop Shell Window Manager
//!
//! Headless core of a browser-style desktop shell: floating windows that
//! can be dragged by their title bar, resized from eight handles, snapped
//! to screen halves, maximized, minimized and restored, with a single
//! active window on top.
//!
//! ## Architecture
//!
//! - `window`: Window registry, transitions and the interaction controller
//! - `layout`: Snap, maximize, clamp and resize geometry
//! - `focus`: Z-order counter and the active window
//! - `input`: Pointer events, gesture state and key bindings
//! - `render`: Desired-state updates and render sinks
//! - `terminal`: Terminal panel command interpreter
//! - `shell`: Composition of the above plus the line protocol
//! - `config`: Configuration parsing and management
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deskshell::{DesktopShell, ShellConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut shell = DesktopShell::new(ShellConfig::default())?;
//!     shell.windows_mut().open_window("terminal");
//!     shell.windows_mut().maximize_window("terminal");
//!     for update in shell.drain_updates() {
//!         println!("{}", serde_json::to_string(&update)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod focus;
pub mod input;
pub mod layout;
pub mod render;
pub mod shell;
pub mod terminal;
pub mod window;

// Re-export main types for easy access
pub use config::ShellConfig;
pub use error::{ShellError, ShellResult};
pub use input::{InputManager, KeyEvent, PointerEvent, PointerTarget, ShellAction};
pub use layout::{LayoutEngine, SnapSide, Viewport};
pub use render::{JsonLinesSink, RenderSink, RenderUpdate};
pub use shell::DesktopShell;
pub use terminal::Terminal;
pub use window::WindowManager;

// Re-export common error types
pub use anyhow::{Context, Error, Result};

/// Version information for deskshell
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
