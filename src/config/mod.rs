//! Configuration management for the desktop shell
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. It combines settings for window geometry rules,
//! the viewport, keyboard shortcuts, and the terminal panel.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Main configuration struct containing all shell settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellConfig {
    /// Window ids registered at startup (the static markup of the shell)
    #[serde(default = "ShellConfig::default_windows")]
    pub windows: Vec<String>,

    /// Window geometry and interaction rules
    #[serde(default)]
    pub window: WindowConfig,

    /// Initial viewport dimensions
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Keyboard shortcuts acting on the active window
    #[serde(default)]
    pub bindings: BindingsConfig,

    /// Terminal panel settings
    #[serde(default)]
    pub terminal: TerminalConfig,

    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Window geometry and interaction configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Height of the top system bar (pixels)
    pub chrome_height: f64,

    /// Distance from a screen edge that triggers snapping (pixels)
    pub snap_threshold: f64,

    /// Minimum width enforced by resize handles
    pub min_width: f64,

    /// Minimum height enforced by resize handles
    pub min_height: f64,

    /// Rendered width of a window that was never resized
    pub default_width: f64,

    /// Rendered height of a window that was never resized
    pub default_height: f64,

    /// Drags shorter than this are treated as clicks (milliseconds)
    pub click_threshold_ms: u64,

    /// Two header presses within this window toggle maximize (milliseconds)
    pub double_click_ms: u64,

    /// Starting value of the stacking counter
    pub z_index_base: u64,

    /// Lower bound of the placement jitter for freshly opened windows
    pub jitter_min: f64,

    /// Upper bound (exclusive) of the placement jitter
    pub jitter_max: f64,
}

/// Viewport configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Viewport width (pixels)
    pub width: f64,

    /// Viewport height (pixels)
    pub height: f64,
}

/// Key bindings configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BindingsConfig {
    /// Close the active window
    pub close_window: String,

    /// Show the window menu of the active window
    pub window_menu: String,

    /// Toggle maximize on the active window
    pub maximize: String,

    /// Restore when maximized, minimize otherwise
    pub restore_or_minimize: String,

    /// Snap the active window to the left half
    pub snap_left: String,

    /// Snap the active window to the right half
    pub snap_right: String,
}

/// Terminal panel configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerminalConfig {
    /// User name shown in the prompt
    pub user: String,

    /// Host name shown in the prompt
    pub host: String,

    /// Answer to `whoami`
    pub display_name: String,

    /// Lines printed by `about me`
    pub about: Vec<String>,

    /// Lines printed by `job`
    pub job: Vec<String>,

    /// Targets reachable through `open <alias>`
    pub open_targets: Vec<OpenTarget>,
}

/// A window the terminal can open by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenTarget {
    /// Names accepted after `open` (matched case-insensitively)
    pub aliases: Vec<String>,

    /// Window id passed to the window manager
    pub window: String,

    /// Human readable label used in the confirmation line
    pub label: String,
}

/// General shell settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            windows: Self::default_windows(),
            window: WindowConfig::default(),
            viewport: ViewportConfig::default(),
            bindings: BindingsConfig::default(),
            terminal: TerminalConfig::default(),
            general: GeneralConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            chrome_height: 28.0,
            snap_threshold: 20.0,
            min_width: 400.0,
            min_height: 300.0,
            default_width: 600.0,
            default_height: 400.0,
            click_threshold_ms: 100,
            double_click_ms: 300,
            z_index_base: 100,
            jitter_min: 50.0,
            jitter_max: 150.0,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            close_window: "Alt+F4".to_string(),
            window_menu: "Alt+Space".to_string(),
            maximize: "Super+Up".to_string(),
            restore_or_minimize: "Super+Down".to_string(),
            snap_left: "Super+Left".to_string(),
            snap_right: "Super+Right".to_string(),
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            user: "guest".to_string(),
            host: "localhost".to_string(),
            display_name: "Guest".to_string(),
            about: vec![
                "Name: Guest".to_string(),
                "About: A developer who likes tidy desktops.".to_string(),
            ],
            job: vec![
                "Job: Developer".to_string(),
                "Specializations:".to_string(),
                "- Software Development".to_string(),
            ],
            open_targets: vec![
                OpenTarget {
                    aliases: vec!["documents".to_string(), "documents/".to_string()],
                    window: "documents-folder".to_string(),
                    label: "Documents folder".to_string(),
                },
                OpenTarget {
                    aliases: vec!["home".to_string(), "~".to_string()],
                    window: "home-folder".to_string(),
                    label: "Home folder".to_string(),
                },
            ],
        }
    }
}

impl WindowConfig {
    /// Validate geometry and timing rules
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("chrome_height", self.chrome_height),
            ("snap_threshold", self.snap_threshold),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("default_width", self.default_width),
            ("default_height", self.default_height),
            ("jitter_min", self.jitter_min),
            ("jitter_max", self.jitter_max),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            anyhow::bail!("Invalid {}: must be a finite number (got {})", name, value);
        }

        if self.chrome_height < 0.0 {
            anyhow::bail!("Invalid chrome_height: must not be negative");
        }
        if self.snap_threshold <= 0.0 {
            anyhow::bail!("Invalid snap_threshold: must be positive");
        }
        if self.min_width <= 0.0 || self.min_height <= 0.0 {
            anyhow::bail!("Invalid minimum size: min_width and min_height must be positive");
        }
        if self.default_width < self.min_width || self.default_height < self.min_height {
            anyhow::bail!("Invalid default size: must not be smaller than the minimum size");
        }
        if self.jitter_min < 0.0 || self.jitter_min >= self.jitter_max {
            anyhow::bail!(
                "Invalid placement jitter: need 0 <= jitter_min < jitter_max (got {}..{})",
                self.jitter_min,
                self.jitter_max
            );
        }

        Ok(())
    }
}

impl ShellConfig {
    fn default_windows() -> Vec<String> {
        ["terminal", "about-me", "documents-folder", "home-folder", "phone"]
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Expand ~ to home directory
        let expanded_path = if path.to_string_lossy().starts_with('~') {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Path::new(&home).join(path.strip_prefix("~").unwrap_or(path))
        } else {
            path.to_path_buf()
        };

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: ShellConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;

        let viewport = &self.viewport;
        if !viewport.width.is_finite() || !viewport.height.is_finite() {
            anyhow::bail!("Invalid viewport: dimensions must be finite numbers");
        }
        if viewport.width <= 0.0 || viewport.height <= self.window.chrome_height {
            anyhow::bail!("Invalid viewport: must be wider than 0 and taller than the chrome bar");
        }

        let mut seen = HashSet::new();
        for id in &self.windows {
            if id.is_empty() {
                anyhow::bail!("Invalid window id: ids must not be empty");
            }
            if !seen.insert(id.as_str()) {
                anyhow::bail!("Duplicate window id: {}", id);
            }
        }

        let bindings = [
            &self.bindings.close_window,
            &self.bindings.window_menu,
            &self.bindings.maximize,
            &self.bindings.restore_or_minimize,
            &self.bindings.snap_left,
            &self.bindings.snap_right,
        ];
        if bindings.iter().any(|combo| combo.trim().is_empty()) {
            anyhow::bail!("Invalid bindings: shortcuts must not be empty");
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one
    /// Sections of the partial config that differ from the defaults override this config
    pub fn merge_partial(mut self, partial: ShellConfig) -> Self {
        let default_config = ShellConfig::default();

        if partial.windows != default_config.windows {
            self.windows = partial.windows;
        }
        if partial.window != default_config.window {
            self.window = partial.window;
        }
        if partial.viewport != default_config.viewport {
            self.viewport = partial.viewport;
        }
        if partial.bindings != default_config.bindings {
            self.bindings = partial.bindings;
        }
        if partial.terminal != default_config.terminal {
            self.terminal = partial.terminal;
        }
        if partial.general != default_config.general {
            self.general = partial.general;
        }

        self
    }
}
