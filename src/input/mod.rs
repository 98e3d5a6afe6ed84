//! Input handling: pointer events for window gestures and key bindings
//! for shortcuts that act on the active window

use anyhow::{bail, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Instant;

use crate::config::BindingsConfig;
use crate::layout::ResizeDirection;
use crate::window::Point;

pub mod gesture;

/// Title bar buttons of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowControl {
    Close,
    Maximize,
    Minimize,
}

/// Element of the shell a pointer event landed on
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget {
    /// Empty desktop, taskbar, or anything outside a window
    Desktop,
    /// Window content area
    WindowBody(String),
    /// Window title bar, outside its control buttons
    Header(String),
    /// A title bar button
    Control(String, WindowControl),
    /// One of the eight resize handles
    ResizeHandle(String, ResizeDirection),
}

impl FromStr for WindowControl {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "close" => Ok(WindowControl::Close),
            "maximize" | "max" => Ok(WindowControl::Maximize),
            "minimize" | "min" => Ok(WindowControl::Minimize),
            other => bail!("Unknown window control: {}", other),
        }
    }
}

impl PointerTarget {
    /// Window the target belongs to
    pub fn window_id(&self) -> Option<&str> {
        match self {
            PointerTarget::Desktop => None,
            PointerTarget::WindowBody(id)
            | PointerTarget::Header(id)
            | PointerTarget::Control(id, _)
            | PointerTarget::ResizeHandle(id, _) => Some(id),
        }
    }
}

/// Parses `desktop`, `body:<id>`, `header:<id>`, `control:<id>:<button>`
/// and `handle:<id>:<direction>`
impl FromStr for PointerTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let target = match parts.as_slice() {
            ["desktop"] => PointerTarget::Desktop,
            ["body", id] => PointerTarget::WindowBody(id.to_string()),
            ["header", id] => PointerTarget::Header(id.to_string()),
            ["control", id, control] => PointerTarget::Control(id.to_string(), control.parse()?),
            ["handle", id, direction] => {
                PointerTarget::ResizeHandle(id.to_string(), direction.parse()?)
            }
            _ => bail!("Unknown pointer target: {}", s),
        };
        if target.window_id() == Some("") {
            bail!("Pointer target needs a window id: {}", s);
        }
        Ok(target)
    }
}

/// Pointer messages driving the gesture state machine
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down {
        target: PointerTarget,
        position: Point,
        at: Instant,
    },
    Move {
        position: Point,
        at: Instant,
    },
    Up {
        target: PointerTarget,
        position: Point,
        at: Instant,
    },
}

/// Keyboard key press/release
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Vec<String>,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(key: &str, modifiers: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            pressed: true,
        }
    }

    /// Key press from a binding string such as `Super+Left`
    pub fn parse_combo(combo: &str) -> Self {
        let mut parts: Vec<&str> = combo.split('+').map(str::trim).collect();
        let key = parts.pop().unwrap_or_default();
        Self::press(key, &parts)
    }

    /// Binding string such as `Alt+F4`
    pub fn combo(&self) -> String {
        if self.modifiers.is_empty() {
            self.key.clone()
        } else {
            format!("{}+{}", self.modifiers.join("+"), self.key)
        }
    }
}

/// Shell actions that keyboard shortcuts can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    CloseWindow,
    ShowWindowMenu,
    Maximize,
    RestoreOrMinimize,
    SnapLeft,
    SnapRight,
}

/// Maps key combinations to shell actions
#[derive(Debug)]
pub struct InputManager {
    /// Key binding mappings
    key_bindings: HashMap<String, ShellAction>,
}

impl InputManager {
    pub fn new(bindings_config: &BindingsConfig) -> Result<Self> {
        info!("⌨️ Initializing input manager...");

        let mut key_bindings = HashMap::new();
        key_bindings.insert(bindings_config.close_window.clone(), ShellAction::CloseWindow);
        key_bindings.insert(bindings_config.window_menu.clone(), ShellAction::ShowWindowMenu);
        key_bindings.insert(bindings_config.maximize.clone(), ShellAction::Maximize);
        key_bindings.insert(
            bindings_config.restore_or_minimize.clone(),
            ShellAction::RestoreOrMinimize,
        );
        key_bindings.insert(bindings_config.snap_left.clone(), ShellAction::SnapLeft);
        key_bindings.insert(bindings_config.snap_right.clone(), ShellAction::SnapRight);

        debug!("🔑 Loaded {} key bindings", key_bindings.len());

        Ok(Self { key_bindings })
    }

    /// Process a keyboard event and return the triggered action, if any
    ///
    /// Releases never trigger anything.
    pub fn process_key_event(&self, event: &KeyEvent) -> Option<ShellAction> {
        if !event.pressed {
            return None;
        }

        let key_combo = event.combo();
        debug!("⌨️ Key pressed: {}", key_combo);

        let action = self.key_bindings.get(&key_combo).copied();
        if let Some(action) = action {
            info!("🚀 Triggered action: {:?}", action);
        }
        action
    }
}
