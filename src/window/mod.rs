//! Core Window Management System
//!
//! This module implements the shell's window manager:
//! - Registry of window records (open, position, size, mode flags)
//! - Open/close/minimize/maximize/restore/snap transitions
//! - Focus and z-order through the focus manager
//! - Pointer gestures (drag, resize, control clicks) in [`interaction`]
//! - Window menu for the active window
//!
//! Every state change is queued as a [`RenderUpdate`] describing the
//! desired on-screen state; a render adapter drains and applies them.

use anyhow::Result;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use crate::config::WindowConfig;
use crate::error::ShellResult;
use crate::focus::FocusManager;
use crate::input::gesture::GestureState;
use crate::input::{ShellAction, WindowControl};
use crate::layout::{LayoutEngine, SnapSide, Viewport};
use crate::render::{RenderUpdate, WindowState};

pub mod interaction;
pub mod menu;
pub mod registry;

pub use menu::{MenuItem, WindowMenu};
pub use registry::{WindowRecord, WindowRegistry};

/// Point in viewport pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rectangle for window positioning and sizing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_loc_and_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }
}

pub struct WindowManager {
    config: WindowConfig,

    /// Window records by id
    registry: WindowRegistry,

    /// Geometry rules for the current viewport
    layout: LayoutEngine,

    /// Stacking counter and active window
    focus: FocusManager,

    /// Geometry gesture in progress
    gesture: GestureState,

    /// Control button pressed but not yet released
    pressed_control: Option<(String, WindowControl)>,

    /// Last header press per window, for double-click detection
    last_header_press: HashMap<String, Instant>,

    /// Snap preview overlay currently shown
    snap_preview: Option<Rectangle>,

    /// Window menu currently shown
    menu: Option<WindowMenu>,

    /// Desired-state records not yet drained by a renderer
    updates: Vec<RenderUpdate>,

    /// Source of placement jitter
    rng: StdRng,
}

impl WindowManager {
    /// Create a window manager for the given viewport
    ///
    /// Fails when the window configuration does not validate.
    pub fn new(config: &WindowConfig, viewport: Viewport) -> Result<Self> {
        Self::with_rng(config, viewport, StdRng::from_entropy())
    }

    /// Create a window manager with deterministic placement jitter
    pub fn with_seed(config: &WindowConfig, viewport: Viewport, seed: u64) -> Result<Self> {
        Self::with_rng(config, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &WindowConfig, viewport: Viewport, rng: StdRng) -> Result<Self> {
        config.validate()?;

        let default_size = Size::new(config.default_width, config.default_height);
        Ok(Self {
            config: config.clone(),
            registry: WindowRegistry::new(default_size),
            layout: LayoutEngine::new(config, viewport),
            focus: FocusManager::new(config.z_index_base),
            gesture: GestureState::Idle,
            pressed_control: None,
            last_header_press: HashMap::new(),
            snap_preview: None,
            menu: None,
            updates: Vec::new(),
            rng,
        })
    }

    /// Register a window id; must happen before the id is used
    pub fn register(&mut self, id: &str) {
        self.registry.register(id);
    }

    /// Get a window record by id
    pub fn window(&self, id: &str) -> Option<&WindowRecord> {
        self.registry.get(id).ok()
    }

    /// All window records in registration order
    pub fn windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.registry.records()
    }

    /// Currently active window id
    pub fn active_window_id(&self) -> Option<&str> {
        self.focus.active()
    }

    pub fn viewport(&self) -> Viewport {
        self.layout.viewport()
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn snap_preview(&self) -> Option<Rectangle> {
        self.snap_preview
    }

    pub fn window_menu(&self) -> Option<&WindowMenu> {
        self.menu.as_ref()
    }

    /// Desired on-screen state of one window
    pub fn window_state(&self, id: &str) -> Option<WindowState> {
        let record = self.registry.get(id).ok()?;
        Some(WindowState {
            id: record.id.clone(),
            frame: record.frame,
            mode: record.mode(),
            visible: record.visible,
            z_index: record.z_index,
            active: self.focus.is_active(id),
        })
    }

    /// Take all render updates queued since the last drain
    pub fn drain_updates(&mut self) -> Vec<RenderUpdate> {
        std::mem::take(&mut self.updates)
    }

    // === Collaborator contract ===

    /// Open a window and bring it to front; unknown ids are ignored
    pub fn open_window(&mut self, id: &str) {
        let result = self.try_open(id);
        Self::absorb("open_window", result);
    }

    /// Close a window without touching its geometry
    pub fn close_window(&mut self, id: &str) {
        let result = self.try_close(id);
        Self::absorb("close_window", result);
    }

    /// Bring a window to front and make it the active window
    pub fn focus_window(&mut self, id: &str) {
        let result = self.try_focus(id);
        Self::absorb("focus_window", result);
    }

    /// Hide a window, keeping its geometry and mode flags
    pub fn minimize_window(&mut self, id: &str) {
        let result = self.try_minimize(id);
        Self::absorb("minimize_window", result);
    }

    /// Toggle between maximized and the pre-maximize geometry
    pub fn maximize_window(&mut self, id: &str) {
        let result = self.try_maximize(id);
        Self::absorb("maximize_window", result);
    }

    /// Reapply the last drag/maximize snapshot, if any
    pub fn restore_window(&mut self, id: &str) {
        let result = self.try_restore(id);
        Self::absorb("restore_window", result);
    }

    /// Snap a window to one half of the screen
    pub fn snap_window(&mut self, id: &str, side: SnapSide) {
        let result = self.try_snap(id, side);
        Self::absorb("snap_window", result);
    }

    /// React to a new viewport size: only maximized windows are re-measured
    pub fn resize_viewport(&mut self, viewport: Viewport) {
        let usable = viewport.width.is_finite()
            && viewport.height.is_finite()
            && viewport.width > 0.0
            && viewport.height > self.layout.chrome_height();
        if !usable {
            warn!("Ignoring unusable viewport {}x{}", viewport.width, viewport.height);
            return;
        }

        info!("🖥️ Viewport resized to {}x{}", viewport.width, viewport.height);
        self.layout.set_viewport(viewport);

        let maximized = self.layout.maximized_rect();
        let ids: Vec<String> = self
            .registry
            .records()
            .filter(|record| record.is_maximized)
            .map(|record| record.id.clone())
            .collect();

        for id in ids {
            if let Ok(record) = self.registry.get_mut(&id) {
                record.frame = maximized;
            }
            self.emit_window(&id);
        }
    }

    /// Run a keyboard shortcut against the active window
    ///
    /// Shortcuts are ignored while no window is active or the active window
    /// has been closed.
    pub fn execute_action(&mut self, action: ShellAction) {
        let Some(id) = self.active_open_window() else {
            debug!("No open active window for {:?}", action);
            return;
        };

        debug!("Executing {:?} on active window {}", action, id);
        match action {
            ShellAction::CloseWindow => self.close_window(&id),
            ShellAction::ShowWindowMenu => {
                self.show_window_menu(&id);
            }
            ShellAction::Maximize => self.maximize_window(&id),
            ShellAction::RestoreOrMinimize => {
                let maximized = self
                    .registry
                    .get(&id)
                    .map(|record| record.is_maximized)
                    .unwrap_or(false);
                if maximized {
                    self.restore_window(&id);
                } else {
                    self.minimize_window(&id);
                }
            }
            ShellAction::SnapLeft => self.snap_window(&id, SnapSide::Left),
            ShellAction::SnapRight => self.snap_window(&id, SnapSide::Right),
        }
    }

    fn active_open_window(&self) -> Option<String> {
        let id = self.focus.active()?;
        let record = self.registry.get(id).ok()?;
        record.is_open.then(|| id.to_string())
    }

    // === Window menu ===

    /// Show the minimize/maximize/close menu under a window's title bar
    pub fn show_window_menu(&mut self, id: &str) -> Option<WindowMenu> {
        let frame = match self.registry.get(id) {
            Ok(record) => record.frame,
            Err(e) => {
                debug!("show_window_menu ignored: {}", e);
                return None;
            }
        };

        let menu = WindowMenu::new(
            id,
            Point::new(frame.x, frame.y + self.layout.chrome_height()),
        );
        self.menu = Some(menu.clone());
        self.updates.push(RenderUpdate::WindowMenu {
            menu: Some(menu.clone()),
        });
        Some(menu)
    }

    /// Run a menu entry against the menu's window and dismiss the menu
    pub fn choose_menu_item(&mut self, item: MenuItem) {
        let Some(menu) = self.menu.take() else {
            debug!("No window menu shown, ignoring {:?}", item);
            return;
        };
        self.updates.push(RenderUpdate::WindowMenu { menu: None });

        match item {
            MenuItem::Minimize => self.minimize_window(&menu.window_id),
            MenuItem::Maximize => self.maximize_window(&menu.window_id),
            MenuItem::Close => self.close_window(&menu.window_id),
        }
    }

    pub fn dismiss_window_menu(&mut self) {
        if self.menu.take().is_some() {
            self.updates.push(RenderUpdate::WindowMenu { menu: None });
        }
    }

    // === Transitions ===

    fn try_open(&mut self, id: &str) -> ShellResult<()> {
        let record = self.registry.get_mut(id)?;
        record.is_open = true;
        record.visible = true;
        let unplaced = record.is_unplaced();

        let previous = self.raise(id)?;

        if unplaced {
            let position = self.placement_jitter();
            let record = self.registry.get_mut(id)?;
            record.position = position;
            if !record.is_maximized {
                record.frame.set_origin(position);
            }
            debug!("Placed window {} at ({:.0}, {:.0})", id, position.x, position.y);
        }

        info!("🪟 Opened window {}", id);
        self.emit_focus_change(id, previous);
        Ok(())
    }

    fn try_close(&mut self, id: &str) -> ShellResult<()> {
        self.cancel_gesture(id);
        let record = self.registry.get_mut(id)?;
        record.is_open = false;
        record.visible = false;

        info!("Closed window {}", id);
        self.emit_window(id);
        Ok(())
    }

    fn try_focus(&mut self, id: &str) -> ShellResult<()> {
        let previous = self.raise(id)?;
        self.emit_focus_change(id, previous);
        Ok(())
    }

    fn try_minimize(&mut self, id: &str) -> ShellResult<()> {
        self.cancel_gesture(id);
        let record = self.registry.get_mut(id)?;
        record.visible = false;

        debug!("Minimized window {}", id);
        self.emit_window(id);
        Ok(())
    }

    fn try_maximize(&mut self, id: &str) -> ShellResult<()> {
        let maximized = self.layout.maximized_rect();
        let fallback_size = Size::new(self.config.default_width, self.config.default_height);
        self.cancel_gesture(id);
        let record = self.registry.get_mut(id)?;

        if record.is_maximized {
            let restored = record.snapshot().unwrap_or_else(|| {
                Rectangle::from_loc_and_size(record.position, record.size.unwrap_or(fallback_size))
            });
            record.is_maximized = false;
            record.frame = restored;
            record.position = restored.origin();
            debug!("Restored window {} from maximized", id);
        } else {
            record.snapshot_frame();
            record.is_maximized = true;
            record.frame = maximized;
            debug!("Maximized window {}", id);
        }

        self.emit_window(id);
        Ok(())
    }

    fn try_restore(&mut self, id: &str) -> ShellResult<()> {
        self.cancel_gesture(id);
        let record = self.registry.get_mut(id)?;
        let Some(snapshot) = record.snapshot() else {
            debug!("Window {} has no geometry snapshot to restore", id);
            return Ok(());
        };

        record.is_maximized = false;
        record.frame = snapshot;
        record.position = snapshot.origin();
        record.size = Some(snapshot.size());

        debug!("Restored window {}", id);
        self.emit_window(id);
        Ok(())
    }

    fn try_snap(&mut self, id: &str, side: SnapSide) -> ShellResult<()> {
        let frame = self.layout.snap_rect(side);
        self.cancel_gesture(id);
        let record = self.registry.get_mut(id)?;
        record.is_maximized = false;
        record.frame = frame;

        debug!("Snapped window {} to the {}", id, side);
        self.emit_window(id);
        Ok(())
    }

    /// Drop a drag or resize of `id` without its end-of-gesture effects
    ///
    /// Pointer moves after a mode change must not touch the window's frame.
    fn cancel_gesture(&mut self, id: &str) {
        if self.gesture.window_id() == Some(id) {
            debug!("Cancelled {:?} on {}", self.gesture, id);
            self.gesture = GestureState::Idle;
            self.set_snap_preview(None);
        }
    }

    /// Assign the next stacking value and make `id` active
    ///
    /// Returns the previously active window when it differs from `id`.
    fn raise(&mut self, id: &str) -> ShellResult<Option<String>> {
        self.registry.get(id)?;

        let previous = self
            .focus
            .active()
            .filter(|active| *active != id)
            .map(str::to_string);
        let z_index = self.focus.raise(id);

        let record = self.registry.get_mut(id)?;
        record.z_index = Some(z_index);
        if record.is_open && !record.visible {
            record.visible = true;
        }

        debug!("Focused window {} (z-index {})", id, z_index);
        Ok(previous)
    }

    fn placement_jitter(&mut self) -> Point {
        let (min, max) = (self.config.jitter_min, self.config.jitter_max);
        Point::new(self.rng.gen_range(min..max), self.rng.gen_range(min..max))
    }

    // === Render updates ===

    fn emit_window(&mut self, id: &str) {
        if let Some(state) = self.window_state(id) {
            self.updates.push(RenderUpdate::Window(state));
        }
    }

    fn emit_focus_change(&mut self, id: &str, previous: Option<String>) {
        if let Some(previous) = previous {
            self.emit_window(&previous);
        }
        self.emit_window(id);
    }

    fn set_snap_preview(&mut self, preview: Option<Rectangle>) {
        if self.snap_preview != preview {
            self.snap_preview = preview;
            self.updates.push(RenderUpdate::SnapPreview { rect: preview });
        }
    }

    fn absorb(op: &str, result: ShellResult<()>) {
        if let Err(e) = result {
            debug!("{} ignored: {}", op, e);
        }
    }
}
