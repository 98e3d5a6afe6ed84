//! Window registry and state store
//!
//! One record per registered window id. The registry only checks
//! existence; geometry legality belongs to the layout engine.

use std::collections::HashMap;

use log::debug;

use super::{Point, Rectangle, Size};
use crate::error::{ShellError, ShellResult};
use crate::render::WindowMode;

/// State of a single registered window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord {
    /// Stable identifier assigned at registration
    pub id: String,

    /// Window is attached to the surface and receives input
    pub is_open: bool,

    /// Window is drawn (false after close or minimize)
    pub visible: bool,

    /// Stored top-left corner; stale while maximized
    pub position: Point,

    /// Explicit size, unset until the first resize
    pub size: Option<Size>,

    /// Maximized mode flag
    pub is_maximized: bool,

    /// Origin captured right before a drag or maximize
    pub last_position: Option<Point>,

    /// Size captured right before a drag or maximize
    pub last_size: Option<Size>,

    /// Geometry currently displayed
    pub frame: Rectangle,

    /// Last stacking value assigned by focus
    pub z_index: Option<u64>,
}

impl WindowRecord {
    fn new(id: &str, default_size: Size) -> Self {
        Self {
            id: id.to_string(),
            is_open: false,
            visible: false,
            position: Point::default(),
            size: None,
            is_maximized: false,
            last_position: None,
            last_size: None,
            frame: Rectangle::from_loc_and_size(Point::default(), default_size),
            z_index: None,
        }
    }

    pub fn mode(&self) -> WindowMode {
        if self.is_maximized {
            WindowMode::Maximized
        } else {
            WindowMode::Normal
        }
    }

    /// Whether the window still sits at the origin default
    pub fn is_unplaced(&self) -> bool {
        self.position == Point::default()
    }

    /// Remember the displayed frame for a later restore
    pub fn snapshot_frame(&mut self) {
        self.last_position = Some(self.frame.origin());
        self.last_size = Some(self.frame.size());
    }

    /// Snapshot taken before the last drag or maximize, if complete
    pub fn snapshot(&self) -> Option<Rectangle> {
        match (self.last_position, self.last_size) {
            (Some(position), Some(size)) => Some(Rectangle::from_loc_and_size(position, size)),
            _ => None,
        }
    }
}

/// Process-lifetime store of window records
#[derive(Debug, Clone)]
pub struct WindowRegistry {
    windows: HashMap<String, WindowRecord>,

    /// Registration order, for deterministic iteration
    order: Vec<String>,

    default_size: Size,
}

impl WindowRegistry {
    pub fn new(default_size: Size) -> Self {
        Self {
            windows: HashMap::new(),
            order: Vec::new(),
            default_size,
        }
    }

    /// Create a record with default state; existing ids are left untouched
    pub fn register(&mut self, id: &str) -> &WindowRecord {
        if !self.windows.contains_key(id) {
            self.windows
                .insert(id.to_string(), WindowRecord::new(id, self.default_size));
            self.order.push(id.to_string());
            debug!("Registered window {}", id);
        }
        &self.windows[id]
    }

    pub fn get(&self, id: &str) -> ShellResult<&WindowRecord> {
        self.windows
            .get(id)
            .ok_or_else(|| ShellError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> ShellResult<&mut WindowRecord> {
        self.windows
            .get_mut(id)
            .ok_or_else(|| ShellError::NotFound(id.to_string()))
    }

    /// Records in registration order
    pub fn records(&self) -> impl Iterator<Item = &WindowRecord> {
        self.order.iter().filter_map(|id| self.windows.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_creates_defaults() {
        let mut registry = WindowRegistry::new(Size::new(600.0, 400.0));
        let record = registry.register("notes");

        assert_eq!(record.id, "notes");
        assert!(!record.is_open);
        assert!(!record.visible);
        assert_eq!(record.position, Point::new(0.0, 0.0));
        assert_eq!(record.size, None);
        assert!(!record.is_maximized);
        assert_eq!(record.last_position, None);
        assert_eq!(record.last_size, None);
        assert_eq!(record.frame, Rectangle::new(0.0, 0.0, 600.0, 400.0));
    }

    #[test]
    fn test_register_twice_keeps_existing_record() {
        let mut registry = WindowRegistry::new(Size::new(600.0, 400.0));
        registry.register("notes");
        registry.get_mut("notes").unwrap().is_open = true;

        let record = registry.register("notes");
        assert!(record.is_open);
        assert_eq!(registry.records().count(), 1);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let registry = WindowRegistry::new(Size::new(600.0, 400.0));
        assert_eq!(
            registry.get("ghost").unwrap_err(),
            ShellError::NotFound("ghost".to_string())
        );
        assert_eq!(registry.records().count(), 0);
    }

    #[test]
    fn test_iteration_follows_registration_order() {
        let mut registry = WindowRegistry::new(Size::new(600.0, 400.0));
        for id in ["terminal", "about-me", "phone"] {
            registry.register(id);
        }

        let ids: Vec<&str> = registry.records().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["terminal", "about-me", "phone"]);
        assert_eq!(registry.records().count(), 3);
    }

    #[test]
    fn test_snapshot_requires_both_halves() {
        let mut registry = WindowRegistry::new(Size::new(600.0, 400.0));
        registry.register("notes");
        let record = registry.get_mut("notes").unwrap();

        record.last_position = Some(Point::new(10.0, 40.0));
        assert_eq!(record.snapshot(), None);

        record.snapshot_frame();
        assert_eq!(record.snapshot(), Some(record.frame));
    }
}
