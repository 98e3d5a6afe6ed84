//! Layout engine
//!
//! Pure geometry for discrete window commands and gesture constraints:
//! snap halves, the maximized frame, drag clamping and snap zones, and
//! anchor-preserving resize. Nothing in here touches window state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{ViewportConfig, WindowConfig};
use crate::window::{Point, Rectangle, Size};

/// Current viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<&ViewportConfig> for Viewport {
    fn from(config: &ViewportConfig) -> Self {
        Self::new(config.width, config.height)
    }
}

/// Screen half a window can be snapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapSide {
    Left,
    Right,
}

impl FromStr for SnapSide {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(SnapSide::Left),
            "right" => Ok(SnapSide::Right),
            other => anyhow::bail!("Unknown snap direction: {}", other),
        }
    }
}

impl fmt::Display for SnapSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapSide::Left => write!(f, "left"),
            SnapSide::Right => write!(f, "right"),
        }
    }
}

/// Edge zone reached by a dragged window, in evaluation priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragZone {
    Snap(SnapSide),
    Maximize,
}

/// One of the eight resize handles on a window boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    N,
    E,
    S,
    W,
    NE,
    SE,
    SW,
    NW,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::N,
        ResizeDirection::E,
        ResizeDirection::S,
        ResizeDirection::W,
        ResizeDirection::NE,
        ResizeDirection::SE,
        ResizeDirection::SW,
        ResizeDirection::NW,
    ];

    pub fn moves_north(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }
}

impl FromStr for ResizeDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        ResizeDirection::ALL
            .into_iter()
            .find(|dir| format!("{:?}", dir).eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown resize direction: {}", s))
    }
}

/// Geometry rules parameterized by the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    viewport: Viewport,
    chrome_height: f64,
    snap_threshold: f64,
    min_size: Size,
}

impl LayoutEngine {
    pub fn new(config: &WindowConfig, viewport: Viewport) -> Self {
        Self {
            viewport,
            chrome_height: config.chrome_height,
            snap_threshold: config.snap_threshold,
            min_size: Size::new(config.min_width, config.min_height),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn chrome_height(&self) -> f64 {
        self.chrome_height
    }

    /// Frame of a window occupying one half of the screen below the chrome bar
    pub fn snap_rect(&self, side: SnapSide) -> Rectangle {
        let half = self.viewport.width / 2.0;
        let x = match side {
            SnapSide::Left => 0.0,
            SnapSide::Right => half,
        };
        Rectangle::new(x, self.chrome_height, half, self.usable_height())
    }

    /// Full-width frame pinned under the chrome bar
    pub fn maximized_rect(&self) -> Rectangle {
        Rectangle::new(0.0, self.chrome_height, self.viewport.width, self.usable_height())
    }

    fn usable_height(&self) -> f64 {
        (self.viewport.height - self.chrome_height).max(0.0)
    }

    /// Clamp a dragged window's top-left corner so it stays on screen
    ///
    /// The lower bound wins when the window is larger than the viewport.
    pub fn clamp_origin(&self, x: f64, y: f64, size: Size) -> Point {
        let x = x.min(self.viewport.width - size.width).max(0.0);
        let y = y
            .min(self.viewport.height - size.height)
            .max(self.chrome_height);
        Point::new(x, y)
    }

    /// Edge zone for a clamped drag position: left, then right, then top
    pub fn drag_zone(&self, origin: Point, size: Size) -> Option<DragZone> {
        if origin.x < self.snap_threshold {
            Some(DragZone::Snap(SnapSide::Left))
        } else if origin.x > self.viewport.width - self.snap_threshold - size.width {
            Some(DragZone::Snap(SnapSide::Right))
        } else if origin.y < self.snap_threshold + self.chrome_height {
            Some(DragZone::Maximize)
        } else {
            None
        }
    }

    /// Snap preview overlay for the pointer's horizontal position
    pub fn snap_preview(&self, pointer_x: f64) -> Option<Rectangle> {
        if pointer_x < self.snap_threshold {
            Some(self.snap_rect(SnapSide::Left))
        } else if pointer_x > self.viewport.width - self.snap_threshold {
            Some(self.snap_rect(SnapSide::Right))
        } else {
            None
        }
    }

    /// Apply a pointer delta to a start frame through one resize handle
    ///
    /// Dimensions are floored at the minimum size; west and north handles
    /// shift the origin so the opposite edge keeps its screen position.
    pub fn resize(&self, start: Rectangle, direction: ResizeDirection, dx: f64, dy: f64) -> Rectangle {
        let mut frame = start;

        if direction.moves_east() {
            frame.width = self.min_size.width.max(start.width + dx);
        }
        if direction.moves_south() {
            frame.height = self.min_size.height.max(start.height + dy);
        }
        if direction.moves_west() {
            frame.width = self.min_size.width.max(start.width - dx);
            frame.x = start.x + (start.width - frame.width);
        }
        if direction.moves_north() {
            frame.height = self.min_size.height.max(start.height - dy);
            frame.y = start.y + (start.height - frame.height);
        }

        frame
    }
}
