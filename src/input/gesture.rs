//! Gesture state machine
//!
//! A window is either idle, being dragged by its header, or being resized
//! through one handle. Only one gesture exists at a time; the sessions
//! carry everything the move handler needs to recompute geometry.

use std::time::Instant;

use crate::layout::ResizeDirection;
use crate::window::{Point, Rectangle};

/// Drag started on a window header
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub window_id: String,
    /// Pointer position relative to the window's top-left corner
    pub grab_offset: Point,
    pub started_at: Instant,
}

/// Resize started on one of the handles
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window_id: String,
    pub direction: ResizeDirection,
    pub start_pointer: Point,
    pub start_frame: Rectangle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Window the current gesture acts on
    pub fn window_id(&self) -> Option<&str> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(session) => Some(&session.window_id),
            GestureState::Resizing(session) => Some(&session.window_id),
        }
    }
}
