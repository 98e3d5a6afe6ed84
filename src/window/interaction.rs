//! Interaction controller
//!
//! Pointer messages drive the gesture state machine of the window
//! manager. A pointer-down picks the gesture from its target (header →
//! drag, handle → resize), moves update geometry in delivery order, and a
//! pointer-up ends the gesture. Snap zones and top-edge maximize end a
//! drag early.

use log::debug;
use std::time::{Duration, Instant};

use super::{Point, WindowManager};
use crate::error::ShellResult;
use crate::input::gesture::{DragSession, GestureState, ResizeSession};
use crate::input::{PointerEvent, PointerTarget, WindowControl};
use crate::layout::{DragZone, ResizeDirection};

impl WindowManager {
    /// Feed one pointer message into the gesture state machine
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let result = match event {
            PointerEvent::Down {
                target,
                position,
                at,
            } => self.pointer_down(target, position, at),
            PointerEvent::Move { position, .. } => self.pointer_move(position),
            PointerEvent::Up { target, at, .. } => self.pointer_up(target, at),
        };
        Self::absorb("pointer event", result);
    }

    fn pointer_down(&mut self, target: PointerTarget, position: Point, at: Instant) -> ShellResult<()> {
        self.dismiss_window_menu();

        // A new gesture implicitly ends the previous one
        self.end_gesture(at)?;
        self.pressed_control = None;

        let Some(id) = target.window_id().map(str::to_string) else {
            return Ok(());
        };
        self.registry.get(&id)?;

        match target {
            PointerTarget::Header(_) => self.begin_drag(&id, position, at),
            PointerTarget::ResizeHandle(_, direction) => self.begin_resize(&id, direction, position),
            PointerTarget::Control(_, control) => {
                self.pressed_control = Some((id.clone(), control));
                self.try_focus(&id)
            }
            PointerTarget::WindowBody(_) => self.try_focus(&id),
            PointerTarget::Desktop => Ok(()),
        }
    }

    fn begin_drag(&mut self, id: &str, position: Point, at: Instant) -> ShellResult<()> {
        let double_click = Duration::from_millis(self.config.double_click_ms);
        let is_double_click = self
            .last_header_press
            .get(id)
            .map(|previous| at.saturating_duration_since(*previous) < double_click)
            .unwrap_or(false);

        if is_double_click {
            self.last_header_press.remove(id);
            debug!("Double click on header of {}", id);
            self.try_focus(id)?;
            return self.try_maximize(id);
        }
        self.last_header_press.insert(id.to_string(), at);

        let record = self.registry.get_mut(id)?;
        let grab_offset = Point::new(position.x - record.frame.x, position.y - record.frame.y);
        if !record.is_maximized {
            record.snapshot_frame();
        }

        self.gesture = GestureState::Dragging(DragSession {
            window_id: id.to_string(),
            grab_offset,
            started_at: at,
        });
        debug!("Drag started on {}", id);

        self.try_focus(id)
    }

    fn begin_resize(&mut self, id: &str, direction: ResizeDirection, position: Point) -> ShellResult<()> {
        let record = self.registry.get(id)?;
        if record.is_maximized {
            debug!("Ignoring resize of maximized window {}", id);
            return self.try_focus(id);
        }

        self.gesture = GestureState::Resizing(ResizeSession {
            window_id: id.to_string(),
            direction,
            start_pointer: position,
            start_frame: record.frame,
        });
        debug!("Resize {:?} started on {}", direction, id);

        self.try_focus(id)
    }

    fn pointer_move(&mut self, position: Point) -> ShellResult<()> {
        match self.gesture.clone() {
            GestureState::Idle => Ok(()),
            GestureState::Dragging(session) => self.drag_move(&session, position),
            GestureState::Resizing(session) => self.resize_move(&session, position),
        }
    }

    fn drag_move(&mut self, session: &DragSession, position: Point) -> ShellResult<()> {
        let id = session.window_id.as_str();
        let record = self.registry.get(id)?;
        let size = record.frame.size();
        let already_maximized = record.is_maximized;

        let origin = self.layout.clamp_origin(
            position.x - session.grab_offset.x,
            position.y - session.grab_offset.y,
            size,
        );

        match self.layout.drag_zone(origin, size) {
            Some(zone) => {
                self.gesture = GestureState::Idle;
                self.set_snap_preview(None);
                debug!("Drag of {} ended by {:?}", id, zone);
                match zone {
                    DragZone::Snap(side) => self.try_snap(id, side),
                    DragZone::Maximize if already_maximized => Ok(()),
                    DragZone::Maximize => self.try_maximize(id),
                }
            }
            None => {
                self.registry.get_mut(id)?.frame.set_origin(origin);
                self.emit_window(id);

                let preview = self.layout.snap_preview(position.x);
                self.set_snap_preview(preview);
                Ok(())
            }
        }
    }

    fn resize_move(&mut self, session: &ResizeSession, position: Point) -> ShellResult<()> {
        let dx = position.x - session.start_pointer.x;
        let dy = position.y - session.start_pointer.y;
        let frame = self
            .layout
            .resize(session.start_frame, session.direction, dx, dy);

        let record = self.registry.get_mut(&session.window_id)?;
        record.frame = frame;
        record.size = Some(frame.size());
        record.position = frame.origin();

        self.emit_window(&session.window_id);
        Ok(())
    }

    fn pointer_up(&mut self, target: PointerTarget, at: Instant) -> ShellResult<()> {
        self.end_gesture(at)?;

        if let Some((id, control)) = self.pressed_control.take() {
            if target == PointerTarget::Control(id.clone(), control) {
                self.click_control(&id, control);
            }
        }
        Ok(())
    }

    fn end_gesture(&mut self, at: Instant) -> ShellResult<()> {
        match std::mem::take(&mut self.gesture) {
            GestureState::Idle => Ok(()),
            GestureState::Dragging(session) => self.end_drag(&session, at),
            GestureState::Resizing(session) => {
                debug!("Resize ended on {}", session.window_id);
                Ok(())
            }
        }
    }

    fn end_drag(&mut self, session: &DragSession, at: Instant) -> ShellResult<()> {
        self.set_snap_preview(None);

        let click_threshold = Duration::from_millis(self.config.click_threshold_ms);
        let was_click = at.saturating_duration_since(session.started_at) < click_threshold;

        let record = self.registry.get_mut(&session.window_id)?;
        if record.is_maximized {
            // Position stays stale until the window is restored
            self.emit_window(&session.window_id);
            return Ok(());
        }
        record.position = record.frame.origin();

        // Micro-drags shorter than a click leave the window where it was
        if was_click {
            if let Some(last_position) = record.last_position {
                record.frame.set_origin(last_position);
                record.position = last_position;
            }
        }

        debug!(
            "Drag ended on {} at ({:.0}, {:.0})",
            session.window_id, record.position.x, record.position.y
        );
        self.emit_window(&session.window_id);
        Ok(())
    }

    fn click_control(&mut self, id: &str, control: WindowControl) {
        match control {
            WindowControl::Close => self.close_window(id),
            WindowControl::Maximize => self.maximize_window(id),
            WindowControl::Minimize => self.minimize_window(id),
        }
    }
}
