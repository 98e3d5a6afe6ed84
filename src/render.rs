//! Render adapter
//!
//! The window manager never draws. It queues [`RenderUpdate`] records
//! describing the desired on-screen state, and a [`RenderSink`] applies
//! them to whatever surface is in use.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::window::{Rectangle, WindowMenu};

/// Display mode of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    Normal,
    Maximized,
}

/// Desired on-screen state of a single window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    pub id: String,
    pub frame: Rectangle,
    pub mode: WindowMode,
    pub visible: bool,
    pub z_index: Option<u64>,
    pub active: bool,
}

/// One desired-state change emitted by the window manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderUpdate {
    /// Geometry, mode, visibility or stacking of a window changed
    Window(WindowState),
    /// Snap preview overlay shown at `rect`, or hidden
    SnapPreview { rect: Option<Rectangle> },
    /// Window menu shown, or dismissed
    WindowMenu { menu: Option<WindowMenu> },
}

/// Applies render updates to a surface
pub trait RenderSink {
    fn apply(&mut self, update: &RenderUpdate) -> Result<()>;

    fn apply_all(&mut self, updates: &[RenderUpdate]) -> Result<()> {
        for update in updates {
            self.apply(update)?;
        }
        Ok(())
    }
}

/// Writes each update as one JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn apply(&mut self, update: &RenderUpdate) -> Result<()> {
        serde_json::to_writer(&mut self.writer, update).context("Failed to encode render update")?;
        self.writer
            .write_all(b"\n")
            .context("Failed to write render update")?;
        self.writer.flush().context("Failed to flush render output")?;
        Ok(())
    }
}

/// Logs each update instead of drawing it
#[derive(Debug, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn apply(&mut self, update: &RenderUpdate) -> Result<()> {
        match update {
            RenderUpdate::Window(state) => info!(
                "🪟 {} {:?} visible={} active={} at ({:.0}, {:.0}) {}x{} z={:?}",
                state.id,
                state.mode,
                state.visible,
                state.active,
                state.frame.x,
                state.frame.y,
                state.frame.width,
                state.frame.height,
                state.z_index
            ),
            RenderUpdate::SnapPreview { rect } => info!("Snap preview: {:?}", rect),
            RenderUpdate::WindowMenu { menu: Some(menu) } => {
                info!("📋 Window menu for {} at ({:.0}, {:.0})", menu.window_id, menu.position.x, menu.position.y)
            }
            RenderUpdate::WindowMenu { menu: None } => info!("📋 Window menu dismissed"),
        }
        Ok(())
    }
}

/// Keeps every applied update, for inspection
#[derive(Debug, Default)]
pub struct MemorySink {
    pub updates: Vec<RenderUpdate>,
}

impl RenderSink for MemorySink {
    fn apply(&mut self, update: &RenderUpdate) -> Result<()> {
        debug!("Render update: {:?}", update);
        self.updates.push(update.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> WindowState {
        WindowState {
            id: "notes".to_string(),
            frame: Rectangle::new(0.0, 28.0, 1280.0, 772.0),
            mode: WindowMode::Maximized,
            visible: true,
            z_index: Some(101),
            active: true,
        }
    }

    #[test]
    fn test_json_lines_sink_writes_one_line_per_update() -> Result<()> {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.apply_all(&[
            RenderUpdate::Window(sample_state()),
            RenderUpdate::SnapPreview { rect: None },
        ])?;

        let output = String::from_utf8(sink.into_inner())?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(first["kind"], "window");
        assert_eq!(first["id"], "notes");
        assert_eq!(first["mode"], "maximized");
        assert_eq!(first["frame"]["width"], 1280.0);

        let second: serde_json::Value = serde_json::from_str(lines[1])?;
        assert_eq!(second["kind"], "snap_preview");
        assert!(second["rect"].is_null());

        Ok(())
    }

    #[test]
    fn test_memory_sink_keeps_updates_in_order() -> Result<()> {
        let mut sink = MemorySink::default();
        sink.apply(&RenderUpdate::WindowMenu { menu: None })?;
        sink.apply(&RenderUpdate::Window(sample_state()))?;

        assert_eq!(sink.updates.len(), 2);
        assert!(matches!(sink.updates[1], RenderUpdate::Window(_)));
        Ok(())
    }
}
