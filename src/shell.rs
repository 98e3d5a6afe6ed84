//! Desktop shell
//!
//! Composes the window manager, key bindings and the terminal panel, and
//! interprets the line-oriented control protocol used by the binary:
//! plain lines are terminal commands, `:`-prefixed lines are directives.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use std::str::FromStr;
use std::time::Instant;

use crate::clock::clock_now;
use crate::config::ShellConfig;
use crate::input::{InputManager, KeyEvent, PointerEvent, PointerTarget, ShellAction};
use crate::layout::{SnapSide, Viewport};
use crate::render::{RenderSink, RenderUpdate};
use crate::terminal::{Terminal, TerminalOutput};
use crate::window::{MenuItem, Point, WindowManager};

/// Control directive given on a `:`-prefixed line
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Open(String),
    Close(String),
    Focus(String),
    Minimize(String),
    Maximize(String),
    Restore(String),
    Snap(String, SnapSide),
    Key(String),
    Menu(MenuItem),
    PointerDown(PointerTarget, Point),
    PointerMove(Point),
    PointerUp(PointerTarget, Point),
    Viewport(Viewport),
    Clock,
    State,
    Quit,
}

impl FromStr for Directive {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let body = line.trim().strip_prefix(':').unwrap_or(line).trim();
        let mut words = body.split_whitespace();
        let name = words.next().ok_or_else(|| anyhow!("Empty directive"))?;
        let args: Vec<&str> = words.collect();

        let id = |usage: &str| -> Result<String> {
            match args.as_slice() {
                [id] => Ok(id.to_string()),
                _ => bail!("Usage: {}", usage),
            }
        };

        let directive = match name {
            "open" => Directive::Open(id(":open <id>")?),
            "close" => Directive::Close(id(":close <id>")?),
            "focus" => Directive::Focus(id(":focus <id>")?),
            "min" => Directive::Minimize(id(":min <id>")?),
            "max" => Directive::Maximize(id(":max <id>")?),
            "restore" => Directive::Restore(id(":restore <id>")?),
            "snap" => match args.as_slice() {
                [id, side] => Directive::Snap(id.to_string(), side.parse()?),
                _ => bail!("Usage: :snap <id> left|right"),
            },
            "key" => match args.as_slice() {
                [combo] => Directive::Key(combo.to_string()),
                _ => bail!("Usage: :key <combo>"),
            },
            "menu" => match args.as_slice() {
                [item] => Directive::Menu(item.parse()?),
                _ => bail!("Usage: :menu minimize|maximize|close"),
            },
            "down" => match args.as_slice() {
                [target, x, y] => Directive::PointerDown(target.parse()?, parse_point(x, y)?),
                _ => bail!("Usage: :down <target> <x> <y>"),
            },
            "move" => match args.as_slice() {
                [x, y] => Directive::PointerMove(parse_point(x, y)?),
                _ => bail!("Usage: :move <x> <y>"),
            },
            "up" => match args.as_slice() {
                [target, x, y] => Directive::PointerUp(target.parse()?, parse_point(x, y)?),
                _ => bail!("Usage: :up <target> <x> <y>"),
            },
            "viewport" => match args.as_slice() {
                [width, height] => {
                    let width = parse_coordinate(width).context("Invalid viewport width")?;
                    let height = parse_coordinate(height).context("Invalid viewport height")?;
                    if width <= 0.0 || height <= 0.0 {
                        bail!("Viewport dimensions must be positive");
                    }
                    Directive::Viewport(Viewport::new(width, height))
                }
                _ => bail!("Usage: :viewport <width> <height>"),
            },
            "clock" => Directive::Clock,
            "state" => Directive::State,
            "quit" | "exit" => Directive::Quit,
            other => bail!("Unknown directive: :{}", other),
        };
        Ok(directive)
    }
}

fn parse_coordinate(value: &str) -> Result<f64> {
    let number: f64 = value
        .parse()
        .with_context(|| format!("Not a number: {}", value))?;
    if !number.is_finite() {
        bail!("Not a finite number: {}", value);
    }
    Ok(number)
}

fn parse_point(x: &str, y: &str) -> Result<Point> {
    Ok(Point::new(parse_coordinate(x)?, parse_coordinate(y)?))
}

/// What the caller should do after one input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Keep reading; print these lines
    Continue(Vec<String>),
    Quit,
}

pub struct DesktopShell {
    config: ShellConfig,
    windows: WindowManager,
    input: InputManager,
    terminal: Terminal,
}

impl DesktopShell {
    /// Build a shell and register every configured window
    pub fn new(config: ShellConfig) -> Result<Self> {
        let viewport = Viewport::from(&config.viewport);
        let windows = WindowManager::new(&config.window, viewport)?;
        Self::assemble(config, windows)
    }

    /// Same as [`DesktopShell::new`] with deterministic window placement
    pub fn with_seed(config: ShellConfig, seed: u64) -> Result<Self> {
        let viewport = Viewport::from(&config.viewport);
        let windows = WindowManager::with_seed(&config.window, viewport, seed)?;
        Self::assemble(config, windows)
    }

    fn assemble(config: ShellConfig, mut windows: WindowManager) -> Result<Self> {
        config.validate()?;
        info!("🏗️ Initializing desktop shell...");

        for id in &config.windows {
            windows.register(id);
        }
        debug!("🪟 Registered {} windows", config.windows.len());

        let input = InputManager::new(&config.bindings)?;
        let terminal = Terminal::new(&config.terminal);

        info!("✅ Desktop shell ready");
        Ok(Self {
            config,
            windows,
            input,
            terminal,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal {
        &mut self.terminal
    }

    /// Route a key event through the bindings; returns the action it ran
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<ShellAction> {
        let action = self.input.process_key_event(event)?;
        self.windows.execute_action(action);
        Some(action)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.windows.handle_pointer(event);
    }

    /// Top bar clock label
    pub fn clock(&self) -> String {
        clock_now()
    }

    /// Run a command line in the terminal panel
    pub fn run_command(&mut self, command: &str) -> TerminalOutput {
        self.terminal.execute(command, &mut self.windows)
    }

    /// Handle one line of the control protocol
    pub fn handle_line(&mut self, line: &str) -> Result<LineOutcome> {
        let trimmed = line.trim();
        if trimmed.starts_with(':') {
            let directive: Directive = trimmed.parse()?;
            return Ok(self.execute_directive(directive));
        }

        let lines = match self.run_command(trimmed) {
            TerminalOutput::Lines(lines) => lines,
            TerminalOutput::Cleared | TerminalOutput::Empty => Vec::new(),
        };
        Ok(LineOutcome::Continue(lines))
    }

    pub fn execute_directive(&mut self, directive: Directive) -> LineOutcome {
        debug!("Directive: {:?}", directive);
        match directive {
            Directive::Open(id) => self.windows.open_window(&id),
            Directive::Close(id) => self.windows.close_window(&id),
            Directive::Focus(id) => self.windows.focus_window(&id),
            Directive::Minimize(id) => self.windows.minimize_window(&id),
            Directive::Maximize(id) => self.windows.maximize_window(&id),
            Directive::Restore(id) => self.windows.restore_window(&id),
            Directive::Snap(id, side) => self.windows.snap_window(&id, side),
            Directive::Key(combo) => {
                if self.handle_key(&KeyEvent::parse_combo(&combo)).is_none() {
                    return LineOutcome::Continue(vec![format!("No binding for {}", combo)]);
                }
            }
            Directive::Menu(item) => self.windows.choose_menu_item(item),
            Directive::PointerDown(target, position) => self.handle_pointer(PointerEvent::Down {
                target,
                position,
                at: Instant::now(),
            }),
            Directive::PointerMove(position) => self.handle_pointer(PointerEvent::Move {
                position,
                at: Instant::now(),
            }),
            Directive::PointerUp(target, position) => self.handle_pointer(PointerEvent::Up {
                target,
                position,
                at: Instant::now(),
            }),
            Directive::Viewport(viewport) => self.windows.resize_viewport(viewport),
            Directive::Clock => return LineOutcome::Continue(vec![self.clock()]),
            Directive::State => return LineOutcome::Continue(self.state_lines()),
            Directive::Quit => return LineOutcome::Quit,
        }
        LineOutcome::Continue(Vec::new())
    }

    /// Clock line followed by one summary line per registered window
    pub fn state_lines(&self) -> Vec<String> {
        let active = self.windows.active_window_id();
        let windows = self
            .windows
            .windows()
            .map(|record| {
                let frame = record.frame;
                format!(
                    "{}{} open={} visible={} maximized={} frame=({:.0}, {:.0}, {:.0}x{:.0}) z={}",
                    if active == Some(record.id.as_str()) { "*" } else { "" },
                    record.id,
                    record.is_open,
                    record.visible,
                    record.is_maximized,
                    frame.x,
                    frame.y,
                    frame.width,
                    frame.height,
                    record
                        .z_index
                        .map(|z| z.to_string())
                        .unwrap_or_else(|| "-".to_string())
                )
            });
        std::iter::once(format!("clock {}", self.clock()))
            .chain(windows)
            .collect()
    }

    pub fn drain_updates(&mut self) -> Vec<RenderUpdate> {
        self.windows.drain_updates()
    }

    /// Hand every pending render update to `sink`; returns how many were sent
    pub fn flush(&mut self, sink: &mut dyn RenderSink) -> Result<usize> {
        let updates = self.windows.drain_updates();
        sink.apply_all(&updates)?;
        Ok(updates.len())
    }
}
