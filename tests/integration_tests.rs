//! Integration tests for deskshell
//!
//! These tests drive the shell end to end: configuration loading, the line
//! protocol, pointer gestures and the render updates a surface would see.

use anyhow::Result;
use std::io::Write;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

use deskshell::{
    config::ShellConfig,
    input::{KeyEvent, PointerEvent, PointerTarget},
    render::{JsonLinesSink, MemorySink, RenderUpdate, WindowMode},
    shell::{DesktopShell, LineOutcome},
    window::{Point, Rectangle},
    RenderSink,
};

fn shell() -> Result<DesktopShell> {
    DesktopShell::with_seed(ShellConfig::default(), 11)
}

fn lines(outcome: LineOutcome) -> Vec<String> {
    match outcome {
        LineOutcome::Continue(lines) => lines,
        LineOutcome::Quit => panic!("unexpected quit"),
    }
}

/// Test a full session driven through the line protocol
#[test]
fn test_line_protocol_session() -> Result<()> {
    let mut shell = shell()?;

    shell.handle_line(":open terminal")?;
    let output = lines(shell.handle_line("open documents")?);
    assert_eq!(output[0], "[guest@localhost ~]$ open documents");
    assert_eq!(output[1], "Opening Documents folder...");
    assert_eq!(shell.windows().active_window_id(), Some("documents-folder"));

    shell.handle_line(":snap documents-folder left")?;
    shell.handle_line(":focus terminal")?;
    shell.handle_line(":key Super+Right")?;

    let terminal = shell.windows().window("terminal").unwrap();
    assert_eq!(terminal.frame, Rectangle::new(640.0, 28.0, 640.0, 772.0));
    let documents = shell.windows().window("documents-folder").unwrap();
    assert_eq!(documents.frame, Rectangle::new(0.0, 28.0, 640.0, 772.0));
    assert!(terminal.z_index > documents.z_index);

    assert_eq!(shell.handle_line(":quit")?, LineOutcome::Quit);
    Ok(())
}

/// Test that bad directives are reported without touching state
#[test]
fn test_bad_directives_are_errors() -> Result<()> {
    let mut shell = shell()?;
    shell.handle_line(":open phone")?;
    shell.drain_updates();

    assert!(shell.handle_line(":snap phone sideways").is_err());
    assert!(shell.handle_line(":viewport wide tall").is_err());
    assert!(shell.drain_updates().is_empty());

    // Unknown ids are absorbed by the window manager
    lines(shell.handle_line(":max nowhere")?);
    assert!(shell.drain_updates().is_empty());
    Ok(())
}

/// Test dragging a window by its title bar into the left snap zone
#[test]
fn test_pointer_drag_snaps_window() -> Result<()> {
    let mut shell = shell()?;
    shell.windows_mut().open_window("about-me");
    let start = shell.windows().window("about-me").unwrap().frame;
    let t0 = Instant::now();

    shell.handle_pointer(PointerEvent::Down {
        target: PointerTarget::Header("about-me".into()),
        position: Point::new(start.x + 40.0, start.y + 8.0),
        at: t0,
    });
    shell.handle_pointer(PointerEvent::Move {
        position: Point::new(300.0, 300.0),
        at: t0 + Duration::from_millis(150),
    });
    shell.handle_pointer(PointerEvent::Move {
        position: Point::new(45.0, 300.0),
        at: t0 + Duration::from_millis(300),
    });
    shell.handle_pointer(PointerEvent::Up {
        target: PointerTarget::Desktop,
        position: Point::new(45.0, 300.0),
        at: t0 + Duration::from_millis(350),
    });

    let record = shell.windows().window("about-me").unwrap();
    assert_eq!(record.frame, Rectangle::new(0.0, 28.0, 640.0, 772.0));
    assert!(!record.is_maximized);
    assert!(shell.windows().gesture().is_idle());
    Ok(())
}

/// Test the desired-state stream a renderer receives
#[test]
fn test_render_updates_reach_sink() -> Result<()> {
    let mut shell = shell()?;
    shell.handle_line(":open phone")?;
    shell.handle_key(&KeyEvent::press("Up", &["Super"]));

    let mut sink = MemorySink::default();
    shell.flush(&mut sink)?;

    let last = sink.updates.last().expect("updates emitted");
    match last {
        RenderUpdate::Window(state) => {
            assert_eq!(state.id, "phone");
            assert_eq!(state.mode, WindowMode::Maximized);
            assert_eq!(state.frame, Rectangle::new(0.0, 28.0, 1280.0, 772.0));
            assert!(state.active);
        }
        other => panic!("expected window update, got {:?}", other),
    }

    // Viewport changes re-measure the maximized window
    shell.handle_line(":viewport 1024 768")?;
    let mut json = JsonLinesSink::new(Vec::new());
    assert_eq!(shell.flush(&mut json)?, 1);

    let output = String::from_utf8(json.into_inner())?;
    let value: serde_json::Value = serde_json::from_str(output.trim())?;
    assert_eq!(value["kind"], "window");
    assert_eq!(value["frame"]["width"], 1024.0);
    assert_eq!(value["frame"]["height"], 740.0);
    Ok(())
}

/// Test that a configuration file drives the shell
#[test]
fn test_shell_from_config_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"
windows = ["editor", "music"]

[viewport]
width = 1000.0
height = 600.0

[window]
chrome_height = 32.0

[terminal]
user = "ada"
host = "engine"
"#
    )?;

    let config = ShellConfig::load(file.path())?;
    let mut shell = DesktopShell::with_seed(config, 5)?;

    let ids: Vec<&str> = shell.windows().windows().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, ["editor", "music"]);

    shell.handle_line(":open editor")?;
    shell.handle_line(":max editor")?;
    assert_eq!(
        shell.windows().window("editor").unwrap().frame,
        Rectangle::new(0.0, 32.0, 1000.0, 568.0)
    );

    let output = lines(shell.handle_line("whoami")?);
    assert_eq!(output[0], "[ada@engine ~]$ whoami");
    Ok(())
}

/// Test the sink trait object path used by the binary
#[test]
fn test_boxed_sink() -> Result<()> {
    let mut shell = shell()?;
    shell.handle_line(":open terminal")?;

    let mut sink: Box<dyn RenderSink> = Box::new(MemorySink::default());
    assert_eq!(shell.flush(sink.as_mut())?, 1);
    Ok(())
}
