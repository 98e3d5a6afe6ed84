//! # deskshell
//!
//! Runs the desktop shell headless, driven by lines on stdin:
//! - plain lines are terminal panel commands (`help`, `open documents`, ...)
//! - `:`-prefixed lines are window directives (`:open terminal`,
//!   `:snap phone left`, `:key Super+Up`, `:state`, `:quit`, ...)
//!
//! Render updates are printed as JSON lines with `--json`, otherwise logged.

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use deskshell::render::LogSink;
use deskshell::shell::LineOutcome;
use deskshell::{DesktopShell, JsonLinesSink, RenderSink, ShellConfig};

#[derive(Parser)]
#[command(name = "deskshell")]
#[command(about = "A desktop shell window manager driven from the command line")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/deskshell/deskshell.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Viewport width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Print render updates as JSON lines on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = ShellConfig::load(&cli.config);
    let debug = cli.debug || loaded.as_ref().map(|c| c.general.debug).unwrap_or(false);

    // Initialize logging
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    info!("🚀 Starting deskshell");
    info!("📄 Version: {}", deskshell::VERSION);

    // Load configuration
    let mut config = match loaded {
        Ok(config) => {
            info!("✅ Configuration loaded from: {}", cli.config);
            config
        }
        Err(e) => {
            error!("❌ Failed to load configuration: {}", e);
            info!("📝 Using default configuration");
            ShellConfig::default()
        }
    };

    // Override config with CLI flags
    if let Some(width) = cli.width {
        config.viewport.width = width;
    }
    if let Some(height) = cli.height {
        config.viewport.height = height;
    }

    let mut shell = DesktopShell::new(config)?;
    let mut sink: Box<dyn RenderSink> = if cli.json {
        Box::new(JsonLinesSink::new(std::io::stdout()))
    } else {
        Box::new(LogSink)
    };

    info!("✨ deskshell is ready, reading commands from stdin");
    run(&mut shell, sink.as_mut()).await?;

    info!("👋 deskshell shutting down");
    Ok(())
}

async fn run(shell: &mut DesktopShell, sink: &mut dyn RenderSink) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("📨 Received Ctrl+C, shutting down gracefully");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("📭 End of input");
                    break;
                };

                match shell.handle_line(&line) {
                    Ok(LineOutcome::Continue(output)) => {
                        for text in output {
                            println!("{}", text);
                        }
                    }
                    Ok(LineOutcome::Quit) => break,
                    Err(e) => warn!("⚠️ {}", e),
                }

                if let Err(e) = shell.flush(sink) {
                    error!("❌ Failed to apply render updates: {}", e);
                }
            }
        }
    }

    Ok(())
}
