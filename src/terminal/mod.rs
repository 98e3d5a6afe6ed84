//! Terminal panel
//!
//! A small command interpreter with scrollback and shell-like history.
//! `open <target>` is the one command that reaches into the window
//! manager; everything else only prints.

use chrono::Local;
use log::debug;

use crate::clock::format_date;
use crate::config::{OpenTarget, TerminalConfig};
use crate::window::WindowManager;

const HELP: &[&str] = &[
    "Available commands:",
    "- help: Show this help message",
    "- clear: Clear the terminal",
    "- date: Show current date and time",
    "- ls: List directory contents",
    "- whoami: Show current user",
    "- open [file/folder]: Open file manager",
    "- about me: Show user information",
    "- job: Show job information",
];

const LISTING: &[&str] = &["Documents/", "Downloads/", "Pictures/", "readme.txt"];

/// Result of running one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutput {
    /// Nothing was entered
    Empty,
    /// Scrollback was wiped
    Cleared,
    /// Prompt echo followed by the command's output
    Lines(Vec<String>),
}

impl TerminalOutput {
    pub fn lines(&self) -> &[String] {
        match self {
            TerminalOutput::Lines(lines) => lines,
            _ => &[],
        }
    }
}

pub struct Terminal {
    config: TerminalConfig,
    scrollback: Vec<String>,
    history: Vec<String>,
    /// Equal to `history.len()` when not navigating
    history_index: usize,
}

impl Terminal {
    pub fn new(config: &TerminalConfig) -> Self {
        Self {
            config: config.clone(),
            scrollback: Vec::new(),
            history: Vec::new(),
            history_index: 0,
        }
    }

    pub fn prompt(&self) -> String {
        format!("[{}@{} ~]$", self.config.user, self.config.host)
    }

    pub fn scrollback(&self) -> &[String] {
        &self.scrollback
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Run one command line, appending its echo and output to the scrollback
    pub fn execute(&mut self, input: &str, windows: &mut WindowManager) -> TerminalOutput {
        let command = input.trim();
        if command.is_empty() {
            return TerminalOutput::Empty;
        }

        self.history.push(command.to_string());
        self.history_index = self.history.len();
        debug!("Terminal command: {}", command);

        let mut lines = vec![format!("{} {}", self.prompt(), command)];
        match command.to_lowercase().as_str() {
            "clear" => {
                self.scrollback.clear();
                return TerminalOutput::Cleared;
            }
            "help" => lines.extend(HELP.iter().map(|line| line.to_string())),
            "date" => lines.push(format_date(&Local::now())),
            "ls" => lines.extend(LISTING.iter().map(|line| line.to_string())),
            "whoami" => lines.push(self.config.display_name.clone()),
            "about me" => lines.extend(self.config.about.iter().cloned()),
            "job" => lines.extend(self.config.job.iter().cloned()),
            _ => lines.push(self.open_or_unknown(command, windows)),
        }

        self.scrollback.extend(lines.iter().cloned());
        TerminalOutput::Lines(lines)
    }

    /// Configured targets match case-insensitively; the `open ` prefix of
    /// an unknown target does not, so `OPEN x` is an unknown command
    fn open_or_unknown(&self, command: &str, windows: &mut WindowManager) -> String {
        let lowered = command.to_lowercase();
        if let Some(found) = lowered
            .strip_prefix("open ")
            .and_then(|target| self.find_target(target))
        {
            windows.open_window(&found.window);
            return format!("Opening {}...", found.label);
        }

        match command.strip_prefix("open ") {
            Some(target) => format!("File or directory not found: {}", target),
            None => format!("Command not found: {}", command),
        }
    }

    fn find_target(&self, target: &str) -> Option<&OpenTarget> {
        self.config.open_targets.iter().find(|candidate| {
            candidate
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(target))
        })
    }

    /// Step back through history; `None` leaves the input line unchanged
    pub fn history_up(&mut self) -> Option<&str> {
        if self.history_index == 0 {
            return None;
        }
        self.history_index -= 1;
        self.history.get(self.history_index).map(String::as_str)
    }

    /// Step forward through history; past the newest entry the line is empty
    pub fn history_down(&mut self) -> &str {
        if self.history_index + 1 < self.history.len() {
            self.history_index += 1;
            &self.history[self.history_index]
        } else {
            self.history_index = self.history.len();
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use crate::layout::Viewport;
    use anyhow::Result;

    fn setup() -> Result<(Terminal, WindowManager)> {
        let mut windows =
            WindowManager::with_seed(&WindowConfig::default(), Viewport::new(1280.0, 800.0), 1)?;
        windows.register("documents-folder");
        windows.register("home-folder");
        Ok((Terminal::new(&TerminalConfig::default()), windows))
    }

    #[test]
    fn test_echo_and_help() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;
        let output = terminal.execute("  help ", &mut windows);

        let lines = output.lines();
        assert_eq!(lines[0], "[guest@localhost ~]$ help");
        assert_eq!(lines[1], "Available commands:");
        assert_eq!(lines.len(), 1 + HELP.len());
        assert_eq!(terminal.scrollback(), lines);
        Ok(())
    }

    #[test]
    fn test_commands_are_case_insensitive() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;
        let output = terminal.execute("WhoAmI", &mut windows);
        assert_eq!(output.lines()[0], "[guest@localhost ~]$ WhoAmI");
        assert_eq!(output.lines()[1], "Guest");

        let output = terminal.execute("About Me", &mut windows);
        assert_eq!(output.lines()[1], "Name: Guest");
        Ok(())
    }

    #[test]
    fn test_open_known_target_opens_window() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;

        let output = terminal.execute("open documents/", &mut windows);
        assert_eq!(output.lines()[1], "Opening Documents folder...");
        assert!(windows.window("documents-folder").unwrap().is_open);
        assert_eq!(windows.active_window_id(), Some("documents-folder"));

        terminal.execute("open ~", &mut windows);
        assert!(windows.window("home-folder").unwrap().is_open);
        Ok(())
    }

    #[test]
    fn test_unknown_commands() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;

        let output = terminal.execute("open secrets", &mut windows);
        assert_eq!(output.lines()[1], "File or directory not found: secrets");

        let output = terminal.execute("rm -rf /", &mut windows);
        assert_eq!(output.lines()[1], "Command not found: rm -rf /");

        // Bare `open` has no target
        let output = terminal.execute("open", &mut windows);
        assert_eq!(output.lines()[1], "Command not found: open");
        Ok(())
    }

    #[test]
    fn test_open_prefix_case_rules() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;

        // Known targets match whatever the case
        let output = terminal.execute("OPEN Documents", &mut windows);
        assert_eq!(output.lines()[1], "Opening Documents folder...");
        assert!(windows.window("documents-folder").unwrap().is_open);

        // Unknown targets only count as `open` with the lowercase prefix
        let output = terminal.execute("OPEN secrets", &mut windows);
        assert_eq!(output.lines()[1], "Command not found: OPEN secrets");

        let output = terminal.execute("open Secrets", &mut windows);
        assert_eq!(output.lines()[1], "File or directory not found: Secrets");
        Ok(())
    }

    #[test]
    fn test_clear_empties_scrollback() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;
        terminal.execute("ls", &mut windows);
        assert_eq!(terminal.scrollback().len(), 1 + LISTING.len());

        assert_eq!(terminal.execute("clear", &mut windows), TerminalOutput::Cleared);
        assert!(terminal.scrollback().is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_input_is_not_recorded() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;
        assert_eq!(terminal.execute("   ", &mut windows), TerminalOutput::Empty);
        assert!(terminal.history().is_empty());
        assert!(terminal.scrollback().is_empty());
        Ok(())
    }

    #[test]
    fn test_history_navigation() -> Result<()> {
        let (mut terminal, mut windows) = setup()?;
        assert_eq!(terminal.history_up(), None);

        terminal.execute("ls", &mut windows);
        terminal.execute("date", &mut windows);
        terminal.execute("job", &mut windows);

        assert_eq!(terminal.history_up(), Some("job"));
        assert_eq!(terminal.history_up(), Some("date"));
        assert_eq!(terminal.history_up(), Some("ls"));
        assert_eq!(terminal.history_up(), None);

        assert_eq!(terminal.history_down(), "date");
        assert_eq!(terminal.history_down(), "job");
        assert_eq!(terminal.history_down(), "");
        assert_eq!(terminal.history_up(), Some("job"));
        Ok(())
    }
}
