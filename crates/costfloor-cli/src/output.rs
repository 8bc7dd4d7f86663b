//! Output mode routing and status formatting.

use std::io::IsTerminal;

use owo_colors::OwoColorize;

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON output only
    Json,
    /// Plain text, stable for logs and scripts
    #[default]
    Plain,
    /// Human-friendly with colors (TTY only)
    Pretty,
}

impl OutputMode {
    /// Resolve output mode from flags and environment.
    ///
    /// Routing rules:
    /// 1. `--json` overrides everything
    /// 2. `NO_COLOR` or `TERM=dumb` forces plain
    /// 3. Pretty only when stdout is a TTY
    pub fn resolve(json_flag: bool, is_tty: bool, no_color: bool) -> Self {
        if json_flag {
            return Self::Json;
        }
        if no_color {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    /// Resolve against the real process environment.
    pub fn detect(json_flag: bool) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some()
            || std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false);
        Self::resolve(json_flag, std::io::stdout().is_terminal(), no_color)
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Status word for a result line, colored in pretty mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warn,
    Err,
}

impl Status {
    fn text(&self) -> &'static str {
        match self {
            Self::Ok => "[OK]",
            Self::Warn => "[WARN]",
            Self::Err => "[ERR]",
        }
    }
}

/// Format `message` prefixed with a status badge.
pub fn badge(mode: OutputMode, status: Status, message: &str) -> String {
    if mode != OutputMode::Pretty {
        return format!("{} {}", status.text(), message);
    }
    let text = match status {
        Status::Ok => status.text().green().bold().to_string(),
        Status::Warn => status.text().yellow().bold().to_string(),
        Status::Err => status.text().red().bold().to_string(),
    };
    format!("{} {}", text, message)
}

/// Print a JSON value on stdout.
pub fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
