//! Output formatting for the CLI.
//!
//! Human output goes to the terminal with `console` styling; in JSON mode
//! only structured documents are printed and status lines are suppressed.

use catalog_data::{Notification, Severity};
use console::{style, StyledObject, Term};
use serde::Serialize;

/// Fallback when the terminal size is unknown (pipes, CI).
const DEFAULT_WIDTH: usize = 120;

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warn,
    Debug,
}

impl Tone {
    fn marker(self) -> StyledObject<&'static str> {
        match self {
            Tone::Info => style("ℹ").blue(),
            Tone::Success => style("✓").green(),
            Tone::Warn => style("⚠").yellow(),
            Tone::Debug => style("→").dim(),
        }
    }
}

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stdout(),
        }
    }

    fn line(&self, tone: Tone, msg: &str) {
        if self.json {
            return;
        }
        match tone {
            Tone::Info | Tone::Success => println!("{} {}", tone.marker(), msg),
            Tone::Warn => eprintln!("{} {}", tone.marker(), msg),
            Tone::Debug if self.verbose => eprintln!("{} {}", tone.marker(), style(msg).dim()),
            Tone::Debug => {}
        }
    }

    pub fn info(&self, msg: &str) {
        self.line(Tone::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line(Tone::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Tone::Warn, msg);
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        self.line(Tone::Debug, msg);
    }

    /// Errors are printed in both modes.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Print a document as pretty JSON.
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(err) => self.error(&format!("Failed to encode output: {}", err)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// One line per notification the controller raised.
    pub fn notification(&self, notification: &Notification) {
        self.kv(
            &severity_badge(notification.severity),
            &format!("{}: {}", notification.title, notification.message),
        );
    }

    /// Fixed-width row, cut to the terminal width.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let cells: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| {
                console::pad_str(col, *width, console::Alignment::Left, Some("…")).into_owned()
            })
            .collect();
        let row = format!("  {}", cells.join("  "));
        println!("{}", console::truncate_str(&row, self.term_width(), "…"));
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn term_width(&self) -> usize {
        self.term
            .size_checked()
            .map_or(DEFAULT_WIDTH, |(_, cols)| cols as usize)
    }
}

/// Colored label for a notification severity.
pub fn severity_badge(severity: Severity) -> String {
    let label = match severity {
        Severity::Success => style("success").green(),
        Severity::Info => style("info").blue(),
        Severity::Warning => style("warning").yellow(),
        Severity::Error => style("error").red(),
    };
    label.to_string()
}
