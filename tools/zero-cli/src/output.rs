//! Terminal output for the CLI.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warn,
    Error,
    Debug,
}

impl Level {
    fn prefix(self) -> StyledObject<&'static str> {
        match self {
            Level::Info => style(" zero ").black().on_cyan(),
            Level::Success => style("  ok  ").black().on_green(),
            Level::Warn => style(" warn ").black().on_yellow(),
            Level::Error => style(" err  ").black().on_red(),
            Level::Debug => style("  ..  ").dim(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Warn | Level::Error | Level::Debug)
    }
}

/// Writes user-facing messages, or stays quiet in `--json` mode so the
/// only stdout content is the final report.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn print(&self, level: Level, msg: &str) {
        if self.json || (level == Level::Debug && !self.verbose) {
            return;
        }
        let line = format!("{} {}", level.prefix(), msg);
        if level.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn badge(&self, msg: &str) {
        self.print(Level::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.print(Level::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.print(Level::Warn, msg);
    }

    /// Report a failure. In JSON mode this is `{"error": ...}` on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            self.print(Level::Error, &style(msg).red().to_string());
        }
    }

    pub fn debug(&self, msg: &str) {
        self.print(Level::Debug, &style(msg).dim().to_string());
    }

    /// An indented `key value` detail line.
    pub fn kv(&self, key: &str, value: &str) {
        self.print(Level::Info, &format!("{:<8}{}", style(key).dim(), value));
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(err) => tracing::error!(error = %err, "failed to serialize report"),
        }
    }

    /// Progress bar over `len` steps; hidden in JSON mode.
    pub fn progress(&self, len: u64, msg: &str) -> ProgressBar {
        self.bar(ProgressBar::new(len), BAR_TEMPLATE, msg)
    }

    pub fn spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.bar(ProgressBar::new_spinner(), SPINNER_TEMPLATE, msg);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn bar(&self, pb: ProgressBar, template: &str, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        if let Ok(style) = ProgressStyle::with_template(template) {
            pb.set_style(style.progress_chars("=> "));
        }
        pb.set_message(msg.to_string());
        pb
    }
}

/// Size in the largest unit that keeps the value at or above one.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in UNITS[1..].iter().copied() {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }
    format!("{:.2} {}", size, unit)
}
