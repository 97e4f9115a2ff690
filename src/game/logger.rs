//! Verbosity-gated match logger
//!
//! Subscribes to the event stream through the decision channel and prints,
//! captures, or drops each event depending on its category and the
//! configured [`VerbosityLevel`]. It never feeds anything back to the engine.

use crate::game::events::{DebugEvent, GameEvent};
use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Format a message only when verbose logging is compiled in
///
/// With the `verbose-logging` feature disabled this expands to nothing, so
/// high-volume events cost no `format!` allocation in benchmarks.
macro_rules! log_if_verbose {
    ($logger:expr, $level:expr, $category:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.log($level, Some($category), &format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = (&$logger, &$level, &$category);
        }
    };
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Verbosity level of this log entry
    pub level: VerbosityLevel,
    /// Rendered message (text or a JSON object, per the output format)
    pub message: String,
    /// Optional category (an event category, "controller_choice", "debug", ...)
    pub category: Option<String>,
}

/// Guard type that provides read-only access to log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized match logger
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    /// Print a state hash before each action request
    debug_state_hash: bool,
    /// Captured log entries
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            debug_state_hash: false,
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_debug_state_hash(&mut self, enabled: bool) {
        self.debug_state_hash = enabled;
    }

    pub fn debug_state_hash_enabled(&self) -> bool {
        self.debug_state_hash
    }

    /// Captured entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    #[inline]
    fn print(level: VerbosityLevel, message: &str) {
        if level <= VerbosityLevel::Minimal {
            println!("{message}");
        } else {
            println!("  {message}");
        }
    }

    /// Record one message at `level`
    ///
    /// Captured entries keep every level except Silent, so a test can read a
    /// complete transcript regardless of what stdout shows.
    pub fn log(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        if level == VerbosityLevel::Silent {
            return;
        }
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity;
        if !should_capture && !should_output {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }
        if should_output {
            Self::print(level, message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    /// Log a game event at its category's verbosity
    pub fn game_event(&self, event: &GameEvent) {
        let category = event.category();
        let level = category.min_verbosity();
        if level > VerbosityLevel::Minimal {
            if !self.is_capturing() && level > self.verbosity {
                return;
            }
            match self.output_format {
                OutputFormat::Text => {
                    log_if_verbose!(self, level, category.as_str(), "{}", event);
                }
                OutputFormat::Json => {
                    log_if_verbose!(self, level, category.as_str(), "{}", event_json(category.as_str(), event));
                }
            }
        } else {
            let message = match self.output_format {
                OutputFormat::Text => event.to_string(),
                OutputFormat::Json => event_json(category.as_str(), event),
            };
            self.log(level, Some(category.as_str()), &message);
        }
    }

    /// Engine diagnostics go out at Verbose
    pub fn debug_event(&self, event: &DebugEvent) {
        match self.output_format {
            OutputFormat::Text => {
                log_if_verbose!(self, VerbosityLevel::Verbose, "debug", "[debug] {}", event);
            }
            OutputFormat::Json => {
                let json = serde_json::json!({ "category": "debug", "event": event });
                log_if_verbose!(self, VerbosityLevel::Verbose, "debug", "{}", json);
            }
        }
    }

    /// Log a controller decision at Normal level
    ///
    /// The logged line names only the choice, not the controller kind, so
    /// transcripts match whichever controller made it. The kind goes to
    /// stderr when state-hash debugging is on.
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        if self.debug_state_hash {
            eprintln!("  >>> {controller_name}: {message}");
        }
        let message = match self.output_format {
            OutputFormat::Text => message.to_string(),
            OutputFormat::Json => {
                serde_json::json!({ "category": "controller_choice", "choice": message }).to_string()
            }
        };
        self.log(VerbosityLevel::Normal, Some("controller_choice"), &message);
    }

    /// State hash line printed before an action request
    pub fn state_hash(&self, hash: &str) {
        self.log(VerbosityLevel::Normal, Some("state_hash"), &format!("[STATE:{hash}]"));
    }
}

fn event_json(category: &str, event: &GameEvent) -> String {
    serde_json::json!({ "category": category, "event": event }).to_string()
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

/// Clones settings, not the captured buffer
impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            debug_state_hash: self.debug_state_hash,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}
