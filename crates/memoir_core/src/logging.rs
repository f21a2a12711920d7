//! Process-wide logging bootstrap and the journal's log line format.
//!
//! # Responsibility
//! - Start the rolling `memoir` file log once per process.
//! - Build metadata-only event lines for every core module.
//! - Record panics without their payload text.
//!
//! # Invariants
//! - Every line reads `event=<name> module=<module> status=<status>`
//!   followed by optional `key=value` fields.
//! - Captions, titles, tokens and media bytes are never logged; a panic
//!   payload is reduced to its kind and length.
//! - Repeating init with the same directory and level is a no-op.
//! - Switching directory or level after init is rejected.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter, Write as _};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "memoir";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const MAX_FIELD_CHARS: usize = 120;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Accepted log levels. `warning` parses as `Warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unsupported log level `{other}`; expected trace|debug|info|warn|error"
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// One structured log line.
///
/// Field values containing whitespace, quotes or `=` are quoted; line
/// breaks are flattened and long values truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    line: String,
}

impl LogEvent {
    pub fn new(event: &str, module: &str, status: &str) -> Self {
        Self {
            line: format!("event={event} module={module} status={status}"),
        }
    }

    pub fn field(mut self, key: &str, value: impl Display) -> Self {
        let _ = write!(self.line, " {key}={}", field_value(&value.to_string()));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl Display for LogEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}

fn field_value(raw: &str) -> String {
    let flat: String = raw
        .chars()
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
        .collect();
    let mut value: String = flat.chars().take(MAX_FIELD_CHARS).collect();
    if flat.chars().count() > MAX_FIELD_CHARS {
        value.push_str("...");
    }

    let needs_quotes =
        value.is_empty() || value.chars().any(|ch| ch.is_whitespace() || ch == '"' || ch == '=');
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "'"))
    } else {
        value
    }
}

struct ActiveLogger {
    level: LogLevel,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_matches(&self, level: LogLevel, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already writes to `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already runs at `{}`; refusing to switch to `{}`",
                self.level.as_str(),
                level.as_str()
            ));
        }
        Ok(())
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unknown `level`, or a blank or relative `log_dir`.
/// - The directory cannot be created or the backend fails to start.
/// - Logging is already active with a different directory or level.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = LogLevel::parse(level)?;
    let log_dir = absolute_dir(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(level, &log_dir))?;
    // Also covers a concurrent init that won with another config.
    active.ensure_matches(level, &log_dir)
}

/// `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level.as_str(), active.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        LogLevel::Debug.as_str()
    } else {
        LogLevel::Info.as_str()
    }
}

fn start_logger(level: LogLevel, log_dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| format!("invalid log level `{}`: {err}", level.as_str()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook();

    info!(
        "{}",
        LogEvent::new("logging_init", "logging", "ok")
            .field("level", level.as_str())
            .field("platform", std::env::consts::OS)
            .field("version", env!("CARGO_PKG_VERSION"))
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn absolute_dir(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = PathBuf::from(trimmed);
    if path.is_relative() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path)
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("{}", panic_event(&location, info.payload()));
        previous(info);
    }));
}

/// Panic payloads often embed entry text, so only their shape is kept.
fn panic_event(location: &str, payload: &(dyn Any + Send)) -> LogEvent {
    let (kind, chars) = if let Some(text) = payload.downcast_ref::<&str>() {
        ("str", text.chars().count())
    } else if let Some(text) = payload.downcast_ref::<String>() {
        ("string", text.chars().count())
    } else {
        ("opaque", 0)
    };

    LogEvent::new("panic_captured", "logging", "error")
        .field("location", location)
        .field("payload_kind", kind)
        .field("payload_chars", chars)
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, panic_event, LogEvent, LogLevel};

    #[test]
    fn level_parsing_accepts_aliases_and_rejects_unknown() {
        assert_eq!(LogLevel::parse(" WARNING ").expect("alias"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("Info").expect("mixed case"), LogLevel::Info);
        let error = LogLevel::parse("verbose").expect_err("unknown level");
        assert!(error.contains("verbose"));
    }

    #[test]
    fn event_line_has_fixed_prefix_then_fields() {
        let line = LogEvent::new("entry_save", "service", "ok")
            .field("photos", 3)
            .field("voice_note", false);
        assert_eq!(
            line.as_str(),
            "event=entry_save module=service status=ok photos=3 voice_note=false"
        );
    }

    #[test]
    fn event_fields_with_spaces_or_breaks_stay_on_one_quoted_token() {
        let line = LogEvent::new("object_delete", "storage", "error")
            .field("error", "permission denied\nat \"root\"")
            .field("bucket", "");
        assert_eq!(
            line.to_string(),
            "event=object_delete module=storage status=error \
             error=\"permission denied at 'root'\" bucket=\"\""
        );
    }

    #[test]
    fn long_field_values_are_truncated() {
        let line = LogEvent::new("x", "y", "ok").field("k", "a".repeat(500));
        assert!(line.as_str().ends_with("..."));
        assert!(line.as_str().len() < 200);
    }

    #[test]
    fn panic_event_never_carries_entry_text() {
        let caption = String::from("caption: Pumpkin patch with Sam\nsecret");
        let line = panic_event("src/service/entry_form.rs:42", &caption).to_string();
        assert!(!line.contains("Pumpkin"));
        assert!(!line.contains("secret"));
        assert!(line.starts_with("event=panic_captured module=logging status=error "));
        assert!(line.contains("payload_kind=string"));
        assert!(line.contains(&format!("payload_chars={}", caption.chars().count())));

        let title: &'static str = "Title: Beach day";
        let line = panic_event("unknown", &title).to_string();
        assert!(!line.contains("Beach"));
        assert!(line.contains("payload_kind=str payload_chars=16"));

        assert!(panic_event("unknown", &7_u8)
            .as_str()
            .ends_with("payload_kind=opaque payload_chars=0"));
    }

    #[test]
    fn init_is_idempotent_and_rejects_reconfiguration() {
        let first = tempfile::tempdir().expect("temp dir");
        let other = tempfile::tempdir().expect("temp dir");
        let first_path = first.path().to_str().expect("utf-8 temp path").to_string();
        let other_path = other.path().to_str().expect("utf-8 temp path").to_string();

        assert!(init_logging("info", "relative/logs").is_err());
        init_logging("info", &first_path).expect("first init");
        init_logging("INFO", &first_path).expect("same config again");

        let level_error = init_logging("debug", &first_path).expect_err("level change");
        assert!(level_error.contains("refusing to switch"));
        let dir_error = init_logging("info", &other_path).expect_err("directory change");
        assert!(dir_error.contains("refusing to switch"));

        let (level, dir) = logging_status().expect("logging active");
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
