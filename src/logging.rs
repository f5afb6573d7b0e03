//! Logging infrastructure - structured tracing for arena events
//!
//! Design: the allocator only emits `tracing` events; installing a
//! subscriber is left to the embedding program. With no subscriber the
//! events cost a branch, so the hot paths stay silent by default.
//! - Configurable level, JSON or human-readable output
//! - Console or file output
//! - Idempotent initialization

use std::io;
use std::path::Path;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::MakeWriter},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingSection;

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Keeps the file writer flushing for the life of the process
static FILE_GUARD: Mutex<Option<WorkerGuard>> = parking_lot::const_mutex(None);

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Log file path (stdout when unset)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // BUMP_ARENA_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level) = std::env::var("BUMP_ARENA_LOG_LEVEL") {
            config.level = parse_level(&level);
        }

        // BUMP_ARENA_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("BUMP_ARENA_LOG_FILE") {
            config.log_path = Some(path);
        }

        config.json_format = std::env::var("BUMP_ARENA_LOG_JSON").is_ok();
        config.show_spans = std::env::var("BUMP_ARENA_LOG_SPANS").is_ok();

        config
    }

    /// Verbose config for tracking down cursor misuse
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            log_path: None,
            json_format: false,
            show_spans: true,
        }
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            level: parse_level(&section.level),
            log_path: section.file.clone(),
            json_format: section.json,
            show_spans: section.spans,
        }
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call has an effect. If another global subscriber is
/// already installed, it is left in place.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("bump_arena={}", config.level.as_str().to_lowercase()))
        });

        let layer = match config.log_path.as_deref() {
            Some(path) => {
                let path = Path::new(path);
                let directory = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|name| name.to_os_string())
                    .unwrap_or_else(|| "bump_arena.log".into());

                let appender = tracing_appender::rolling::never(directory, file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                *FILE_GUARD.lock() = Some(guard);
                build_layer(writer, &config)
            }
            None => build_layer(io::stdout, &config),
        };

        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(env_filter)
            .try_init();
    });
}

fn build_layer<W>(writer: W, config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let span_events = if config.show_spans {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_span_events(span_events)
        .with_target(true)
        .with_thread_ids(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions));

    if config.json_format {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Arena events
// ============================================================================

/// Log arena construction
#[inline]
pub fn log_arena_created(start: *const u8, capacity: usize) {
    use tracing::debug;
    debug!(
        event = "arena_created",
        start = ?start,
        capacity_bytes = capacity,
        "Arena created"
    );
}

/// Log a request that did not fit
#[inline]
pub fn log_out_of_memory(requested: usize, align: usize, remaining: usize) {
    use tracing::trace;
    trace!(
        event = "out_of_memory",
        requested_bytes = requested,
        align = align,
        remaining_bytes = remaining,
        "Allocation does not fit"
    );
}

/// Log a checkpoint restore
#[inline]
pub fn log_restore(released: usize) {
    use tracing::trace;
    trace!(
        event = "restore",
        released_bytes = released,
        "Arena restored to checkpoint"
    );
}

/// Log compare-and-swap retries before a lock-free allocation landed
#[inline]
pub fn log_contention(retries: u32) {
    use tracing::trace;
    trace!(
        event = "cas_contention",
        retries = retries,
        "Lock-free allocation retried"
    );
}
