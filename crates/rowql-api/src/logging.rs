//! Logging for rowql
//!
//! A running query never fails; the engine degrades and says so through
//! `tracing` instead. Unknown comparison operators and unimplemented
//! join kinds are warn-level events; a join skipped for lack of a
//! secondary row set is a debug-level one. [`LogConfig`] routes those
//! events to stdout, to a daily-rotated file, or to both.
//!
//! A bare level name such as `"debug"` applies to the rowql crates
//! only, so turning the engine up does not also turn up the host
//! application's other dependencies. A set `RUST_LOG` wins over the
//! configured level.

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, registry, util::SubscriberInitExt, EnvFilter};

/// Filter applied when neither `RUST_LOG` nor the configured level
/// parses.
const FALLBACK_DIRECTIVE: &str = "rowql=info,rowql_core=info";

/// Where log output goes
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Standard output
    Stdout,
    /// A daily-rotated file
    File(std::path::PathBuf),
    /// Standard output and a daily-rotated file
    Both(std::path::PathBuf),
}

/// Log line format
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Multi-line, colored, human-first output (default)
    Pretty,
    /// One line per event
    Compact,
}

/// Builds and installs the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level name or filter directive list (see [`LogConfig::with_level`])
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Line format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Info-level config writing to stdout.
    pub fn info() -> Self {
        Self {
            level: "info".to_string(),
            ..Default::default()
        }
    }

    /// Debug-level config; adds the engine's skipped-work events.
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            ..Default::default()
        }
    }

    /// Warn-level config; degradations only.
    pub fn warn() -> Self {
        Self {
            level: "warn".to_string(),
            ..Default::default()
        }
    }

    /// Send output to a daily-rotated file instead of stdout.
    pub fn with_file<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Send output to stdout and a daily-rotated file.
    pub fn with_both<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Choose the line format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the level (`"trace"` through `"error"`), or pass a full
    /// filter directive list (anything containing `=` or `,`) to
    /// address targets beyond the rowql crates.
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// The `EnvFilter` directive list for the configured level.
    ///
    /// Bare level names are scoped to the rowql crates; strings that
    /// already contain directives pass through untouched.
    fn directive(&self) -> String {
        if self.level.contains('=') || self.level.contains(',') {
            self.level.clone()
        } else {
            format!("rowql={0},rowql_core={0}", self.level)
        }
    }

    fn rolling_writer(path: &std::path::Path) -> (NonBlocking, WorkerGuard) {
        let directory = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("rowql.log");
        tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name))
    }

    /// Install this configuration as the global subscriber.
    ///
    /// Returns the file writer's guard when a file sink is involved.
    /// Hold it for as long as the program logs; dropping it flushes the
    /// buffer and stops the background writer.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rowql::logging::LogConfig;
    ///
    /// // Keep the guard alive for the lifetime of your application.
    /// let _guard = LogConfig::info().init();
    /// ```
    pub fn init(self) -> Option<WorkerGuard> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.directive()))
            .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE));

        match self.output {
            LogOutput::Stdout => {
                let layer = fmt::layer();
                match self.format {
                    LogFormat::Pretty => registry().with(filter).with(layer.pretty()).init(),
                    LogFormat::Compact => registry().with(filter).with(layer.compact()).init(),
                }
                None
            }
            LogOutput::File(path) => {
                let (writer, guard) = Self::rolling_writer(&path);
                let layer = fmt::layer().with_writer(writer);
                match self.format {
                    LogFormat::Pretty => registry().with(filter).with(layer.pretty()).init(),
                    LogFormat::Compact => registry().with(filter).with(layer.compact()).init(),
                }
                Some(guard)
            }
            LogOutput::Both(path) => {
                let (writer, guard) = Self::rolling_writer(&path);
                // One format for both sinks; mixing formats would need
                // boxed layers.
                registry()
                    .with(filter)
                    .with(fmt::layer())
                    .with(fmt::layer().with_writer(writer))
                    .init();
                Some(guard)
            }
        }
    }
}
