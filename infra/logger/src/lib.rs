//! # Logger
//!
//! Global `tracing` subscriber for the `addrmeta` binaries.
//!
//! Diagnostics never share a stream with command output: the console layer
//! writes to **stderr**, and an optional daily-rolling file sink writes through
//! a non-blocking worker. `RUST_LOG` refines the configured level unless an
//! explicit directive string is given.
//!
//! ## Example
//!
//! ```rust
//! # use addrmeta_logger::{LevelFilter, LogFormat, Logger};
//!
//! let _logger = Logger::builder("addrmeta")
//!     .level(LevelFilter::DEBUG)
//!     .format(LogFormat::Json)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use sealed::Sink;
use std::io::IsTerminal;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;
const DEFAULT_KEEP: usize = 7;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Line format shared by every sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Sink state: console only.
#[derive(Debug)]
pub struct ConsoleOnly;

/// Sink state: console plus rolling files in a directory.
#[derive(Debug)]
pub struct Rolling {
    dir: PathBuf,
    rotation: Rotation,
    keep: usize,
}

mod sealed {
    pub trait Sink {}
}
impl Sink for ConsoleOnly {}
impl Sink for Rolling {}

/// Collects subscriber settings; [`LoggerBuilder::init`] installs them globally.
#[derive(Debug)]
pub struct LoggerBuilder<S: Sink = ConsoleOnly> {
    app: String,
    level: LevelFilter,
    directives: Option<String>,
    format: LogFormat,
    console: bool,
    sink: S,
}

impl<S: Sink> LoggerBuilder<S> {
    #[must_use = "Call .init() to install the subscriber"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Raises the level by `count` steps above the configured one, as `-v` flags do.
    #[must_use = "Call .init() to install the subscriber"]
    pub fn verbosity(mut self, count: u8) -> Self {
        self.level = raise(self.level, count);
        self
    }

    /// Uses `directives` (e.g. `addrmeta_resolver=debug`) instead of `RUST_LOG`.
    #[must_use = "Call .init() to install the subscriber"]
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    #[must_use = "Call .init() to install the subscriber"]
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use = "Call .init() to install the subscriber"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    fn filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.directives {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid directives '{directives}': {e}").into(),
                context: None,
            }),
        }
    }

    fn console_layer(&self) -> Option<BoxedLayer> {
        self.console.then(|| {
            let layer = fmt::layer().with_writer(std::io::stderr);
            match self.format {
                LogFormat::Json => layer.json().boxed(),
                LogFormat::Compact => layer.compact().with_ansi(std::io::stderr().is_terminal()).boxed(),
            }
        })
    }

    fn install(self, file: Option<BoxedLayer>, guard: Option<WorkerGuard>) -> Result<Logger, LoggerError> {
        if self.app.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Application name cannot be empty".into(),
                context: None,
            });
        }

        let filter = self.filter()?;
        let layers: Vec<BoxedLayer> = self.console_layer().into_iter().chain(file).collect();
        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Every sink is disabled".into(),
                context: Some(self.app.into()),
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        Ok(Logger { guard })
    }
}

impl LoggerBuilder<ConsoleOnly> {
    /// Also writes to daily files named `<app>.<date>.log` under `dir`.
    #[must_use = "Call .init() to install the subscriber"]
    pub fn files(self, dir: impl Into<PathBuf>) -> LoggerBuilder<Rolling> {
        LoggerBuilder {
            app: self.app,
            level: self.level,
            directives: self.directives,
            format: self.format,
            console: self.console,
            sink: Rolling { dir: dir.into(), rotation: Rotation::DAILY, keep: DEFAULT_KEEP },
        }
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    /// [`LoggerError::Subscriber`] when a global subscriber is already set,
    /// [`LoggerError::InvalidConfiguration`] for unusable settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.install(None, None)
    }
}

impl LoggerBuilder<Rolling> {
    #[must_use = "Call .init() to install the subscriber"]
    pub const fn keep(mut self, files: usize) -> Self {
        self.sink.keep = files;
        self
    }

    #[must_use = "Call .init() to install the subscriber"]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.sink.rotation = rotation;
        self
    }

    /// Installs the global subscriber and starts the file writer.
    ///
    /// Keep the returned [`Logger`] alive until exit so buffered lines reach disk.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.sink.keep == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "At least one log file must be kept".into(),
                context: Some(self.sink.dir.display().to_string().into()),
            });
        }

        std::fs::create_dir_all(&self.sink.dir).map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(format!("Cannot create {}", self.sink.dir.display()).into()),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.sink.rotation.clone())
            .filename_prefix(&self.app)
            .filename_suffix("log")
            .max_log_files(self.sink.keep)
            .build(&self.sink.dir)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        let file = match self.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.boxed(),
        };

        let console_only = LoggerBuilder {
            app: self.app,
            level: self.level,
            directives: self.directives,
            format: self.format,
            console: self.console,
            sink: ConsoleOnly,
        };
        console_only.install(Some(file), Some(guard))
    }
}

/// Owns the file writer of the installed subscriber.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts configuring the subscriber for the application `app`.
    pub fn builder(app: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            app: app.into(),
            level: DEFAULT_LEVEL,
            directives: None,
            format: LogFormat::Compact,
            console: true,
            sink: ConsoleOnly,
        }
    }

    /// Whether lines are also written to files.
    #[must_use]
    pub const fn has_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log files");
        }
    }
}

/// Parses a level name such as `"info"` or `"off"`.
pub fn parse_level(raw: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(raw.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Invalid log level '{raw}': {e}").into(),
        context: None,
    })
}

fn raise(level: LevelFilter, steps: u8) -> LevelFilter {
    const LADDER: [LevelFilter; 6] = [
        LevelFilter::OFF,
        LevelFilter::ERROR,
        LevelFilter::WARN,
        LevelFilter::INFO,
        LevelFilter::DEBUG,
        LevelFilter::TRACE,
    ];
    let current = LADDER.iter().position(|l| *l == level).unwrap_or(2);
    LADDER[(current + usize::from(steps)).min(LADDER.len() - 1)]
}
