//! Tracing initialisation shared by the binary and integration tests.
//!
//! Call [`init_logging`] once near process start; it wires a daily-rolling
//! file sink (and optionally a stderr mirror) into the global subscriber.
//! Repeat calls are no-ops that hand back the originally resolved log path.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Options passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Component name, used for the log file name and default directory.
    pub app: &'static str,
    /// Explicit log directory. When `None`, `LINKSCOUT_LOG_DIR` is consulted
    /// and then `~/.local/share/<app>`.
    pub dir: Option<PathBuf>,
    /// Mirror events to stderr in addition to the file sink.
    pub mirror_stderr: bool,
    /// Emit JSON instead of plain text.
    pub json: bool,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            app: "linkscout",
            dir: None,
            mirror_stderr: false,
            json: false,
            default_filter: "info",
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns the log file path for the current day.
pub fn init_logging(options: LogOptions) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(options.app, options.dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let file_name = format!("{}.log", options.app);
    let today = Local::now().format("%Y-%m-%d").to_string();
    let full_path = dir.join(&today).join(&file_name);

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, file_name));
    let _ = LOG_GUARD.set(guard);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_filter));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![filter.boxed()];
    layers.push(if options.json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    });
    if options.mirror_stderr {
        layers.push(if options.json {
            fmt::layer().json().with_writer(io::stderr).boxed()
        } else {
            fmt::layer().with_writer(io::stderr).boxed()
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

fn resolve_log_dir(app: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }
    if let Ok(env_dir) = std::env::var("LINKSCOUT_LOG_DIR") {
        return expand_home(Path::new(&env_dir));
    }
    default_data_dir(app)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app: &str) -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share").join(app)
    } else {
        PathBuf::from(".").join(app)
    }
}
