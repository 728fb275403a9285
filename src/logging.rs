//! Log setup for a hook process and the context handed to every component.

use std::env;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable selecting where log output goes
pub const LOG_TARGET_ENV: &str = "NETHOOK_LOG_TARGET";

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "libvirt_nethook=debug,warn";

/// Per-process logging context, built once in `main` and passed down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    ident: String,
    attended: bool,
}

impl LogContext {
    pub fn new(ident: impl Into<String>, attended: bool) -> Self {
        Self {
            ident: ident.into(),
            attended,
        }
    }

    /// Attended means stdout is a terminal, i.e. someone runs the hook by hand
    pub fn detect(ident: impl Into<String>) -> Self {
        Self::new(ident, io::stdout().is_terminal())
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn is_unattended(&self) -> bool {
        !self.attended
    }

    pub fn event_prefix(&self, network: &str, action: &str) -> String {
        format!("network=\"{}\"/action=\"{}\": ", network, action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Syslog,
    Stderr,
    File(PathBuf),
}

impl From<&str> for LogTarget {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | "syslog" | "journald" => LogTarget::Syslog,
            "stderr" | "stdout" => LogTarget::Stderr,
            path => LogTarget::File(PathBuf::from(path)),
        }
    }
}

/// Logging is configured from the environment so it is ready before the
/// arguments are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub target: LogTarget,
    pub ident: String,
}

impl LogSettings {
    pub fn from_env(ident: impl Into<String>) -> Self {
        let target = env::var(LOG_TARGET_ENV)
            .map(|v| LogTarget::from(v.as_str()))
            .unwrap_or(LogTarget::Syslog);
        Self {
            target,
            ident: ident.into(),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer and must live until exit.
pub fn init(settings: &LogSettings) -> Option<WorkerGuard> {
    let subscriber = tracing_subscriber::registry().with(env_filter());

    match &settings.target {
        LogTarget::Syslog => match tracing_journald::layer() {
            Ok(journald) => {
                let subscriber =
                    subscriber.with(journald.with_syslog_identifier(settings.ident.clone()));
                set_global(subscriber);
                None
            }
            Err(e) => {
                // No journald socket, e.g. inside a container
                let subscriber = subscriber.with(stderr_layer());
                set_global(subscriber);
                tracing::debug!("journald unavailable, logging to stderr: {}", e);
                None
            }
        },
        LogTarget::Stderr => {
            set_global(subscriber.with(stderr_layer()));
            None
        }
        LogTarget::File(path) => {
            let (directory, file_name) = split_log_path(path);
            let file_appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let subscriber = subscriber.with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            );
            set_global(subscriber);
            Some(guard)
        }
    }
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer().with_ansi(false).with_writer(io::stderr)
}

fn set_global<S>(subscriber: S)
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn split_log_path(path: &Path) -> (PathBuf, PathBuf) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("libvirt-nethook.log"));
    (directory, file_name)
}
