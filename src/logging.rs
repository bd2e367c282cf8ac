//! Structured logging configuration
//!
//! Provides:
//! - JSON or pretty output
//! - Console (stderr), rolling file, or both
//! - `RUST_LOG` taking precedence over the configured level
//!
//! Console logs always go to stderr so they never interleave with a report written to
//! standard output.

use crate::config::{LoggingConfig, PathsConfig};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

const LOG_FILE_NAME: &str = "runtime-condenser.log";

/// Initialize the logging system. The returned guard must be held until exit when
/// file output is enabled, or buffered file events are lost.
pub fn init_logging(logging: &LoggingConfig, paths: &PathsConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.output.as_str() {
        "file" => Some(init_file_logging(
            env_filter,
            &logging.format,
            &paths.log_directory,
        )),
        "both" => Some(init_combined_logging(
            env_filter,
            &logging.format,
            &paths.log_directory,
        )),
        _ => {
            init_console_logging(env_filter, &logging.format);
            None
        }
    }
}

fn init_console_logging(filter: EnvFilter, format: &str) {
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
                .ok();
        }
        _ => {
            subscriber
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_ansi(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .pretty(),
                )
                .try_init()
                .ok();
        }
    }
}

fn init_file_logging(filter: EnvFilter, format: &str, log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_current_span(true)
                        .with_span_list(true),
                )
                .try_init()
                .ok();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .try_init()
                .ok();
        }
    }

    guard
}

fn init_combined_logging(filter: EnvFilter, format: &str, log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init()
                .ok();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .try_init()
                .ok();
        }
    }

    guard
}

/// Fresh identifier attached to the span of a single condensing run
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}
