//! # Structured Logging Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//!
//! - Log level picked from the environment (`FLOWMAP_ENV`, `APP_ENV`, or
//!   `ImportConfig::environment`), overridable with `RUST_LOG`
//! - JSON output when `FLOWMAP_LOG_FORMAT=json`
//! - Domain macros (`log_import!`, `log_hierarchy!`) that stamp every event
//!   with an operation name and RFC3339 timestamp

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ImportConfig;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call repeatedly; only the first call installs a subscriber, and an
/// existing global subscriber is left in place.
pub fn init_structured_logging() {
    init_for_environment(get_environment());
}

/// Initialize structured logging for the environment named in `config`.
///
/// Same first-call-wins behaviour as [`init_structured_logging`].
pub fn init_structured_logging_with(config: &ImportConfig) {
    init_for_environment(config.environment.clone());
}

fn init_for_environment(environment: String) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let layer = if use_json_format() {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stdout()))
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
pub fn get_environment() -> String {
    std::env::var("FLOWMAP_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" => "warn",
        _ => "debug",
    }
}

fn use_json_format() -> bool {
    std::env::var("FLOWMAP_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log import pipeline operations.
#[macro_export]
macro_rules! log_import {
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}

/// Log hierarchy construction operations for a single node.
#[macro_export]
macro_rules! log_hierarchy {
    ($level:ident, $operation:expr, node_id: $node_id:expr, level: $node_level:expr $(, $key:ident: $value:expr)* $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            node_id = %$node_id,
            node_level = %$node_level,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}
