//! Centralized logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing subscriber with environment variable support
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Logs always go to stderr so stdout stays free for reports.
///
/// # Examples
///
/// ```bash
/// # See every modified declaration
/// RUST_LOG=stubwright_lang_java=debug stubwright augment src/test/java/CircleTest.java --batch
/// ```
pub fn initialize(config: &AppConfig) {
    let log_level = config.logging.level.parse().unwrap_or(tracing::Level::WARN);

    // Create env filter (RUST_LOG takes precedence over config)
    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| parse_format(&f))
        .unwrap_or_else(|| config.logging.format.clone());

    // try_init: tests and embedding callers may already own a subscriber
    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}

fn parse_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

/// Create a span carrying the file being augmented
///
/// All logs emitted while the span is entered include `file`.
pub fn augment_span(file: &str) -> tracing::Span {
    tracing::info_span!("augment", file = %file)
}
