// * Telemetry - Structured Logging
// * JSON logs for batch runs, a pretty formatter for interactive use

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const PRETTY_LEVEL: &str = "debug";

// * RUST_LOG wins over the fallback directive
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use entity_flow::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://example.com", "Processing page");
/// ```
pub fn init_tracing() {
    init_tracing_with_level(DEFAULT_LEVEL);
}

/// Initializes tracing with custom log level
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    tracing_subscriber::registry()
        .with(env_filter(PRETTY_LEVEL))
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .init();
}
