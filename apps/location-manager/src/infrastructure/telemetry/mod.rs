//! Tracing Integration
//!
//! Installs a `tracing-subscriber` registry with an env filter and a
//! formatting layer.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Filter directives (default adds `location_manager=info`)
//! - `LOG_FORMAT`: `json` for JSON lines, anything else for plain text
//!
//! # Usage
//!
//! ```ignore
//! use location_manager::infrastructure::telemetry;
//!
//! // Initialize at startup (returns guard that must be kept alive)
//! let _guard = telemetry::init();
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter directive for this crate.
const DEFAULT_DIRECTIVE: &str = "location_manager=info";

/// Returned by [`init`]. Reports whether this call installed the global
/// subscriber.
#[derive(Debug)]
pub struct TelemetryGuard {
    installed: bool,
}

impl TelemetryGuard {
    /// Whether this call installed the global subscriber.
    #[must_use]
    pub const fn installed(&self) -> bool {
        self.installed
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse format from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Output format.
    pub format: LogFormat,
    /// Directive applied on top of `RUST_LOG`.
    pub default_directive: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            default_directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::from_str_case_insensitive(&v))
            .unwrap_or_default();

        Self {
            format,
            ..Self::default()
        }
    }
}

/// Initialize telemetry with default configuration from environment.
#[must_use]
pub fn init() -> TelemetryGuard {
    init_with_config(&TelemetryConfig::from_env())
}

/// Initialize telemetry with custom configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
#[must_use]
pub fn init_with_config(config: &TelemetryConfig) -> TelemetryGuard {
    let mut env_filter = EnvFilter::from_default_env();
    match config.default_directive.parse() {
        Ok(directive) => env_filter = env_filter.add_directive(directive),
        Err(e) => eprintln!(
            "Ignoring invalid log directive '{}': {e}",
            config.default_directive
        ),
    }

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init()
            .is_ok(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()
            .is_ok(),
    };

    TelemetryGuard { installed }
}

// =============================================================================
// Tests
// =============================================================================
