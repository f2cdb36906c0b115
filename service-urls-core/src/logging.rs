//! Logging for service URL parsing.
//!
//! Parsing emits `tracing` events at dispatch points. Events carry the
//! service, scheme and URL length but never the URL itself, since URLs
//! usually embed credentials.
//!
//! # Environment Variables
//!
//! - `SERVICE_URLS_DEBUG=true` - Enable debug logging
//! - `SERVICE_URLS_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `SERVICE_URLS_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use service_urls_core::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "SERVICE_URLS_DEBUG";
const LEVEL_VAR: &str = "SERVICE_URLS_LOG_LEVEL";
const FORMAT_VAR: &str = "SERVICE_URLS_LOG_FORMAT";

/// Check if debug logging is enabled via `SERVICE_URLS_DEBUG`.
///
/// Accepts "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `SERVICE_URLS_LOG_LEVEL`.
///
/// Defaults to "debug" if `SERVICE_URLS_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    env::var(LEVEL_VAR)
        .map(|level| match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        })
        .unwrap_or(fallback)
}

/// Get the configured log format from `SERVICE_URLS_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var(FORMAT_VAR)
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize logging. Subsequent calls are no-ops.
///
/// Nothing is installed unless `SERVICE_URLS_DEBUG` or
/// `SERVICE_URLS_LOG_LEVEL` is set. Without the `tracing-subscriber` feature
/// the caller is expected to install their own subscriber.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "service_urls={},service_urls_core={},service_urls_services={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            // try_init: another subscriber may already be installed by the host.
            let installed = match get_log_format() {
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                "pretty" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "service-urls logging initialized"
                );
            }
        }
    });
}

/// Debug logging gated on `SERVICE_URLS_DEBUG` at runtime.
#[macro_export]
macro_rules! service_urls_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            $crate::tracing::debug!($($arg)*);
        }
    };
}
