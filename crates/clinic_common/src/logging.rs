//! Logging utilities for the clinic scheduler.
//!
//! Every crate logs through `tracing`; this module only installs the
//! subscriber and offers a couple of helpers for logging results.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crate targets that receive the configured level.
const CLINIC_TARGETS: [&str; 6] = [
    "clinic_common",
    "clinic_slots",
    "clinic_api",
    "clinic_booking",
    "clinic_config",
    "clinic_cli",
];

/// Initialize the tracing subscriber from a level name such as `"debug"`.
///
/// Unknown names fall back to INFO.
///
/// # Examples
///
/// ```
/// use clinic_common::logging;
///
/// logging::init_from_str("info");
/// ```
pub fn init_from_str(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    init_with_level(level);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// When `RUST_LOG` is set its directives decide alone; otherwise the clinic
/// crates log at `level`. Calling this more than once is harmless.
pub fn init_with_level(level: Level) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = clinic_filter(level, rust_log.as_deref());

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

fn clinic_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        return EnvFilter::new(directives);
    }
    let mut filter = EnvFilter::default();
    for target in CLINIC_TARGETS {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Records a failure under `context` at ERROR.
pub fn log_error<E: std::fmt::Display>(err: E, context: &str) {
    error!(%err, "{}", context);
}

/// Records `outcome` (INFO on success, ERROR otherwise) and passes it on
/// unchanged.
pub fn log_result<T, E: std::fmt::Display>(
    outcome: Result<T, E>,
    on_success: &str,
    on_failure: &str,
) -> Result<T, E> {
    if let Err(err) = &outcome {
        log_error(err, on_failure);
    } else {
        info!("{}", on_success);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_overrides_configured_level() {
        let filter = clinic_filter(Level::INFO, Some("warn")).to_string();
        assert!(filter.contains("warn"), "{}", filter);
        assert!(!filter.contains("clinic_booking"));
    }

    #[test]
    fn test_configured_level_applies_without_rust_log() {
        for rust_log in [None, Some("  ")] {
            let filter = clinic_filter(Level::DEBUG, rust_log).to_string();
            for target in CLINIC_TARGETS {
                assert!(filter.contains(&format!("{}=debug", target)), "{}", filter);
            }
        }
    }
}
