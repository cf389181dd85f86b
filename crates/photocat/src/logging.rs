//! Logging initialization.
//!
//! Log output goes to stderr; stdout is reserved for `list` and `export`
//! data. `RUST_LOG` overrides the configured level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem at `level`, as JSON or pretty text.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section.
///
/// `--verbose` raises the level to at least debug; `--json-logs` forces JSON.
pub fn init_from_config(
    config: &photocat_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    init(
        effective_level(&config.logging.level, verbose_override),
        json_logs_override || config.logging.format == "json",
    );
}

fn effective_level(configured: &str, verbose: bool) -> &str {
    if verbose && configured != "trace" {
        "debug"
    } else {
        configured
    }
}
