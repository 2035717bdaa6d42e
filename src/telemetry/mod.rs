//! Logging setup for DropoutShield
//!
//! Structured `tracing` output on stderr, human-readable by default or JSON
//! for log shippers. `RUST_LOG` always wins over the computed filter.

use tracing_subscriber::EnvFilter;

/// Filter directive for a configured level adjusted by `-v`/`-q`
///
/// Each `-v` raises the crate's own level one step above the configured
/// one; quiet mode only lets errors through.
pub fn filter_directive(configured_level: &str, verbose: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let configured = configured_level.to_ascii_lowercase();
    let base = LEVELS.iter().position(|l| *l == configured).unwrap_or(2);
    let crate_level = LEVELS[(base + verbose as usize).min(LEVELS.len() - 1)];
    format!("{}={},{}", env!("CARGO_CRATE_NAME"), crate_level, LEVELS[base])
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(directive: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
