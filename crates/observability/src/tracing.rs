//! Tracing/logging initialization.
//!
//! Logs are JSON lines with timestamps. `RUST_LOG` overrides the default
//! directive (e.g. `RUST_LOG=laundrydesk_infra=debug,info`).

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `default_directive` is used when `RUST_LOG` is unset or unparsable.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .with_current_span(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_init_is_a_no_op() {
        super::init("warn");
        super::init("debug");
        ::tracing::info!("still logging after a second init");
    }
}
