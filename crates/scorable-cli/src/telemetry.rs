//! Logging setup for the CLI.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the subscriber. `RUST_LOG` wins over `default_level`.
///
/// Logs go to stderr so stdout carries only the selection results.
pub fn init_telemetry(default_level: &str) {
    let default_filter = format!("{default_level},scorable_core={default_level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .ok();
}
