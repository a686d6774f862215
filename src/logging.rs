//! Logger setup shared by both binaries.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `verbose` lowers the default level from info to debug. `RUST_LOG`, when
/// set, takes precedence, e.g. `RUST_LOG=roamer::vehicle=trace`.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // A logger may already be installed by a test harness or by Bevy.
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}
