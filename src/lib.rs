pub mod clock;
pub mod config;
pub mod controller;
pub mod csv_loader;
pub mod debounce;
pub mod dispatcher;
pub mod feature_extractor;
pub mod gesture_buffer;
pub mod gesture_classifier;
pub mod hid;
pub mod pose_stream;
pub mod types;

use tracing_subscriber::EnvFilter;

/// Inicializa `tracing`. `RUST_LOG` manda; si no está, `verbose` sube a debug.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "aerotouch=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}
