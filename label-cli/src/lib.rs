//! Command-line front end for tracking-number check digits and shipping
//! label rendering.

pub mod commands;
pub mod config;

use tracing_subscriber::EnvFilter;

pub use config::AppConfig;

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `fallback` is used. Logs go to stderr
/// so command output on stdout stays machine-readable.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
