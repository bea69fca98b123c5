//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::infrastructure::{resolve_data_dir, LOG_FILE};
use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: an [`EnvFilter`] plus a fmt layer writing to
/// `<data_dir>/portfolio-store.log` through a rotating [`FileWriter`].
///
/// The filter comes from `RUST_LOG` when set, else `config.trace_level`, else
/// `"info"`.
///
/// Best-effort and idempotent: if the data directory cannot be created, or a global
/// subscriber is already installed, this does nothing.
///
/// ```rust
/// use portfolio_store::observability::init_tracing;
/// use portfolio_store::Config;
///
/// let dir = std::env::temp_dir().join("portfolio-store-doc");
/// let config = Config {
///     data_dir: Some(dir.to_string_lossy().into_owned()),
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = resolve_data_dir(config);
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(FileWriter::new(data_dir.join(LOG_FILE)))
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
