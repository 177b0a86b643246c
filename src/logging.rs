use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Initialise the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. `logging.format` selects
/// `json` (default) or `pretty` output.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}
