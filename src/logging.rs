//! Tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SCINTFIBER_LOG";

/// Install the global subscriber; later calls do nothing.
///
/// `SCINTFIBER_LOG` takes an `EnvFilter` directive such as
/// `scintfiber=debug` or `scintfiber::sipm=debug,scintfiber=info`.
/// Unset or invalid values fall back to `scintfiber=info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("scintfiber=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_line_number(true))
            .with(filter)
            .init();
    });
}
