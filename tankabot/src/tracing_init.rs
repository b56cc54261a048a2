use tracing_subscriber::{fmt::time::OffsetTime, EnvFilter};

/// Local-time structured logging, the way a long-running batch process
/// wants it: no span-close noise, no exporter, just readable lines.
pub fn init() {
    let timer = OffsetTime::local_rfc_3339().unwrap_or_else(|_| {
        OffsetTime::new(
            time::UtcOffset::UTC,
            time::macros::format_description!("[hour]:[minute]:[second]"),
        )
    });

    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_target(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::debug!("tracing initialised");
}
