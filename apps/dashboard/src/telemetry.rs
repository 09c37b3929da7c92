use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes structured logging for a binary. `RUST_LOG`, when it parses as
/// a full filter directive, wins over `default_level`.
pub fn init(binary: &str, default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={default_level},{binary}={default_level},tower_http={default_level}",
                env!("CARGO_CRATE_NAME")
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
