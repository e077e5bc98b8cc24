use tracing_subscriber::{filter, fmt::layer, prelude::*, registry};

/// Logs to stderr; `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let env_filter = filter::EnvFilter::builder()
        .with_default_directive(filter::LevelFilter::INFO.into())
        .from_env_lossy();

    let fmt_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    registry().with(fmt_layer).init();
}
