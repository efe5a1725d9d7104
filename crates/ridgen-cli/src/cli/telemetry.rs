//! Log output for the `ridgen` binary.
//!
//! Minted identifiers go to stdout; everything logged here goes to stderr so
//! the two never interleave in a pipe. The level is taken from `RUST_LOG`
//! and defaults to `info`.

use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt,
};

pub fn init_telemetry(json: bool) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_timer(ChronoLocal::rfc_3339())
                    .with_file(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_timer(ChronoLocal::rfc_3339())
                    .with_file(true)
                    .with_writer(std::io::stderr)
                    .pretty(),
            )
            .try_init()?;
    }

    Ok(())
}
