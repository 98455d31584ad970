use anyhow::Result;
use std::io;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

pub const LOG_ENV: &str = "FILETOOLS_LOG";

/// Installs the stderr subscriber. `FILETOOLS_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "filetools=debug,filetools_core=debug"
    } else {
        "warn"
    }
}
