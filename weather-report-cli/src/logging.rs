use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset.
///
/// `quiet` is the level for zero `-v` flags: `warn` on the console so soft
/// failures are visible, `off` in the window so nothing is drawn over it.
pub fn default_directive(verbose: u8, quiet: &'static str) -> &'static str {
    match verbose {
        0 => quiet,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init(verbose: u8, quiet: &'static str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
