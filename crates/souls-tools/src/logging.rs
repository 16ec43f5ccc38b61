//! Log setup for the tools
//!
//! Logs go to stderr so that listings and dumps on stdout can be piped.
//! Without `-v` the filter comes from `RUST_LOG`, falling back to `warn`.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
pub fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber
pub fn init(verbose: u8) {
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::new(verbosity_directive(verbose))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
