//! Diagnostic logging setup.
//!
//! The library emits `tracing` events; the binary installs a stderr
//! subscriber whose level follows the `-v` / `-q` flags.

use tracing_subscriber::EnvFilter;

/// Map CLI verbosity flags to a filter directive.
pub fn level_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global stderr subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::new(format!(
        "{}={}",
        env!("CARGO_CRATE_NAME"),
        level_directive(verbose, quiet)
    ));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
