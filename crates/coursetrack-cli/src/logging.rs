// Logging setup

use tracing::Level;

/// Effective log level: `-q` wins over `-v`, both over the configured level
pub fn resolve_level(configured: &str, verbose: bool, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    if verbose {
        return Level::DEBUG;
    }
    configured.parse().unwrap_or(Level::INFO)
}

/// Install the fmt subscriber on stderr, keeping stdout for command output
pub fn init_logging(configured: &str, verbose: bool, quiet: bool) -> Level {
    let level = resolve_level(configured, verbose, quiet);
    // Already installed when called twice, e.g. from tests
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    level
}
