use tracing_subscriber::EnvFilter;

/// Environment variable holding `tracing` filter directives.
pub const LOG_ENV: &str = "RESDEX_LOG";

/// Installs the stderr subscriber.
///
/// `RESDEX_LOG` wins over everything; otherwise `-v` selects debug output for the engine,
/// and the configured filter applies.
pub fn setup_tracing(verbose: bool, configured: &str) {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("resdex=debug,resdex_repository=debug,info")
		} else {
			EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("info"))
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
