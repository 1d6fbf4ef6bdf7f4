//! Logging bootstrap for binaries embedding the router

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use router_core::Error;

/// Install a global fmt subscriber filtered by `RUST_LOG` plus `default_directive`.
///
/// Fails when the directive does not parse or a subscriber is already set.
pub fn init(default_directive: &str) -> Result<(), Error> {
    let directive: Directive = default_directive
        .parse()
        .map_err(|e| Error::Config(format!("invalid log directive {default_directive:?}: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .try_init()
        .map_err(|e| Error::Config(format!("failed to install subscriber: {e}")))
}
