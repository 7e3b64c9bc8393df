use std::io;

use miette::{IntoDiagnostic, WrapErr};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// The filter directives used when `RUST_LOG` isn't set.
const DEFAULT_FILTER: &str = "dictionaryapi=info,dictionaryapi_cli=info";

/// Initializes the global subscriber, logging to stderr either in JSON or in a human readable
/// format.
pub fn try_init(json: bool) -> miette::Result<()> {
    let json_layer = json.then(|| fmt::layer().json().with_writer(io::stderr));
    let stderr_layer = (!json).then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("could not init registry")?;

    debug!("tracing initialized");

    Ok(())
}
