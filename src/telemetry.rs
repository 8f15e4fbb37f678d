use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Failure to set up logging. Reported on stderr; the command still runs.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("log filter {filter:?} is not a valid tracing directive")]
    InvalidFilter {
        filter: String,
        #[source]
        source: ParseError,
    },
    #[error("a global log subscriber is already installed")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Level used when `RUST_LOG` is unset.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "stratintel=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `log_level`.
/// Logs go to stderr so stdout stays clean for results.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(log_level).map_err(|source| TelemetryError::InvalidFilter {
                filter: log_level.to_string(),
                source,
            })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Install)
}
