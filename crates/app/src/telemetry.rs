use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV: &str = "EXAM_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. `EXAM_LOG` wins over `RUST_LOG`.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| err.to_string())?;
    Ok(())
}
