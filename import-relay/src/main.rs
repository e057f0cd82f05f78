//! Entry point for the GED import relay.

use tracing::info;
use tracing_subscriber::EnvFilter;

use import_relay::{Dependencies, RelayError};

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    dotenv::dotenv().ok();

    init_tracing(std::env::var("LOG_FORMAT").ok().as_deref());

    info!("Starting GED import relay");

    let deps = Dependencies::new()?;
    deps.orchestrator.run().await?;

    let snapshot = deps.metrics.snapshot();
    info!(
        received = snapshot.received,
        succeeded = snapshot.succeeded,
        already_exists = snapshot.already_exists,
        failures_published = snapshot.failures_published,
        "Relay stopped"
    );

    Ok(())
}

/// Initialize the subscriber, as JSON when `LOG_FORMAT=json`.
fn init_tracing(log_format: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if log_format_is_json(log_format) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn log_format_is_json(log_format: Option<&str>) -> bool {
    log_format.is_some_and(|value| value.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_selection() {
        assert!(log_format_is_json(Some("json")));
        assert!(log_format_is_json(Some("JSON")));
        assert!(!log_format_is_json(Some("plain")));
        assert!(!log_format_is_json(None));
    }
}
