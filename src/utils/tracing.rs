use crate::config::APP_CONFIG;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
pub fn init_standard_tracing(crate_name: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(crate_name, &APP_CONFIG.log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().event_format(tracing_subscriber::fmt::format()))
        .init();
}

fn default_directives(crate_name: &str, level: &str) -> String {
    let mut targets = vec![crate_name, "mongo_provider", "mongodb", "tower_http"];
    targets.dedup();

    targets
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
