//! Daemon entry point (spec §4.M). A separate binary from the CLI scanner
//! since the broker consumer is a long-running process with its own
//! lifecycle, not one of the four CLI input modes in spec.md §6.

use api_hunter::config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::new("info")).with_target(false).init();

    let amqp_url = std::env::var("AMQP_URL").unwrap_or_else(|_| "amqp://127.0.0.1:5672/%2f".to_string());
    let queue = std::env::var("AMQP_QUEUE").unwrap_or_else(|_| "api-hunter-scans".to_string());
    let config = RuntimeConfig::from_env();

    api_hunter::daemon::run(&amqp_url, &queue, config).await
}
