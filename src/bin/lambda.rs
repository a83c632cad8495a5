//! AWS Lambda entry point for the site corpus scraper
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! Invoke with `{ "url": "...", "community_id": 1 }`.

use lambda_runtime::{Error as LambdaError, service_fn};
use site_corpus::lambda::handler;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Site corpus Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}
