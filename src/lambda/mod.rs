// src/lambda/mod.rs

//! AWS Lambda handler for the scraper.
//!
//! This module provides the Lambda function entry point that:
//! 1. Crawls the requested site in a headless browser
//! 2. Sends the corpus to the refinement service
//! 3. Writes the refined text into the community record

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::models::{Config, ScrapeRequest};
use crate::pipeline::run_scrape;
use crate::services::HttpRefiner;
use crate::storage::SupabaseStore;

/// Lambda response payload.
#[derive(Debug, Default, Serialize)]
pub struct ScrapeLambdaResponse {
    /// Whether the scrape was successful
    pub success: bool,

    /// Status message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Record store answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,

    /// Error message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<ScrapeRequest>,
) -> std::result::Result<ScrapeLambdaResponse, LambdaError> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    info!(
        "Starting scrape: url={}, community_id={}",
        request.url, request.community_id
    );

    match scrape(&request).await {
        Ok(reply) => {
            let execution_time_ms = start.elapsed().as_millis() as u64;
            info!("Scrape completed in {}ms", execution_time_ms);
            Ok(ScrapeLambdaResponse {
                success: true,
                message: Some(reply.message),
                response: Some(reply.response),
                error: None,
                execution_time_ms,
            })
        }
        Err(e) => {
            error!("Scrape failed: {}", e);
            Ok(ScrapeLambdaResponse {
                success: false,
                error: Some(e.to_string()),
                execution_time_ms: start.elapsed().as_millis() as u64,
                ..Default::default()
            })
        }
    }
}

async fn scrape(request: &ScrapeRequest) -> Result<crate::models::ScrapeResponse> {
    let config = Arc::new(load_lambda_config()?);
    let refiner = HttpRefiner::new(&config.refine)?;
    let store = SupabaseStore::new(&config.store)?;

    run_scrape(config, request, &refiner, &store).await
}

/// Load configuration suitable for Lambda environment.
///
/// Reads `CONFIG_PATH` (default `config.toml`) when present, then applies
/// environment overrides.
fn load_lambda_config() -> Result<Config> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if std::path::Path::new(&path).exists() {
        Config::load(&path)?
    } else {
        Config::default()
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_omits_empty_fields() {
        let response = ScrapeLambdaResponse {
            error: Some("boom".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "boom");
        assert!(value.get("response").is_none());
    }
}
