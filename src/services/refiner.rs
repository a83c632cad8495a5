// src/services/refiner.rs

//! Refinement service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::RefineConfig;

/// Turns a raw corpus into the text that gets stored.
#[async_trait]
pub trait Refiner: Send + Sync {
    async fn refine(&self, corpus: &str) -> Result<String>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    response: String,
}

/// Refiner backed by a text completion endpoint.
pub struct HttpRefiner {
    client: Client,
    endpoint: String,
    prompt: String,
}

impl HttpRefiner {
    pub fn new(config: &RefineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            prompt: config.prompt.clone(),
        })
    }
}

#[async_trait]
impl Refiner for HttpRefiner {
    async fn refine(&self, corpus: &str) -> Result<String> {
        let prompt = format!("{}{}", self.prompt, corpus);
        log::info!(
            "Requesting refinement of {} corpus bytes from {}",
            corpus.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&CompletionRequest { prompt: &prompt })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::refine(format!(
                "endpoint answered {status}: {body}"
            )));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::refine(format!("unexpected completion payload: {e}")))?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn config(endpoint: String) -> RefineConfig {
        RefineConfig {
            endpoint,
            prompt: "Keep the facts:\n".to_string(),
            ..RefineConfig::default()
        }
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_response_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ai/completion")
            .match_body(Matcher::Json(json!({
                "prompt": "Keep the facts:\nrent 1200\npets ok"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Rent is 1200. Pets allowed."}"#)
            .create_async()
            .await;

        let refiner =
            HttpRefiner::new(&config(format!("{}/api/ai/completion", server.url()))).unwrap();
        let refined = refiner.refine("rent 1200\npets ok").await.unwrap();

        assert_eq!(refined, "Rent is 1200. Pets allowed.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_refine_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let refiner = HttpRefiner::new(&config(format!("{}/", server.url()))).unwrap();
        let err = refiner.refine("x").await.unwrap_err();

        assert!(matches!(err, AppError::Refine(_)));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn missing_response_field_is_refine_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"text": "wrong shape"}"#)
            .create_async()
            .await;

        let refiner = HttpRefiner::new(&config(format!("{}/", server.url()))).unwrap();
        assert!(matches!(
            refiner.refine("x").await,
            Err(AppError::Refine(_))
        ));
    }
}
