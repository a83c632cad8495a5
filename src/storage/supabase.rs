//! Supabase (PostgREST) record store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::{RecordUpdate, StoreConfig};
use crate::storage::RecordStore;

/// Updates one column of a row addressed by `id` through the REST API.
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
    column: String,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if !config.is_remote_configured() {
            return Err(AppError::config(
                "store.url and store.api_key (or SUPABASE_URL / SUPABASE_KEY) are required",
            ));
        }

        let header = |value: String| {
            HeaderValue::from_str(&value)
                .map_err(|e| AppError::config(format!("invalid store.api_key: {e}")))
        };
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header(config.api_key.clone())?);
        headers.insert(AUTHORIZATION, header(format!("Bearer {}", config.api_key))?);
        headers.insert("prefer", HeaderValue::from_static("return=representation"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            column: config.column.clone(),
        })
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn update(&self, record_id: i64, update: &RecordUpdate) -> Result<serde_json::Value> {
        let mut body = serde_json::Map::new();
        body.insert(self.column.clone(), serde_json::to_value(update)?);

        let response = self
            .client
            .patch(&self.endpoint)
            .query(&[("id", format!("eq.{record_id}"))])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AppError::store(format!(
                "update of record {record_id} failed with {status}: {text}"
            )));
        }

        log::info!("Record {} updated", record_id);
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn config(url: String) -> StoreConfig {
        StoreConfig {
            url,
            api_key: "service-key".to_string(),
            ..StoreConfig::default()
        }
    }

    #[tokio::test]
    async fn patches_column_of_matching_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/rest/v1/Community")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.42".into()))
            .match_header("apikey", "service-key")
            .match_header("authorization", "Bearer service-key")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::Json(json!({"ai": {"corpus": "refined"}})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 42, "ai": {"corpus": "refined"}}]"#)
            .create_async()
            .await;

        let store = SupabaseStore::new(&config(format!("{}/", server.url()))).unwrap();
        let response = store
            .update(
                42,
                &RecordUpdate {
                    corpus: "refined".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(response[0]["id"], 42);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_update_is_store_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/rest/v1/Community")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "Invalid API key"}"#)
            .create_async()
            .await;

        let store = SupabaseStore::new(&config(server.url())).unwrap();
        let err = store
            .update(
                1,
                &RecordUpdate {
                    corpus: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Store(_)));
    }

    #[test]
    fn requires_credentials() {
        assert!(SupabaseStore::new(&StoreConfig::default()).is_err());
    }
}
