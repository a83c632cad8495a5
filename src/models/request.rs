// src/models/request.rs

use serde::{Deserialize, Serialize};

/// Invocation payload: which site to crawl and which record receives the result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(alias = "communityId")]
    pub community_id: i64,
}

/// Successful scrape reply carrying the record store's answer.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResponse {
    pub message: String,
    pub response: serde_json::Value,
}

impl ScrapeResponse {
    pub fn success(response: serde_json::Value) -> Self {
        Self {
            message: "Success".to_string(),
            response,
        }
    }
}

/// Value written into the record's column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub corpus: String,
}
