//! Record store abstractions.
//!
//! A record store receives the refined corpus for one record, addressed by
//! its numeric id:
//! - `SupabaseStore`: PostgREST `PATCH` against the hosted table
//! - `LocalRecordStore`: one JSON file per record, for development
//!
//! ## Local Directory Structure
//!
//! ```text
//! storage/
//! └── records/
//!     ├── 1.json
//!     └── 42.json
//! ```

pub mod local;
pub mod supabase;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RecordUpdate;

// Re-export for convenience
pub use local::LocalRecordStore;
pub use supabase::SupabaseStore;

/// Trait for record store backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write `update` into record `record_id`, returning the backend's answer.
    async fn update(&self, record_id: i64, update: &RecordUpdate) -> Result<serde_json::Value>;
}
