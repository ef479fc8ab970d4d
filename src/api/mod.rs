use async_trait::async_trait;
use serde_json::Value;

pub mod client;
pub mod error;
pub mod types;

pub use client::StrapiClient;
pub use error::ApiError;
pub use types::ApiResponse;

/// The two REST calls the migration needs from a CMS instance.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// GET every entry of a content type (limited page, relations populated).
    async fn fetch_entries(&self, content_type: &str) -> Result<ApiResponse, ApiError>;

    /// POST one entry as a creation payload, wrapped as `{"data": entry}`.
    async fn create_entry(&self, content_type: &str, entry: &Value) -> Result<ApiResponse, ApiError>;
}
