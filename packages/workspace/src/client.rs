//! # Persistence Boundary
//!
//! Contracts for the page/version store. The HTTP implementation lives
//! outside this workspace; the engine only depends on these types and on
//! the [`PageClient`] trait. Tests use an in-memory double.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Review,
    Published,
}

/// One stored snapshot of a page's tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageVersion {
    pub id: String,
    pub page: String,
    pub version: u32,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    pub component_tree: Value,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A page with its current and published versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub status: PublishStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub current_version: Option<PageVersion>,
    pub published_version: Option<PageVersion>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload submitted to create a new version of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageVersionPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub component_tree: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, Value>>,
}

/// Acknowledgment of a publish request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub page_id: String,
    pub published_at: Option<DateTime<Utc>>,
    pub version: PageVersion,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("version not found: {0}")]
    VersionNotFound(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Async page/version store consumed by the load and save/publish flows.
pub trait PageClient {
    fn fetch_page(
        &self,
        page_id: &str,
    ) -> impl std::future::Future<Output = Result<Page, ClientError>> + Send;

    fn create_version(
        &self,
        page_id: &str,
        payload: PageVersionPayload,
    ) -> impl std::future::Future<Output = Result<PageVersion, ClientError>> + Send;

    fn publish(
        &self,
        page_id: &str,
        version_id: &str,
    ) -> impl std::future::Future<Output = Result<PublishReceipt, ClientError>> + Send;
}

/// Fetch a page and normalize its current version's tree into an
/// editable document. A page without a stored version, or with an
/// unrecognized payload, yields the built-in empty document.
pub async fn load_page_document<C: PageClient>(
    client: &C,
    page_id: &str,
) -> Result<(Page, pagesmith_model::Document), ClientError> {
    let page = client.fetch_page(page_id).await?;

    let mut meta = serde_json::Map::new();
    meta.insert("pageId".to_string(), Value::String(page.id.clone()));
    meta.insert("pageTitle".to_string(), Value::String(page.title.clone()));

    let tree = page
        .current_version
        .as_ref()
        .map(|version| &version.component_tree);
    let document = pagesmith_model::Document::from_payload(tree, meta, Vec::new());

    Ok((page, document))
}
