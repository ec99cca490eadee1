//! # contract: seams and wire types of the console
//!
//! This module defines the three traits every controller talks through, and the
//! request/response types exchanged with the console API.
//!
//! ## Interface & Extensibility
//! - [`LibraryApi`] is the HTTP contract: one async method per endpoint. The
//!   production implementation is [`crate::http::HttpLibraryApi`].
//! - [`Notifier`] shows ephemeral status messages. Fire-and-forget; it never fails.
//! - [`ViewHost`] is whatever hosts the view: it navigates, asks for confirmation
//!   and prompts for text.
//!
//! ## Mocking & Testing
//! - All traits are annotated for `mockall`, so tests can script responses and
//!   assert on notifications and navigation without a browser or a server.
//!
//! ## Wire format
//! - JSON field names are camelCase. Optional fields tolerate both `null` and
//!   absence.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::effect::Navigation;
use crate::error::ApiError;
use crate::notification::Notification;

/// Identifier of a library record, as issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryId(String);

impl LibraryId {
    pub fn new(id: impl Into<String>) -> Self {
        LibraryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Retrieval strategy requested from the search backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Hybrid,
    Keyword,
    Semantic,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Hybrid => "hybrid",
            SearchMode::Keyword => "keyword",
            SearchMode::Semantic => "semantic",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(SearchMode::Hybrid),
            "keyword" => Ok(SearchMode::Keyword),
            "semantic" => Ok(SearchMode::Semantic),
            other => Err(format!(
                "unknown search mode '{other}', expected hybrid, keyword or semantic"
            )),
        }
    }
}

/// A single search request. Built per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub mode: SearchMode,
    pub library_filter: Option<LibraryId>,
    pub limit: u32,
}

impl SearchQuery {
    /// Query-string pairs for `GET /api/search`; `libraryId` only when filtered.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.text.clone()),
            ("mode", self.mode.as_str().to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(library) = &self.library_filter {
            params.push(("libraryId", library.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub path: String,
    /// Matched snippet.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub chunk_index: Option<u32>,
}

/// Items arrive in relevance order and are rendered in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchResultItem>,
}

/// One upstream release as reported by `GET /api/libraries/{id}/github-releases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    pub tag_name: String,
    pub version: String,
    /// Documentation subpath resolved by the server for this version.
    pub docs_path: String,
    /// Already indexed.
    #[serde(default)]
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseListing {
    #[serde(default)]
    pub default_docs_path: Option<String>,
    #[serde(default)]
    pub releases: Vec<ReleaseInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSyncVersion {
    pub tag_name: String,
    pub version: String,
    pub docs_path: String,
}

/// Body of `POST /api/libraries/{id}/batch-sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSyncRequest {
    pub versions: Vec<BatchSyncVersion>,
    pub default_docs_path: String,
}

/// Body of `POST /api/libraries/{id}/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSyncRequest {
    pub version: String,
}

/// Success acknowledgement of a sync submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAck {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of library create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPayload {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_url: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

/// Error body returned by the API on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// The console API as seen from the browser side.
///
/// Implementations map transport failures, non-2xx statuses and malformed bodies to
/// [`ApiError`]; they never panic on a bad response.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// `GET /api/search`.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ApiError>;

    /// `GET /api/libraries/{id}/github-releases?limit=N`.
    async fn list_releases(
        &self,
        library_id: &LibraryId,
        limit: u32,
    ) -> Result<ReleaseListing, ApiError>;

    /// `POST /api/libraries/{id}/batch-sync`.
    async fn batch_sync(
        &self,
        library_id: &LibraryId,
        request: &BatchSyncRequest,
    ) -> Result<SyncAck, ApiError>;

    /// `POST /api/libraries/{id}/sync`.
    async fn sync_version(&self, library_id: &LibraryId, version: &str)
        -> Result<SyncAck, ApiError>;

    /// `POST /api/libraries`.
    async fn create_library(&self, payload: &LibraryPayload) -> Result<(), ApiError>;

    /// `PUT /api/libraries/{id}`.
    async fn update_library(
        &self,
        library_id: &LibraryId,
        payload: &LibraryPayload,
    ) -> Result<(), ApiError>;

    /// `DELETE /api/libraries/{id}`.
    async fn delete_library(&self, library_id: &LibraryId) -> Result<(), ApiError>;
}

/// Shows ephemeral, user-visible status messages.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// The environment hosting the view: navigation and blocking dialogs.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ViewHost: Send + Sync {
    fn navigate(&self, target: &Navigation);

    fn confirm(&self, message: &str) -> bool;

    fn prompt(&self, message: &str) -> Option<String>;
}
