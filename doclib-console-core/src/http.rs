//! reqwest implementation of [`LibraryApi`].
//!
//! Every response goes through the same checks: a non-2xx status becomes
//! [`ApiError::Rejected`] carrying the body's `detail` when it has one, and a 2xx
//! body that does not decode becomes [`ApiError::Decode`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::config::ApiSettings;
use crate::contract::{
    BatchSyncRequest, ErrorBody, LibraryApi, LibraryId, LibraryPayload, ReleaseListing,
    SearchQuery, SearchResponse, SyncAck, VersionSyncRequest,
};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct HttpLibraryApi {
    client: Client,
    base_url: Url,
}

impl HttpLibraryApi {
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        info!(base_url = %settings.base_url, timeout_secs = ?settings.timeout_secs, "Initialized HttpLibraryApi");
        Self::with_client(client, &settings.base_url)
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn library_endpoint(
        &self,
        library_id: &LibraryId,
        action: Option<&str>,
    ) -> Result<Url, ApiError> {
        let mut segments = vec!["api", "libraries", library_id.as_str()];
        segments.extend(action);
        self.endpoint(&segments)
    }
}

/// Fails with [`ApiError::Rejected`] on a non-2xx status.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail);
    error!(status = %status, detail = ?detail, "API returned error status");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Sync endpoints may answer with a body that has no `message`, or none at all.
async fn decode_ack(response: Response) -> Result<SyncAck, ApiError> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(SyncAck::default());
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl LibraryApi for HttpLibraryApi {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ApiError> {
        debug!(query = %query.text, mode = %query.mode, limit = query.limit, "GET /api/search");
        let response = self
            .client
            .get(self.endpoint(&["api", "search"])?)
            .query(&query.query_params())
            .send()
            .await?;
        decode(response).await
    }

    async fn list_releases(
        &self,
        library_id: &LibraryId,
        limit: u32,
    ) -> Result<ReleaseListing, ApiError> {
        debug!(library_id = %library_id, limit, "GET github-releases");
        let response = self
            .client
            .get(self.library_endpoint(library_id, Some("github-releases"))?)
            .query(&[("limit", limit)])
            .send()
            .await?;
        decode(response).await
    }

    async fn batch_sync(
        &self,
        library_id: &LibraryId,
        request: &BatchSyncRequest,
    ) -> Result<SyncAck, ApiError> {
        debug!(library_id = %library_id, versions = request.versions.len(), "POST batch-sync");
        let response = self
            .client
            .post(self.library_endpoint(library_id, Some("batch-sync"))?)
            .json(request)
            .send()
            .await?;
        decode_ack(response).await
    }

    async fn sync_version(
        &self,
        library_id: &LibraryId,
        version: &str,
    ) -> Result<SyncAck, ApiError> {
        debug!(library_id = %library_id, version, "POST sync");
        let body = VersionSyncRequest {
            version: version.to_string(),
        };
        let response = self
            .client
            .post(self.library_endpoint(library_id, Some("sync"))?)
            .json(&body)
            .send()
            .await?;
        decode_ack(response).await
    }

    async fn create_library(&self, payload: &LibraryPayload) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(&["api", "libraries"])?)
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn update_library(
        &self,
        library_id: &LibraryId,
        payload: &LibraryPayload,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.library_endpoint(library_id, None)?)
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn delete_library(&self, library_id: &LibraryId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.library_endpoint(library_id, None)?)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }
}
