//! reqwest-backed implementation of [`DocumentApi`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{DocumentApi, ListFilters, UploadSlot};
use crate::config::Settings;
use crate::error::{ApiError, ApiOperation};
use crate::models::{Document, DocumentPayload, SearchResult};

const USER_AGENT: &str = concat!("docport/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the document backend and its object store.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    /// Build a client from settings. Fails if the configured endpoint is
    /// not a valid absolute URL.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Trailing slash so Url::join keeps the base path segment
        let mut endpoint = settings.api_endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.request_timeout))
            .build()?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        // Only fails on malformed ids; treat as a client-side URL error
        self.base.join(path).map_err(|_| ApiError::Server {
            op: ApiOperation::GetDocument,
            status: 400,
        })
    }

    async fn check(op: ApiOperation, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!(%op, status = status.as_u16(), "API call failed");
            Err(ApiError::Server {
                op,
                status: status.as_u16(),
            })
        }
    }
}

#[derive(Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlRequest<'a> {
    file_name: &'a str,
    file_type: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlResponse {
    upload_url: String,
    file_key: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: u32,
}

/// The search endpoint sometimes nests its payload under `body` (proxy
/// integration quirk); accept both shapes.
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
    #[serde(default)]
    body: Option<SearchResponseBody>,
}

#[derive(Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[async_trait]
impl DocumentApi for HttpApi {
    async fn list(&self, filters: &ListFilters) -> Result<Vec<Document>, ApiError> {
        let op = ApiOperation::ListDocuments;
        let mut url = self.endpoint("documents")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(ref category) = filters.category {
                pairs.append_pair("category", category);
            }
            if let Some(ref title) = filters.title {
                pairs.append_pair("title", title);
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let response = Self::check(op, response).await?;
        let body: DocumentsResponse = response
            .json()
            .await
            .map_err(|source| ApiError::Network { op, source })?;

        tracing::debug!(count = body.documents.len(), "listed documents");
        Ok(body.documents)
    }

    async fn get(&self, id: &str) -> Result<Document, ApiError> {
        let op = ApiOperation::GetDocument;
        let url = self.endpoint(&format!("documents/{id}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let response = Self::check(op, response).await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Network { op, source })
    }

    async fn create(&self, payload: &DocumentPayload) -> Result<Document, ApiError> {
        let op = ApiOperation::CreateDocument;
        let url = self.endpoint("documents")?;
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let response = Self::check(op, response).await?;
        let created: Document = response
            .json()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        tracing::info!(id = %created.id, "document created");
        Ok(created)
    }

    async fn update(&self, id: &str, payload: &DocumentPayload) -> Result<Document, ApiError> {
        let op = ApiOperation::UpdateDocument;
        let url = self.endpoint(&format!("documents/{id}"))?;
        let response = self
            .client
            .put(url)
            .json(payload)
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let response = Self::check(op, response).await?;
        let updated: Document = response
            .json()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        tracing::info!(id = %updated.id, "document updated");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let op = ApiOperation::DeleteDocument;
        let url = self.endpoint(&format!("documents/{id}"))?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        Self::check(op, response).await?;
        tracing::info!(id, "document deleted");
        Ok(())
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, ApiError> {
        let op = ApiOperation::Search;
        let url = self.endpoint("search")?;
        let response = self
            .client
            .post(url)
            .json(&SearchRequest { query, limit })
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let response = Self::check(op, response).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|source| ApiError::Network { op, source })?;

        let results = body
            .results
            .or(body.body.map(|b| b.results))
            .unwrap_or_default();
        tracing::debug!(count = results.len(), "search completed");
        Ok(results)
    }

    async fn request_upload_slot(
        &self,
        file_name: &str,
        mime_type: &str,
    ) -> Result<UploadSlot, ApiError> {
        let op = ApiOperation::IssueUploadUrl;
        let url = self.endpoint("documents/upload-url")?;
        let response = self
            .client
            .post(url)
            .json(&UploadUrlRequest {
                file_name,
                file_type: mime_type,
            })
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let response = Self::check(op, response).await?;
        let body: UploadUrlResponse = response
            .json()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        Ok(UploadSlot {
            upload_url: body.upload_url,
            file_key: body.file_key,
        })
    }

    async fn upload(
        &self,
        upload_url: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let op = ApiOperation::UploadFile;
        let size = bytes.len();
        let response = self
            .client
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        Self::check(op, response).await?;
        tracing::info!(size, "file transferred to object store");
        Ok(())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let op = ApiOperation::DownloadFile;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let response = Self::check(op, response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(endpoint: &str) -> HttpApi {
        let settings = Settings {
            api_endpoint: endpoint.to_string(),
            ..Settings::with_data_dir("/tmp/docport-test")
        };
        HttpApi::new(&settings).unwrap()
    }

    #[test]
    fn base_path_segment_is_preserved_when_joining() {
        let api = api("http://localhost:3000/api");
        let url = api.endpoint("documents").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/documents");
    }

    #[test]
    fn invalid_endpoint_is_rejected_at_construction() {
        let settings = Settings {
            api_endpoint: "not a url".to_string(),
            ..Settings::with_data_dir("/tmp/docport-test")
        };
        assert!(HttpApi::new(&settings).is_err());
    }

    #[test]
    fn search_response_accepts_both_shapes() {
        let flat: SearchResponse =
            serde_json::from_str(r#"{"results": [{"documentId": "1"}]}"#).unwrap();
        assert_eq!(flat.results.unwrap().len(), 1);

        let nested: SearchResponse =
            serde_json::from_str(r#"{"body": {"results": [{"documentId": "1"}]}}"#).unwrap();
        assert_eq!(nested.body.unwrap().results.len(), 1);
    }
}
