/**
 * Documents API Client
 *
 * Thin reqwest client over the documents REST backend. Besides the plain
 * load calls it is the production `DocumentSaver`: drafts are created with
 * POST /api/documents, existing documents go to their auto-save endpoint.
 */
use crate::editor::autosave::DocumentSaver;
use crate::editor::config::Config;
use crate::shared::{DocumentId, DocumentRecord, SaveError, SaveReceipt, SaveTarget};
use futures_util::future::BoxFuture;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Title used when a draft is created by its first auto-save
pub const DEFAULT_DRAFT_TITLE: &str = "Untitled";

#[derive(Debug, Serialize)]
struct AutoSaveBody<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    title: &'a str,
    content: &'a str,
}

/// Documents API client. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct DocumentsClient {
    config: Arc<Config>,
    client: Client,
    draft_title: Arc<str>,
}

impl DocumentsClient {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            client: Client::new(),
            draft_title: Arc::from(DEFAULT_DRAFT_TITLE),
        }
    }

    /// Title sent when a draft is created on first save
    pub fn with_draft_title(mut self, title: impl AsRef<str>) -> Self {
        self.draft_title = Arc::from(title.as_ref());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GET /api/documents/:id
    pub async fn fetch(&self, id: DocumentId) -> Result<DocumentRecord, SaveError> {
        let url = self.config.api_url(&format!("/api/documents/{}", id));
        let response = self.authorized(self.client.get(&url)).send().await?;
        decode(response).await
    }

    /// GET /api/documents/:id/versions/:version, the source of a restore
    pub async fn fetch_version(
        &self,
        id: DocumentId,
        version: &str,
    ) -> Result<DocumentRecord, SaveError> {
        let url = self
            .config
            .api_url(&format!("/api/documents/{}/versions/{}", id, version));
        let response = self.authorized(self.client.get(&url)).send().await?;
        decode(response).await
    }

    /// POST /api/documents
    pub async fn create(&self, title: &str, content: &str) -> Result<SaveReceipt, SaveError> {
        let url = self.config.api_url("/api/documents");
        let response = self
            .authorized(self.client.post(&url))
            .json(&CreateBody { title, content })
            .send()
            .await?;
        decode(response).await
    }

    /// PATCH /api/documents/:id/autosave
    pub async fn autosave(&self, id: DocumentId, content: &str) -> Result<SaveReceipt, SaveError> {
        let url = self
            .config
            .api_url(&format!("/api/documents/{}/autosave", id));
        let response = self
            .authorized(self.client.patch(&url))
            .json(&AutoSaveBody { content })
            .send()
            .await?;
        decode(response).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.get_token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}

impl DocumentSaver for DocumentsClient {
    fn save(
        &self,
        target: SaveTarget,
        content: String,
    ) -> BoxFuture<'static, Result<SaveReceipt, SaveError>> {
        let client = self.clone();
        Box::pin(async move {
            match target {
                SaveTarget::Existing(id) => client.autosave(id, &content).await,
                SaveTarget::Draft => client.create(&client.draft_title, &content).await,
            }
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SaveError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(SaveError::Unauthorized);
    }
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        return Err(SaveError::server(status.as_u16(), error_text));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
