use log::{error, info};
use std::env;

use crate::thread::model::{Comment, ThreadDocument};
use crate::utils::error::CustomError;

const DEFAULT_STORE_URL: &str =
    "https://react-comments-de644-default-rtdb.firebaseio.com/commentItems";

/// Gateway to the remote JSON document store holding the thread document.
pub struct RemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteStore {
    /// Build the gateway from `COMMENTS_STORE_URL`, falling back to the
    /// hosted demo document.
    pub fn init() -> Self {
        let base_url =
            env::var("COMMENTS_STORE_URL").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        RemoteStore {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn document_url(&self) -> String {
        format!("{}.json", self.base_url)
    }

    fn comments_url(&self) -> String {
        format!("{}/comments.json", self.base_url)
    }

    /// Fetch the whole thread document. Any transport failure or non-success
    /// answer is a load failure; callers treat it as terminal.
    pub async fn fetch_document(&self) -> Result<ThreadDocument, CustomError> {
        let response = self
            .client
            .get(self.document_url())
            .send()
            .await
            .map_err(|e| CustomError::LoadError(format!("Comments failed to load: {}", e)))?;

        if !response.status().is_success() {
            return Err(CustomError::LoadError(format!(
                "Comments failed to load: store answered {}",
                response.status()
            )));
        }

        response
            .json::<ThreadDocument>()
            .await
            .map_err(|e| CustomError::LoadError(format!("Malformed thread document: {}", e)))
    }

    /// Overwrite the document's `comments` field with the full collection.
    /// No partial updates and no retries; the newest snapshot always wins.
    pub async fn put_comments(&self, comments: &[Comment]) -> Result<(), CustomError> {
        let response = self
            .client
            .put(self.comments_url())
            .json(comments)
            .send()
            .await
            .map_err(|e| CustomError::SaveError(format!("Failed to persist comments: {}", e)))?;

        if !response.status().is_success() {
            return Err(CustomError::SaveError(format!(
                "Failed to persist comments: store answered {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Convenience wrapper: build the gateway from the environment and perform
/// the startup load.
pub async fn connect_to_store() -> Result<(RemoteStore, ThreadDocument), CustomError> {
    let store = RemoteStore::init();
    let document = store.fetch_document().await.map_err(|e| {
        error!("Failed to load the thread document: {}", e);
        e
    })?;

    info!(
        "Loaded {} top-level comments from the remote store",
        document.comments.len()
    );

    Ok((store, document))
}
