use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use miette::Diagnostic;
use serde::Serialize;
use url::Url;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum PhotoError {
    #[error("Photo reference `{0}` does not name a file in the photo store")]
    #[diagnostic(code(fishery::photos::invalid_reference))]
    InvalidReference(String),

    #[error("Could not delete photo")]
    #[diagnostic(code(fishery::photos::io))]
    Io(#[from] std::io::Error),
}

/// Storage holding the photos attached to records.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn delete(&self, reference: &str) -> Result<(), PhotoError>;
}

/// Photos kept as files below one directory.
///
/// A reference is a path relative to that directory. Full URLs are accepted
/// and contribute their path. Paths are used as given, without
/// percent-decoding.
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, reference: &str) -> Result<PathBuf, PhotoError> {
        let invalid = || PhotoError::InvalidReference(reference.to_string());

        let path = match Url::parse(reference) {
            Ok(url) if url.scheme() != "file" && url.has_host() => url.path().to_string(),
            Ok(_) => return Err(invalid()),
            Err(_) => reference.to_string(),
        };

        let relative = Path::new(path.trim_start_matches('/'));
        let mut components = relative.components().peekable();
        if components.peek().is_none()
            || !components.all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(invalid());
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn delete(&self, reference: &str) -> Result<(), PhotoError> {
        let path = self.resolve(reference)?;
        debug!("Deleting photo {}", path.display());
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}

/// What happened to one photo of a deleted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoOutcome {
    pub reference: String,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Try to delete every photo. Failures are logged and reported, never raised.
pub async fn delete_photos(store: &dyn PhotoStore, references: &[String]) -> Vec<PhotoOutcome> {
    let deletions = references.iter().map(|reference| async move {
        match store.delete(reference).await {
            Ok(()) => PhotoOutcome {
                reference: reference.clone(),
                deleted: true,
                error: None,
            },
            Err(err) => {
                warn!("Could not delete photo {reference}: {err}");
                PhotoOutcome {
                    reference: reference.clone(),
                    deleted: false,
                    error: Some(match &err {
                        PhotoError::Io(source) => format!("{err}: {source}"),
                        PhotoError::InvalidReference(_) => err.to_string(),
                    }),
                }
            }
        }
    });

    join_all(deletions).await
}
