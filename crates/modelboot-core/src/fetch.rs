//! Model fetcher: the opaque download mechanism the acquirer retries around.

use std::fmt;
use std::path::PathBuf;

use hf_hub::api::sync::{ApiBuilder, ApiError};
use hf_hub::{Repo, RepoType};

use crate::cache::CachePaths;
use crate::config::ModelConfig;

/// Failure of one fetch attempt, carrying the remote's human-readable
/// message so the retry layer can classify it.
#[derive(Debug)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        Self::new(err.to_string())
    }
}

/// One attempt at obtaining the model artifact.
///
/// `fetch` may perform network I/O, cache writes, and validation; it blocks
/// until the artifact is locally available or the attempt fails. The trait
/// exists so the retry loop and the supervisor can be driven by a scripted
/// fetcher in tests.
pub trait ModelFetcher: Send + Sync {
    fn fetch(&self) -> Result<PathBuf, FetchError>;
}

/// Production fetcher backed by the hub's sync API.
///
/// Progress output is suppressed and the cache directory is pinned to the
/// supervisor's hub path, so the service later finds the artifact where its
/// own fallback download would put it.
pub struct HubFetcher {
    repo_id: String,
    filename: String,
    revision: String,
    cache_dir: PathBuf,
}

impl HubFetcher {
    pub fn new(model: &ModelConfig, cache: &CachePaths) -> Self {
        Self {
            repo_id: model.repo_id.clone(),
            filename: model.filename.clone(),
            revision: model.revision.clone(),
            cache_dir: cache.hub.clone(),
        }
    }
}

impl ModelFetcher for HubFetcher {
    fn fetch(&self) -> Result<PathBuf, FetchError> {
        let api = ApiBuilder::new()
            .with_progress(false)
            .with_cache_dir(self.cache_dir.clone())
            .build()?;

        let repo = api.repo(Repo::with_revision(
            self.repo_id.clone(),
            RepoType::Model,
            self.revision.clone(),
        ));

        // Returns the cached path immediately when the artifact is already
        // present and valid.
        let path = repo.get(&self.filename)?;
        Ok(path)
    }
}
