//! Cache directory layout shared with the hub client and the service.
//!
//! The original launcher mutated the process-wide environment before
//! downloading. Here the paths are explicit values: the fetcher receives the
//! hub directory directly and the child process gets the variables via its
//! own environment, so nothing global changes under test.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::CacheConfig;

/// Environment variable naming the cache root for the service.
pub const CACHE_ROOT_VAR: &str = "HF_HOME";
/// Environment variable naming the hub artifact directory for the service.
pub const HUB_CACHE_VAR: &str = "HUGGINGFACE_HUB_CACHE";

/// Resolved cache directories for one supervisor invocation.
#[derive(Debug, Clone)]
pub struct CachePaths {
    /// Cache root (exported as [`CACHE_ROOT_VAR`]).
    pub root: PathBuf,
    /// Hub subdirectory where artifacts land (exported as [`HUB_CACHE_VAR`]).
    pub hub: PathBuf,
}

impl CachePaths {
    /// Resolve paths from config overrides, falling back to the XDG cache
    /// home the hub client would use on its own.
    pub fn resolve(cfg: &CacheConfig) -> Result<Self> {
        let root = match &cfg.root {
            Some(root) => root.clone(),
            None => xdg::BaseDirectories::with_prefix("huggingface")?.get_cache_home(),
        };
        let hub = match &cfg.hub_dir {
            Some(hub) => hub.clone(),
            None => root.join("hub"),
        };
        Ok(Self { root, hub })
    }

    /// Create both directories (and parents). Safe to call repeatedly;
    /// existing directories are not an error.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(&self.hub)?;
        Ok(())
    }

    /// Variables to apply to the service process environment.
    pub fn env_vars(&self) -> [(&'static str, &Path); 2] {
        [(CACHE_ROOT_VAR, &self.root), (HUB_CACHE_VAR, &self.hub)]
    }
}
