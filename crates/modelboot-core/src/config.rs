use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::BackoffPolicy;
use crate::supervisor::ServerCommand;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of prefetch attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds before the first retry.
    pub base_delay_secs: f64,
    /// Multiplicative growth factor applied to the delay after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 5.0,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Build the runtime policy, clamping degenerate values so the acquirer
    /// always makes at least one attempt and delays always grow.
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            multiplier: self.multiplier.max(1.0),
        }
    }
}

/// Cache directory overrides (optional section in config.toml).
///
/// When unset, the cache root defaults to the XDG cache home for the hub
/// (`~/.cache/huggingface`) with a `hub` subdirectory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache root directory, exported to the service as the cache-root var.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Hub subdirectory where downloaded artifacts land.
    #[serde(default)]
    pub hub_dir: Option<PathBuf>,
}

/// Identity of the model artifact to prefetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Hub repository id.
    pub repo_id: String,
    /// Artifact filename within the repository.
    pub filename: String,
    /// Repository revision to pin.
    pub revision: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            repo_id: "snakers4/silero-vad".to_string(),
            filename: "silero_vad.onnx".to_string(),
            revision: "main".to_string(),
        }
    }
}

/// The service command the supervisor hands off to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Service binary name (resolved via PATH).
    pub program: String,
    /// Bind address passed as `--host`.
    pub host: String,
    /// Model size passed as `--model`.
    pub model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            program: "whisperlivekit-server".to_string(),
            host: "0.0.0.0".to_string(),
            model: "medium".to_string(),
        }
    }
}

impl ServerConfig {
    /// Assemble the full command line for the service process.
    pub fn command(&self) -> ServerCommand {
        ServerCommand {
            program: self.program.clone(),
            args: vec![
                "--host".to_string(),
                self.host.clone(),
                "--model".to_string(),
                self.model.clone(),
            ],
        }
    }
}

/// Global configuration loaded from `~/.config/modelboot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelbootConfig {
    /// Retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Cache directory overrides.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Model artifact to prefetch.
    #[serde(default)]
    pub model: ModelConfig,
    /// Service command to launch.
    #[serde(default)]
    pub server: ServerConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modelboot")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ModelbootConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ModelbootConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ModelbootConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_invocation() {
        let cfg = ModelbootConfig::default();
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.base_delay_secs, 5.0);
        assert_eq!(cfg.retry.multiplier, 2.0);

        let cmd = cfg.server.command();
        assert_eq!(cmd.program, "whisperlivekit-server");
        assert_eq!(cmd.args, ["--host", "0.0.0.0", "--model", "medium"]);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = ModelbootConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ModelbootConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.model.repo_id, cfg.model.repo_id);
        assert_eq!(parsed.server.program, cfg.server.program);
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let cfg: ModelbootConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.server.host, "0.0.0.0");
    }

    #[test]
    fn degenerate_retry_values_are_clamped() {
        let cfg = RetryConfig {
            max_attempts: 0,
            base_delay_secs: -1.0,
            multiplier: 0.5,
        };
        let policy = cfg.policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::ZERO);
        assert_eq!(policy.multiplier, 1.0);
    }
}
