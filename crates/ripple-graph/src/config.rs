//! Graph builder configuration.
//!
//! Sources, lowest priority first: built-in defaults, `ripple.toml` and
//! `ripple.json` in the project root, then `RIPPLE_*` environment variables
//! (`RIPPLE_CACHE_TTL_SECS=60`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default freshness window for a built graph (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// File extensions the walker collects.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Directory names the walker never descends into.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &["node_modules", "dist", "build", ".git", "coverage", ".next"];

pub const CONFIG_TOML: &str = "ripple.toml";
pub const CONFIG_JSON: &str = "ripple.json";
pub const ENV_PREFIX: &str = "RIPPLE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Project root; graph keys are relative to it.
    pub root: PathBuf,

    /// Seconds a built graph is served from cache before the next request
    /// rebuilds it. Zero disables caching.
    pub cache_ttl_secs: u64,

    /// Extensions (without the dot) of files that become graph nodes.
    pub extensions: Vec<String>,

    /// Directory names skipped wherever they appear.
    pub excluded_dirs: Vec<String>,

    /// Extra exclusions: directory names or root-relative paths.
    pub exclude: Vec<String>,
}

impl GraphConfig {
    /// Defaults for a project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: Vec::new(),
        }
    }

    /// Load configuration for `root` from files and environment.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        Self::figment(&root)
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn figment(root: &Path) -> Figment {
        // Missing files are ignored by the file providers
        Figment::new()
            .merge(Serialized::defaults(Self::new(root)))
            .merge(Toml::file(root.join(CONFIG_TOML)))
            .merge(Json::file(root.join(CONFIG_JSON)))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(exclude.into_iter().map(Into::into));
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
