//! Explicit site context.
//!
//! Every component that needs to know where content lives or where output
//! goes receives a shared [`SiteContext`] at construction time. There is no
//! global site object.

use crate::config::{self, ConfigError, SiteConfig};
use crate::fsutil::absolute_dir;
use std::path::{Path, PathBuf};

/// Resolved roots plus the validated configuration for one site.
#[derive(Debug, Clone)]
pub struct SiteContext {
    site_root: PathBuf,
    content_root: PathBuf,
    deploy_root: PathBuf,
    config: SiteConfig,
}

impl SiteContext {
    /// Build a context from a site root and an already-loaded config.
    ///
    /// Roots in the config are resolved against `site_root` and made
    /// absolute. Existing directories are canonicalized so that prefix checks
    /// against resolved source paths hold.
    pub fn new(site_root: &Path, config: SiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let site_root = absolute_dir(site_root)?;
        let content_root = absolute_dir(&site_root.join(&config.content_root))?;
        let deploy_root = absolute_dir(&site_root.join(&config.deploy_root))?;
        if content_root.starts_with(&deploy_root) {
            return Err(ConfigError::Validation(format!(
                "content_root {} must not be inside deploy_root {}",
                content_root.display(),
                deploy_root.display()
            )));
        }
        Ok(Self {
            site_root,
            content_root,
            deploy_root,
            config,
        })
    }

    /// Load `site.toml` from `site_root` and build the context.
    pub fn load(site_root: &Path) -> Result<Self, ConfigError> {
        let config = config::load_config(site_root)?;
        Self::new(site_root, config)
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn deploy_root(&self) -> &Path {
        &self.deploy_root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Location of `site.toml`, whether or not it exists.
    pub fn config_path(&self) -> PathBuf {
        self.site_root.join(config::CONFIG_FILENAME)
    }

    /// Absolute output location for a deploy-relative path.
    pub fn deploy_target(&self, relative: &Path) -> PathBuf {
        self.deploy_root.join(relative)
    }

    /// Path relative to the content root, if `path` lies inside it.
    pub fn content_relative(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(&self.content_root)
            .ok()
            .map(Path::to_path_buf)
    }
}
