//! Built-in plugins and the name → constructor factory.
//!
//! | Name | Plugin | Adds |
//! |---|---|---|
//! | `thumbnails` | [`ThumbnailPlugin`] | `thumb(width?, height?)` on images |
//! | `digest` | [`DigestPlugin`] | `digest` attribute on media |
//!
//! The chain is built from the ordered `plugins` list in `site.toml`.

pub mod digest;
pub mod thumbnails;

pub use digest::{DIGEST_ATTRIBUTE, DigestPlugin};
pub use thumbnails::{THUMB_CAPABILITY, ThumbExt, ThumbnailPlugin};

use crate::config::ConfigError;
use crate::context::SiteContext;
use crate::imaging::ImageBackend;
use crate::plugin::{Plugin, PluginChain};
use std::sync::Arc;

/// Names accepted in the `plugins` list.
pub const KNOWN_PLUGINS: &[&str] = &[ThumbnailPlugin::NAME, DigestPlugin::NAME];

/// Build the plugin chain named by the site config, in config order.
pub fn build_chain(
    context: &Arc<SiteContext>,
    backend: Arc<dyn ImageBackend>,
) -> Result<PluginChain, ConfigError> {
    let mut plugins: Vec<Arc<dyn Plugin>> = Vec::new();
    for name in &context.config().plugins {
        if plugins.iter().any(|p| p.name() == name) {
            return Err(ConfigError::Validation(format!(
                "plugin '{name}' is listed more than once"
            )));
        }
        let plugin: Arc<dyn Plugin> = match name.as_str() {
            ThumbnailPlugin::NAME => Arc::new(ThumbnailPlugin::new(
                Arc::clone(context),
                Arc::clone(&backend),
            )),
            DigestPlugin::NAME => Arc::new(DigestPlugin),
            other => return Err(ConfigError::UnknownPlugin(other.to_string())),
        };
        plugins.push(plugin);
    }
    Ok(PluginChain::new(plugins))
}
