//! One loaded site: context, plugin chain, registry and generator wired
//! together.

use crate::capability::CapabilityError;
use crate::config::ConfigError;
use crate::context::SiteContext;
use crate::generate::{GenerationError, Generator};
use crate::imaging::{ImageBackend, RustBackend, SizeRequest};
use crate::plugin::PluginChain;
use crate::plugins;
use crate::registry::ResourceRegistry;
use crate::resource::DerivedResource;
use std::path::Path;
use std::sync::Arc;

pub struct Site {
    context: Arc<SiteContext>,
    chain: Arc<PluginChain>,
    registry: Arc<ResourceRegistry>,
    generator: Generator,
}

impl Site {
    /// Load `site.toml` from `site_root` and build the configured plugins
    /// on the pure-Rust image backend.
    pub fn open(site_root: &Path) -> Result<Self, ConfigError> {
        let context = SiteContext::load(site_root)?;
        Self::with_backend(context, Arc::new(RustBackend::new()))
    }

    /// Wire a site around an explicit context and image backend.
    pub fn with_backend(
        context: SiteContext,
        backend: Arc<dyn ImageBackend>,
    ) -> Result<Self, ConfigError> {
        let context = Arc::new(context);
        let chain = Arc::new(plugins::build_chain(&context, backend)?);
        Self::with_chain(context, chain)
    }

    /// Wire a site around an already-built plugin chain.
    pub fn with_chain(
        context: Arc<SiteContext>,
        chain: Arc<PluginChain>,
    ) -> Result<Self, ConfigError> {
        let registry = Arc::new(ResourceRegistry::new(
            Arc::clone(&context),
            Arc::clone(&chain),
        )?);
        let generator = Generator::new(
            Arc::clone(&context),
            Arc::clone(&registry),
            Arc::clone(&chain),
        );
        Ok(Self {
            context,
            chain,
            registry,
            generator,
        })
    }

    /// Regenerate everything regardless of staleness.
    pub fn force(mut self, force: bool) -> Self {
        self.generator = self.generator.force(force);
        self
    }

    pub fn context(&self) -> &Arc<SiteContext> {
        &self.context
    }

    pub fn chain(&self) -> &PluginChain {
        &self.chain
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Resolve `path` and invoke its `thumb` capability.
    ///
    /// Fails with [`CapabilityError::Missing`] unless the `thumbnails` plugin
    /// is enabled in `site.toml` and the resource is a supported image.
    pub fn thumb(
        &self,
        path: &Path,
        request: &SizeRequest,
    ) -> Result<DerivedResource, CapabilityError> {
        let resource = self
            .registry
            .resolve(path)
            .map_err(GenerationError::from)?;
        resource.invoke(plugins::THUMB_CAPABILITY, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::CancelToken;
    use crate::plugins::{DIGEST_ATTRIBUTE, THUMB_CAPABILITY, ThumbExt};
    use crate::test_helpers::{TestSite, create_test_jpeg};

    #[test]
    fn open_builds_configured_plugins() {
        let site_dir = TestSite::new();
        site_dir.config("plugins = [\"thumbnails\", \"digest\"]\n");
        site_dir.write("logo.png", b"png?");

        let site = Site::open(site_dir.root()).unwrap();
        assert_eq!(site.chain().names(), vec!["thumbnails", "digest"]);

        let logo = site.registry().resolve(Path::new("logo.png")).unwrap();
        assert!(logo.has_capability(THUMB_CAPABILITY));
        assert!(logo.has_capability(DIGEST_ATTRIBUTE));
    }

    #[test]
    fn open_rejects_unknown_plugin() {
        let site_dir = TestSite::new();
        site_dir.config("plugins = [\"sass\"]\n");
        assert!(matches!(
            Site::open(site_dir.root()),
            Err(ConfigError::UnknownPlugin(_))
        ));
    }

    #[test]
    fn thumb_writes_real_image() {
        let site_dir = TestSite::new();
        site_dir.config("plugins = [\"thumbnails\"]\n");
        create_test_jpeg(&site_dir.content("media/images/hyde.jpg"), 80, 60);

        let site = Site::open(site_dir.root()).unwrap();
        let hyde = site
            .registry()
            .resolve(Path::new("media/images/hyde.jpg"))
            .unwrap();
        let thumb = hyde.thumb(Some(40), None).unwrap();

        assert_eq!(thumb.to_string(), "media/images/thumb_hyde.jpg");
        assert_eq!((thumb.width().unwrap(), thumb.height().unwrap()), (40, 30));
        let written = site
            .context()
            .deploy_root()
            .join("media/images/thumb_hyde.jpg");
        assert_eq!(image::image_dimensions(written).unwrap(), (40, 30));
    }

    #[test]
    fn thumb_requires_enabled_plugin() {
        let site_dir = TestSite::new();
        create_test_jpeg(&site_dir.content("media/images/hyde.jpg"), 80, 60);

        let site = Site::open(site_dir.root()).unwrap();
        let result = site.thumb(Path::new("media/images/hyde.jpg"), &SizeRequest::width(40));

        assert!(matches!(result, Err(CapabilityError::Missing { .. })));
        let target = site.context().deploy_root().join("media/images/thumb_hyde.jpg");
        assert!(!target.exists());
    }

    #[test]
    fn thumb_on_missing_path_is_resolve_error() {
        let site_dir = TestSite::new();
        site_dir.config("plugins = [\"thumbnails\"]\n");

        let site = Site::open(site_dir.root()).unwrap();
        let result = site.thumb(Path::new("nope.jpg"), &SizeRequest::default());
        assert!(matches!(
            result,
            Err(CapabilityError::Generation(GenerationError::Resolve(_)))
        ));
    }

    #[test]
    fn force_regenerates_fresh_outputs() {
        let site_dir = TestSite::new();
        site_dir.write("a.txt", b"a");

        let site = Site::open(site_dir.root()).unwrap();
        let first = site.generator().generate_all(&CancelToken::new()).unwrap();
        assert_eq!(first.written(), 1);

        let forced = Site::open(site_dir.root()).unwrap().force(true);
        let second = forced.generator().generate_all(&CancelToken::new()).unwrap();
        assert_eq!(second.written(), 1);
    }
}
