//! Thumbnail plugin.
//!
//! Attaches a `thumb` capability to every media resource whose format the
//! image backend can both read and write. Invoking it resizes the source and
//! writes the result next to the resource's output, under a prefixed name:
//!
//! ```text
//! content/media/images/hyde.jpg
//!   .thumb(Some(100), None) → deploy/media/images/thumb_hyde.jpg  (100×75)
//! ```
//!
//! The output name depends only on the source name, so later calls with a
//! different size overwrite earlier ones.
//!
//! Failure mapping:
//!
//! | Cause | Error |
//! |---|---|
//! | zero width or height | `InvalidDimension` |
//! | extension not supported, or file not decodable | `UnsupportedFormat` |
//! | directory creation, encode or write failure | `Generation` |

use crate::capability::{Capability, CapabilityError};
use crate::context::SiteContext;
use crate::fsutil;
use crate::generate::GenerationError;
use crate::imaging::{
    BackendError, ImageBackend, Quality, SizeRequest, ThumbnailConfig, create_thumbnail,
    get_dimensions,
};
use crate::plugin::Plugin;
use crate::resource::{DerivedResource, Resource, ResourceKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name the capability is attached under.
pub const THUMB_CAPABILITY: &str = "thumb";

/// Shared state captured by every attached `thumb` closure.
struct Thumbnailer {
    context: Arc<SiteContext>,
    backend: Arc<dyn ImageBackend>,
    prefix: String,
    config: ThumbnailConfig,
}

impl Thumbnailer {
    fn supports(&self, resource: &Resource) -> bool {
        self.backend.supports_extension(&resource.extension())
    }

    fn output_path(&self, relative: &Path) -> PathBuf {
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let name = format!("{}{}", self.prefix, file_name);
        match relative.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    fn plan(&self, owner: &Resource) -> DerivedResource {
        DerivedResource::planned(
            owner.source_path().to_path_buf(),
            self.output_path(owner.relative_path()),
        )
    }

    fn generate(
        &self,
        owner: &Resource,
        request: &SizeRequest,
    ) -> Result<DerivedResource, CapabilityError> {
        for (name, value) in [("width", request.width), ("height", request.height)] {
            if value == Some(0) {
                return Err(CapabilityError::InvalidDimension { name, value: 0 });
            }
        }
        let source = owner.source_path();
        if !self.supports(owner) {
            return Err(CapabilityError::UnsupportedFormat(source.to_path_buf()));
        }
        let source_dims = get_dimensions(self.backend.as_ref(), source).map_err(|e| {
            tracing::debug!(path = %source.display(), "identify failed: {e}");
            CapabilityError::UnsupportedFormat(source.to_path_buf())
        })?;

        let derived = self.plan(owner);
        let target = self
            .context
            .deploy_target(derived.output_relative_path());
        fsutil::ensure_parent(&target).map_err(|e| GenerationError::Io {
            path: target.clone(),
            source: e,
        })?;
        let dims = create_thumbnail(
            self.backend.as_ref(),
            source,
            &target,
            source_dims,
            *request,
            &self.config,
        )
        .map_err(|e| match e {
            BackendError::Decode(reason) => {
                tracing::debug!(path = %source.display(), "decode failed: {reason}");
                CapabilityError::UnsupportedFormat(source.to_path_buf())
            }
            other => GenerationError::from(other).into(),
        })?;

        tracing::info!(
            path = %derived,
            width = dims.width,
            height = dims.height,
            "thumbnail written"
        );
        Ok(derived.generated(dims))
    }
}

/// Adds `thumb(width?, height?)` to supported image resources.
pub struct ThumbnailPlugin {
    thumbnailer: Arc<Thumbnailer>,
}

impl ThumbnailPlugin {
    pub const NAME: &'static str = "thumbnails";

    /// Build the plugin from the site's `[thumbnails]` settings.
    pub fn new(context: Arc<SiteContext>, backend: Arc<dyn ImageBackend>) -> Self {
        let settings = &context.config().thumbnails;
        let prefix = settings.prefix.clone();
        let config = ThumbnailConfig {
            quality: Quality::new(settings.quality),
        };
        Self {
            thumbnailer: Arc::new(Thumbnailer {
                context,
                backend,
                prefix,
                config,
            }),
        }
    }

    /// Whether `resource` gets the `thumb` capability.
    pub fn supports(&self, resource: &Resource) -> bool {
        resource.kind() == ResourceKind::Media && self.thumbnailer.supports(resource)
    }

    /// Deploy-relative path the thumbnail of `relative` is written to.
    pub fn output_path(&self, relative: &Path) -> PathBuf {
        self.thumbnailer.output_path(relative)
    }

    /// The derived resource `thumb` would produce, without generating it.
    pub fn plan(&self, owner: &Resource) -> DerivedResource {
        self.thumbnailer.plan(owner)
    }

    /// Generate a thumbnail directly, bypassing the capability table.
    pub fn generate(
        &self,
        owner: &Resource,
        request: &SizeRequest,
    ) -> Result<DerivedResource, CapabilityError> {
        self.thumbnailer.generate(owner, request)
    }
}

impl Plugin for ThumbnailPlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_resolve(&self, resource: &mut Resource) {
        if !self.supports(resource) {
            return;
        }
        let thumbnailer = Arc::clone(&self.thumbnailer);
        let capability =
            Capability::derive(move |owner, request| thumbnailer.generate(owner, request));
        if let Err(e) = resource.attach(THUMB_CAPABILITY, capability) {
            tracing::warn!(path = %resource.relative_path().display(), "{e}");
        }
    }
}

/// `resource.thumb(width, height)` sugar over the capability table.
pub trait ThumbExt {
    fn thumb(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<DerivedResource, CapabilityError>;
}

impl ThumbExt for Resource {
    fn thumb(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<DerivedResource, CapabilityError> {
        self.invoke(THUMB_CAPABILITY, &SizeRequest::new(width, height))
    }
}
