//! The resource model.
//!
//! A [`Resource`] is one file in the content tree. It knows where it came
//! from, where its output goes, what kind of content it holds, and which
//! capabilities plugins attached to it. A [`DerivedResource`] is an artifact
//! produced from another resource on demand, such as a thumbnail.

use crate::capability::{AttachError, Capabilities, Capability, CapabilityError};
use crate::fsutil::to_url_path;
use crate::imaging::{Dimensions, SizeRequest};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

const PAGE_EXTENSIONS: &[&str] = &["html", "htm", "md", "markdown"];
const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "tif", "tiff", "svg", "avif", "ico", "mp3", "ogg",
    "wav", "mp4", "webm", "mov",
];

/// What a resource holds, decided from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Text run through the content transform (markdown, html).
    Page,
    /// Copied verbatim.
    Static,
    /// Images, audio and video. Extensible by plugins.
    Media,
    /// Produced from another resource. Extensible by plugins, but only
    /// [`DerivedResource`] carries this kind and it has no capability table.
    Derived,
}

impl ResourceKind {
    /// Classify a source path by extension (case-insensitive).
    pub fn classify(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if PAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Page
        } else if MEDIA_EXTENSIONS.contains(&ext.as_str()) {
            Self::Media
        } else {
            Self::Static
        }
    }

    /// Whether plugins may attach capabilities to this kind.
    pub fn is_extensible(self) -> bool {
        matches!(self, Self::Media | Self::Derived)
    }
}

/// One content-tree file tracked by the pipeline.
#[derive(Debug)]
pub struct Resource {
    source_path: PathBuf,
    relative_path: PathBuf,
    deploy_path: PathBuf,
    kind: ResourceKind,
    capabilities: Capabilities,
}

impl Resource {
    /// Create a resource from its absolute source path and its path relative
    /// to the content root. The deploy path starts out equal to the relative
    /// path.
    pub fn new(source_path: PathBuf, relative_path: PathBuf) -> Self {
        let kind = ResourceKind::classify(&relative_path);
        Self {
            deploy_path: relative_path.clone(),
            source_path,
            relative_path,
            kind,
            capabilities: Capabilities::default(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Output location relative to the deploy root.
    pub fn deploy_path(&self) -> &Path {
        &self.deploy_path
    }

    /// Redirect the primary output. Only possible while plugins still hold
    /// the resource mutably, i.e. during resolution.
    pub fn set_deploy_path(&mut self, path: impl Into<PathBuf>) {
        self.deploy_path = path.into();
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Lowercased file extension, empty when there is none.
    pub fn extension(&self) -> String {
        self.relative_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    /// Attach a capability. Rejected for non-extensible kinds and for names
    /// that are already taken.
    pub fn attach(&mut self, name: &str, capability: Capability) -> Result<(), AttachError> {
        if !self.kind.is_extensible() {
            return Err(AttachError::NotExtensible { kind: self.kind });
        }
        self.capabilities.insert(name, capability)
    }

    /// Computed attribute value, if one is attached under `name`.
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        match self.capabilities.get(name)? {
            Capability::Attribute(value) => Some(value),
            Capability::Derive(_) => None,
        }
    }

    /// Invoke a deriving capability by name.
    pub fn invoke(
        &self,
        name: &str,
        request: &SizeRequest,
    ) -> Result<DerivedResource, CapabilityError> {
        match self.capabilities.get(name) {
            Some(Capability::Derive(f)) => f(self, request),
            Some(Capability::Attribute(_)) => Err(CapabilityError::NotCallable(name.to_string())),
            None => Err(CapabilityError::Missing {
                name: name.to_string(),
                path: self.relative_path.clone(),
            }),
        }
    }
}

/// An artifact generated from another resource.
///
/// Dimensions are only known once the artifact has been written; reading
/// them earlier is an error rather than a default.
///
/// Derived artifacts are never resolved through the registry, so plugins see
/// them only as return values and cannot attach capabilities to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedResource {
    owner_source_path: PathBuf,
    output_relative_path: PathBuf,
    dimensions: Option<Dimensions>,
}

impl DerivedResource {
    /// A derived resource whose output has not been produced yet.
    pub fn planned(owner_source_path: PathBuf, output_relative_path: PathBuf) -> Self {
        Self {
            owner_source_path,
            output_relative_path,
            dimensions: None,
        }
    }

    /// Record the dimensions of the artifact that was written.
    pub fn generated(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        ResourceKind::Derived
    }

    pub fn owner_source_path(&self) -> &Path {
        &self.owner_source_path
    }

    /// Output location relative to the deploy root.
    pub fn output_relative_path(&self) -> &Path {
        &self.output_relative_path
    }

    pub fn is_generated(&self) -> bool {
        self.dimensions.is_some()
    }

    pub fn dimensions(&self) -> Result<Dimensions, CapabilityError> {
        self.dimensions
            .ok_or_else(|| CapabilityError::NotGenerated(self.output_relative_path.clone()))
    }

    pub fn width(&self) -> Result<u32, CapabilityError> {
        self.dimensions().map(|d| d.width)
    }

    pub fn height(&self) -> Result<u32, CapabilityError> {
        self.dimensions().map(|d| d.height)
    }
}

/// Renders the deploy-relative output path with `/` separators.
impl fmt::Display for DerivedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_url_path(&self.output_relative_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(rel: &str) -> Resource {
        Resource::new(PathBuf::from("/site/content").join(rel), PathBuf::from(rel))
    }

    #[test]
    fn classify_by_extension() {
        assert_eq!(ResourceKind::classify(Path::new("index.md")), ResourceKind::Page);
        assert_eq!(ResourceKind::classify(Path::new("a/b.HTML")), ResourceKind::Page);
        assert_eq!(
            ResourceKind::classify(Path::new("media/images/hyde.JPG")),
            ResourceKind::Media
        );
        assert_eq!(ResourceKind::classify(Path::new("robots.txt")), ResourceKind::Static);
        assert_eq!(ResourceKind::classify(Path::new("LICENSE")), ResourceKind::Static);
    }

    #[test]
    fn deploy_path_defaults_to_relative_path() {
        let mut r = resource("blog/post.md");
        assert_eq!(r.deploy_path(), Path::new("blog/post.md"));
        r.set_deploy_path("blog/post.html");
        assert_eq!(r.deploy_path(), Path::new("blog/post.html"));
        assert_eq!(r.relative_path(), Path::new("blog/post.md"));
    }

    #[test]
    fn extensible_kinds() {
        assert!(ResourceKind::Media.is_extensible());
        assert!(ResourceKind::Derived.is_extensible());
        assert!(!ResourceKind::Page.is_extensible());
        assert!(!ResourceKind::Static.is_extensible());
    }

    #[test]
    fn pages_and_static_files_are_not_extensible() {
        let mut page = resource("index.md");
        let err = page
            .attach("digest", Capability::Attribute("x".into()))
            .unwrap_err();
        assert_eq!(
            err,
            AttachError::NotExtensible {
                kind: ResourceKind::Page
            }
        );
        assert!(!page.has_capability("digest"));

        let mut css = resource("style.css");
        assert!(css.attach("digest", Capability::Attribute("x".into())).is_err());
    }

    #[test]
    fn media_attributes_are_readable() {
        let mut image = resource("media/logo.png");
        image
            .attach("digest", Capability::Attribute("abc".into()))
            .unwrap();
        assert_eq!(image.attribute("digest"), Some(&serde_json::json!("abc")));
        assert!(image.attribute("thumb").is_none());
    }

    #[test]
    fn invoke_missing_capability_is_error() {
        let image = resource("media/logo.png");
        let result = image.invoke("thumb", &SizeRequest::native());
        assert!(matches!(result, Err(CapabilityError::Missing { name, .. }) if name == "thumb"));
    }

    #[test]
    fn invoke_attribute_is_not_callable() {
        let mut image = resource("media/logo.png");
        image
            .attach("digest", Capability::Attribute("abc".into()))
            .unwrap();
        let result = image.invoke("digest", &SizeRequest::native());
        assert!(matches!(result, Err(CapabilityError::NotCallable(_))));
    }

    #[test]
    fn invoke_passes_owner_and_request() {
        let mut image = resource("media/logo.png");
        image
            .attach(
                "echo",
                Capability::derive(|owner, request| {
                    let derived = DerivedResource::planned(
                        owner.source_path().to_path_buf(),
                        owner.relative_path().with_extension("out"),
                    );
                    Ok(derived.generated(Dimensions {
                        width: request.width.unwrap_or(1),
                        height: request.height.unwrap_or(1),
                    }))
                }),
            )
            .unwrap();

        let derived = image.invoke("echo", &SizeRequest::bounded(7, 9)).unwrap();
        assert_eq!(derived.width().unwrap(), 7);
        assert_eq!(derived.height().unwrap(), 9);
        assert_eq!(derived.to_string(), "media/logo.out");
        assert_eq!(derived.kind(), ResourceKind::Derived);
    }

    #[test]
    fn planned_derived_has_no_dimensions() {
        let derived = DerivedResource::planned(
            PathBuf::from("/site/content/a.jpg"),
            PathBuf::from("thumb_a.jpg"),
        );
        assert!(!derived.is_generated());
        assert!(matches!(
            derived.width(),
            Err(CapabilityError::NotGenerated(_))
        ));
        assert!(derived.height().is_err());
    }
}
