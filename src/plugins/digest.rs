//! Content digest attribute for media resources.
//!
//! Attaches `digest` = SHA-256 hex of the source bytes, computed once at
//! resolution. Templates use it for cache-busting URLs.

use crate::capability::Capability;
use crate::plugin::Plugin;
use crate::resource::{Resource, ResourceKind};
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;

pub const DIGEST_ATTRIBUTE: &str = "digest";

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

#[derive(Debug, Default)]
pub struct DigestPlugin;

impl DigestPlugin {
    pub const NAME: &'static str = "digest";
}

impl Plugin for DigestPlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_resolve(&self, resource: &mut Resource) {
        if resource.kind() != ResourceKind::Media {
            return;
        }
        let digest = match hash_file(resource.source_path()) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!(path = %resource.relative_path().display(), "digest skipped: {e}");
                return;
            }
        };
        if let Err(e) = resource.attach(DIGEST_ATTRIBUTE, Capability::Attribute(digest.into())) {
            tracing::warn!(path = %resource.relative_path().display(), "{e}");
        }
    }
}
