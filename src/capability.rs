//! Per-resource capability table.
//!
//! Plugins extend resources by attaching named capabilities while the
//! resource is being resolved. A capability is either a callable that derives
//! a new artifact from its owner, or a plain computed attribute. Callers look
//! capabilities up by name and get a typed result back:
//!
//! ```text
//! "thumb"  → Derive(fn(&Resource, &SizeRequest) -> Result<DerivedResource, _>)
//! "digest" → Attribute("9f86d08…")
//! ```
//!
//! The table is filled once, before the resource is frozen behind an `Arc`,
//! and is read-only afterwards.

use crate::generate::GenerationError;
use crate::imaging::SizeRequest;
use crate::resource::{DerivedResource, Resource, ResourceKind};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned to whoever invoked a capability.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("Not a decodable image: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Invalid {name}: {value} (must be positive)")]
    InvalidDimension { name: &'static str, value: u32 },
    #[error("Derived resource {} has not been generated yet", .0.display())]
    NotGenerated(PathBuf),
    #[error("No capability '{name}' on {}", path.display())]
    Missing { name: String, path: PathBuf },
    #[error("Capability '{0}' is an attribute, not a callable")]
    NotCallable(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors from attaching a capability during resolution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttachError {
    #[error("{kind:?} resources cannot be extended by plugins")]
    NotExtensible { kind: ResourceKind },
    #[error("Capability '{0}' is already attached")]
    AlreadyAttached(String),
}

/// Signature of a deriving capability.
pub type DeriveFn =
    dyn Fn(&Resource, &SizeRequest) -> Result<DerivedResource, CapabilityError> + Send + Sync;

/// A named value or operation attached to a resource by a plugin.
#[derive(Clone)]
pub enum Capability {
    /// Produces a derived resource from its owner on demand.
    Derive(Arc<DeriveFn>),
    /// A value computed once at resolution time.
    Attribute(serde_json::Value),
}

impl Capability {
    pub fn derive<F>(f: F) -> Self
    where
        F: Fn(&Resource, &SizeRequest) -> Result<DerivedResource, CapabilityError>
            + Send
            + Sync
            + 'static,
    {
        Self::Derive(Arc::new(f))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Derive(_))
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Derive(_) => f.write_str("Derive(..)"),
            Self::Attribute(value) => f.debug_tuple("Attribute").field(value).finish(),
        }
    }
}

/// Name → capability mapping owned by one resource.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    entries: BTreeMap<String, Capability>,
}

impl Capabilities {
    /// Insert a capability unless the name is taken. First attachment wins.
    pub(crate) fn insert(&mut self, name: &str, capability: Capability) -> Result<(), AttachError> {
        if self.entries.contains_key(name) {
            return Err(AttachError::AlreadyAttached(name.to_string()));
        }
        self.entries.insert(name.to_string(), capability);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Capability names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
