//! Resource registry: content-tree paths → shared [`Resource`] values.
//!
//! The registry owns every resource for the lifetime of a run. Resources are
//! created on first resolution, handed to the plugin chain's `on_resolve`
//! hooks while still mutable, and then frozen behind an `Arc`.
//!
//! ## Concurrency
//!
//! Each source path gets its own `OnceLock` slot, inserted into the map under
//! a short-lived lock. The first caller for a path runs the resolve hooks;
//! concurrent callers for the same path block on the slot and receive the
//! same `Arc`. Callers for different paths never wait on each other's hooks.

use crate::config::ConfigError;
use crate::context::SiteContext;
use crate::plugin::PluginChain;
use crate::resource::Resource;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No resource at {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to scan content: {0}")]
    Walk(#[from] walkdir::Error),
}

type Slot = Arc<OnceLock<Arc<Resource>>>;

pub struct ResourceRegistry {
    context: Arc<SiteContext>,
    chain: Arc<PluginChain>,
    ignore: GlobSet,
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl ResourceRegistry {
    /// Create an empty registry. Fails if an ignore pattern is not a valid
    /// glob.
    pub fn new(context: Arc<SiteContext>, chain: Arc<PluginChain>) -> Result<Self, ConfigError> {
        let ignore = build_ignore_set(&context.config().ignore)?;
        Ok(Self {
            context,
            chain,
            ignore,
            slots: Mutex::new(HashMap::new()),
        })
    }

    /// Resolve an absolute or content-relative path to its resource.
    ///
    /// Returns the same `Arc` for the same file for the rest of the run.
    pub fn resolve(&self, path: &Path) -> Result<Arc<Resource>, ResolveError> {
        let (source, relative) = self.locate(path)?;
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(source.clone()).or_default())
        };
        let resource = slot.get_or_init(|| {
            let mut resource = Resource::new(source, relative);
            self.chain.resolve(&mut resource);
            tracing::debug!(
                path = %resource.relative_path().display(),
                kind = ?resource.kind(),
                capabilities = resource.capabilities().len(),
                "resolved"
            );
            Arc::new(resource)
        });
        Ok(Arc::clone(resource))
    }

    /// Every resource in the content tree, resolved lazily in scan order.
    ///
    /// Each call starts a fresh scan; already-resolved resources are reused.
    pub fn all(&self) -> impl Iterator<Item = Result<Arc<Resource>, ResolveError>> + '_ {
        self.scan()
            .map(move |entry| entry.and_then(|path| self.resolve(&path)))
    }

    /// Source paths of every file the scan visits, collected eagerly.
    pub fn source_paths(&self) -> Result<Vec<PathBuf>, ResolveError> {
        self.scan().collect()
    }

    /// Number of resources resolved so far.
    pub fn resolved_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    fn scan(&self) -> impl Iterator<Item = Result<PathBuf, ResolveError>> + '_ {
        WalkDir::new(self.context.content_root())
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_skipped(entry))
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
                Ok(_) => None,
                Err(e) => Some(Err(ResolveError::Walk(e))),
            })
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        // The content root itself may have any name, including a dot-name
        if entry.depth() == 0 {
            return false;
        }
        if entry.path().starts_with(self.context.deploy_root()) {
            return true;
        }
        self.ignore.is_match(entry.file_name())
    }

    /// Canonical source path and content-relative path for `path`.
    fn locate(&self, path: &Path) -> Result<(PathBuf, PathBuf), ResolveError> {
        let content_root = self.context.content_root();
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            content_root.join(path)
        };
        let source = match fs::canonicalize(&candidate) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ResolveError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ResolveError::Io(e)),
        };
        if !source.is_file() {
            return Err(ResolveError::NotFound(path.to_path_buf()));
        }
        match self.context.content_relative(&source) {
            Some(relative) => Ok((source, relative)),
            None => Err(ResolveError::NotFound(path.to_path_buf())),
        }
    }
}

/// Compile the configured ignore globs. Patterns match file names.
fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
