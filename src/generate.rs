//! Resource generation.
//!
//! For one resource the generator runs:
//!
//! ```text
//! resolve → staleness check → read source → before hooks → transform
//!         → after hooks → write deploy_root/deploy_path
//! ```
//!
//! [`Generator::generate_all`] runs that sequence for every scanned resource
//! on a bounded rayon pool. A failing resource is recorded in the
//! [`BuildReport`] and does not stop the others.
//!
//! ## Staleness
//!
//! A resource whose deploy file exists and is at least as new as its source
//! is skipped with [`Outcome::Unchanged`]. `force` disables the check. There
//! is no persisted manifest; freshness is decided from mtimes alone.

use crate::config::effective_threads;
use crate::context::SiteContext;
use crate::fsutil;
use crate::imaging::BackendError;
use crate::plugin::{HookError, HookStage, PluginChain};
use crate::registry::{ResolveError, ResourceRegistry};
use crate::resource::Resource;
use crate::transform::{ContentTransform, DefaultTransform, TransformError};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Plugin '{plugin}' failed in {stage}: {source}")]
    Hook {
        plugin: &'static str,
        stage: HookStage,
        #[source]
        source: HookError,
    },
    #[error("Transform failed for {}: {source}", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: TransformError,
    },
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// What happened to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Written,
    Unchanged,
}

/// Result of generating one resource.
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    /// Source path relative to the content root.
    pub relative_path: PathBuf,
    /// Output path relative to the deploy root.
    pub deploy_path: PathBuf,
    pub outcome: Outcome,
    /// Bytes written; zero when unchanged.
    pub bytes: usize,
}

/// A resource that failed during a full run.
#[derive(Debug)]
pub struct Failure {
    /// Source path relative to the content root.
    pub path: PathBuf,
    pub error: GenerationError,
}

/// Summary of a full-site run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub generated: Vec<Generated>,
    pub failures: Vec<Failure>,
    /// Resources that were never started because the run was cancelled.
    pub cancelled: Vec<PathBuf>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.cancelled.is_empty()
    }

    pub fn written(&self) -> usize {
        self.count(Outcome::Written)
    }

    pub fn unchanged(&self) -> usize {
        self.count(Outcome::Unchanged)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.generated
            .iter()
            .filter(|g| g.outcome == outcome)
            .count()
    }
}

/// Cooperative cancellation flag shared between a run and its controller.
///
/// Cancelling stops new resources from starting. Work already in flight
/// finishes normally.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Generator {
    context: Arc<SiteContext>,
    registry: Arc<ResourceRegistry>,
    chain: Arc<PluginChain>,
    transform: Box<dyn ContentTransform>,
    force: bool,
}

impl Generator {
    pub fn new(
        context: Arc<SiteContext>,
        registry: Arc<ResourceRegistry>,
        chain: Arc<PluginChain>,
    ) -> Self {
        Self {
            context,
            registry,
            chain,
            transform: Box::new(DefaultTransform),
            force: false,
        }
    }

    /// Replace the content transform.
    pub fn with_transform(mut self, transform: impl ContentTransform + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }

    /// Regenerate even when the deploy file is up to date.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Generate the resource at an absolute or content-relative path.
    pub fn generate_resource_at(&self, path: &Path) -> Result<Generated, GenerationError> {
        let resource = self.registry.resolve(path)?;
        self.generate_resource(&resource)
    }

    /// Generate one already-resolved resource.
    pub fn generate_resource(&self, resource: &Resource) -> Result<Generated, GenerationError> {
        let source = resource.source_path();
        let target = self.context.deploy_target(resource.deploy_path());

        if !self.force {
            // Every output also depends on site.toml
            let config_path = self.context.config_path();
            let dependencies = [source, config_path.as_path()];
            let fresh = fsutil::is_up_to_date(&target, &dependencies).map_err(|e| {
                GenerationError::Io {
                    path: target.clone(),
                    source: e,
                }
            })?;
            if fresh {
                tracing::debug!(path = %resource.relative_path().display(), "unchanged");
                return Ok(Generated {
                    relative_path: resource.relative_path().to_path_buf(),
                    deploy_path: resource.deploy_path().to_path_buf(),
                    outcome: Outcome::Unchanged,
                    bytes: 0,
                });
            }
        }

        let mut content = std::fs::read(source).map_err(|e| GenerationError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;
        self.chain.before_generation(resource, &mut content)?;
        let mut content = self
            .transform
            .transform(resource, content)
            .map_err(|e| GenerationError::Transform {
                path: resource.relative_path().to_path_buf(),
                source: e,
            })?;
        self.chain.after_generation(resource, &mut content)?;

        fsutil::write_bytes(&target, &content).map_err(|e| GenerationError::Io {
            path: target.clone(),
            source: e,
        })?;
        tracing::info!(
            path = %resource.relative_path().display(),
            deploy = %resource.deploy_path().display(),
            bytes = content.len(),
            "generated"
        );

        Ok(Generated {
            relative_path: resource.relative_path().to_path_buf(),
            deploy_path: resource.deploy_path().to_path_buf(),
            outcome: Outcome::Written,
            bytes: content.len(),
        })
    }

    /// Generate every resource in the content tree.
    ///
    /// Only a failed scan or pool construction aborts the run; per-resource
    /// errors are collected in the report.
    pub fn generate_all(&self, cancel: &CancelToken) -> Result<BuildReport, GenerationError> {
        let paths = self.registry.source_paths()?;
        let threads = effective_threads(&self.context.config().processing);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        tracing::debug!(resources = paths.len(), threads, "starting generation");

        let results: Vec<(PathBuf, Option<Result<Generated, GenerationError>>)> =
            pool.install(|| {
                paths
                    .par_iter()
                    .map(|path| {
                        if cancel.is_cancelled() {
                            return (path.clone(), None);
                        }
                        (path.clone(), Some(self.generate_resource_at(path)))
                    })
                    .collect()
            });

        let mut report = BuildReport::default();
        for (path, result) in results {
            let relative = self.context.content_relative(&path).unwrap_or(path);
            match result {
                Some(Ok(generated)) => report.generated.push(generated),
                Some(Err(error)) => {
                    tracing::warn!(path = %relative.display(), %error, "generation failed");
                    report.failures.push(Failure {
                        path: relative,
                        error,
                    });
                }
                None => report.cancelled.push(relative),
            }
        }
        Ok(report)
    }
}
