//! Plugin protocol and the ordered plugin chain.
//!
//! Plugins take part in two phases:
//!
//! ```text
//! resolve    on_resolve(&mut Resource)          attach capabilities, move deploy path
//! generate   before_generation → transform → after_generation
//! ```
//!
//! `before_generation` hooks run in declaration order. `after_generation`
//! hooks run in reverse declaration order so that a plugin wrapping the
//! content on the way in unwraps it on the way out. Plugins that report
//! [`AfterOrder::Declared`] are excluded from the reversal and run after the
//! reversed group, in declaration order.

use crate::generate::GenerationError;
use crate::resource::Resource;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error raised inside a single hook.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

/// Lifecycle point a hook runs at. Carried in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeGeneration,
    AfterGeneration,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeGeneration => f.write_str("before_generation"),
            Self::AfterGeneration => f.write_str("after_generation"),
        }
    }
}

/// Where a plugin's `after_generation` hook sits in the after phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AfterOrder {
    /// Mirror the before phase (reverse declaration order).
    #[default]
    Reverse,
    /// Run after the reversed group, in declaration order.
    Declared,
}

/// A pipeline extension.
///
/// All hooks default to no-ops. Plugins are shared between worker threads,
/// so any state they keep must be `Sync`.
pub trait Plugin: Send + Sync {
    /// Config name, as listed in `plugins = [...]`.
    fn name(&self) -> &'static str;

    /// Called once per resource, the first time it is resolved.
    fn on_resolve(&self, _resource: &mut Resource) {}

    fn before_generation(
        &self,
        _resource: &Resource,
        _content: &mut Vec<u8>,
    ) -> Result<(), HookError> {
        Ok(())
    }

    fn after_generation(
        &self,
        _resource: &Resource,
        _content: &mut Vec<u8>,
    ) -> Result<(), HookError> {
        Ok(())
    }

    fn after_order(&self) -> AfterOrder {
        AfterOrder::Reverse
    }
}

/// Plugins in registration order.
#[derive(Clone, Default)]
pub struct PluginChain {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginChain {
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Plugin names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every `on_resolve` hook in registration order.
    pub fn resolve(&self, resource: &mut Resource) {
        for plugin in &self.plugins {
            plugin.on_resolve(resource);
        }
    }

    /// Run `before_generation` hooks in registration order. Stops at the
    /// first failure.
    pub fn before_generation(
        &self,
        resource: &Resource,
        content: &mut Vec<u8>,
    ) -> Result<(), GenerationError> {
        for plugin in &self.plugins {
            plugin
                .before_generation(resource, content)
                .map_err(|source| {
                    hook_error(plugin.as_ref(), HookStage::BeforeGeneration, source)
                })?;
        }
        Ok(())
    }

    /// Run `after_generation` hooks in [`after_sequence`](Self::after_sequence)
    /// order. Stops at the first failure.
    pub fn after_generation(
        &self,
        resource: &Resource,
        content: &mut Vec<u8>,
    ) -> Result<(), GenerationError> {
        for plugin in self.after_sequence() {
            plugin
                .after_generation(resource, content)
                .map_err(|source| {
                    hook_error(plugin.as_ref(), HookStage::AfterGeneration, source)
                })?;
        }
        Ok(())
    }

    /// Order of the after phase: reversing plugins last-to-first, then
    /// declared-order plugins first-to-last.
    pub fn after_sequence(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        let reversed = self
            .plugins
            .iter()
            .rev()
            .filter(|p| p.after_order() == AfterOrder::Reverse);
        let declared = self
            .plugins
            .iter()
            .filter(|p| p.after_order() == AfterOrder::Declared);
        reversed.chain(declared)
    }
}

impl fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn hook_error(plugin: &dyn Plugin, stage: HookStage, source: HookError) -> GenerationError {
    GenerationError::Hook {
        plugin: plugin.name(),
        stage,
        source,
    }
}
