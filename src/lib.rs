//! # Sitewright
//!
//! A static site resource pipeline. Every file under the content directory
//! becomes a typed resource; plugins extend resources with named
//! capabilities and hook into generation; output lands in the deploy
//! directory at the same relative path.
//!
//! # Architecture
//!
//! ```text
//! site.toml ─→ SiteContext ─→ PluginChain (from `plugins = [...]`)
//!                   │                │
//!                   ▼                ▼
//! content/ ─→ ResourceRegistry ─→ on_resolve: attach capabilities
//!                   │
//!                   ▼
//!              Generator ─→ before hooks → transform → after hooks ─→ deploy/
//! ```
//!
//! The pipeline knows nothing about images. The thumbnail plugin attaches a
//! `thumb` capability to image resources and owns all of the sizing, naming
//! and codec work behind it:
//!
//! ```text
//! resource.thumb(None, Some(400))
//!   content/media/images/hyde.jpg (800x600)
//!   → deploy/media/images/thumb_hyde.jpg (533x400)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`context`] | Resolved site roots plus validated config, shared by every component |
//! | [`config`] | `site.toml` loading, layering over stock defaults, validation |
//! | [`resource`] | `Resource`, `ResourceKind`, `DerivedResource` |
//! | [`capability`] | Per-resource capability table and capability errors |
//! | [`registry`] | Path → resource map with once-per-resource resolve hooks |
//! | [`plugin`] | `Plugin` trait and hook ordering in `PluginChain` |
//! | [`plugins`] | Built-in plugins (`thumbnails`, `digest`) and the chain factory |
//! | [`transform`] | Core content transform (markdown → HTML) |
//! | [`generate`] | Per-resource generation, staleness, parallel full-site runs |
//! | [`site`] | Wires context, chain, registry and generator together |
//! | [`imaging`] | Pure-Rust image operations: identify, resize, encode |
//! | [`fsutil`] | Small filesystem helpers |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Capabilities Instead of Dynamic Attributes
//!
//! Plugins extend resources through a typed table of named capabilities
//! rather than ad hoc fields. A capability is either a callable producing a
//! derived resource or a computed JSON attribute. Lookups of missing names
//! fail with an error instead of returning a default, and only media and
//! derived resources accept capabilities at all.
//!
//! ## Resolve Once, Then Freeze
//!
//! Resolve hooks see a `&mut Resource` exactly once per run. After that the
//! resource lives behind an `Arc` and is read-only, so generation can run on
//! many threads without locking resources.
//!
//! ## Mtime Staleness, No Manifest
//!
//! A resource is regenerated when its deploy file is missing or older than
//! its source. Nothing is persisted between runs; `--force` regenerates
//! everything.

pub mod capability;
pub mod config;
pub mod context;
pub mod fsutil;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod plugin;
pub mod plugins;
pub mod registry;
pub mod resource;
pub mod site;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;
