//! CLI output formatting.
//!
//! Every command has a `format_*` function that returns lines (pure, easy to
//! test) and a `print_*` wrapper that writes them to stdout. Entities are
//! listed by their content-relative path with details on indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Plugins
//!     thumbnails, digest
//!
//! Pages
//! 001 index.md
//!
//! Media
//! 001 media/images/hyde.jpg
//!     Capabilities: digest, thumb
//!
//! Static
//! 001 robots.txt
//! ```
//!
//! ## Build
//!
//! ```text
//! Written
//! 001 index.md → index.md (312 bytes)
//! Unchanged
//! 001 robots.txt
//! Failed
//! 001 media/images/broken.jpg
//!     Error: Plugin 'thumbnails' failed in after_generation: …
//!
//! Generated 1 resource, 1 unchanged, 1 failed
//! ```

use crate::fsutil::to_url_path;
use crate::generate::{BuildReport, Generated, Outcome};
use crate::resource::{DerivedResource, Resource, ResourceKind};
use std::path::PathBuf;
use std::sync::Arc;

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// `Heading` followed by numbered entries, or nothing when `entries` is empty.
fn section(lines: &mut Vec<String>, heading: &str, entries: Vec<Vec<String>>) {
    if entries.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    for (i, entry) in entries.into_iter().enumerate() {
        let mut entry = entry.into_iter();
        if let Some(first) = entry.next() {
            lines.push(format!("{} {}", format_index(i + 1), first));
        }
        lines.extend(entry.map(|detail| format!("{}{}", indent(1), detail)));
    }
}

// ============================================================================
// Check
// ============================================================================

/// Inventory of a site's resources grouped by kind.
pub fn format_check_output(plugins: &[&str], resources: &[Arc<Resource>]) -> Vec<String> {
    let mut lines = vec!["Plugins".to_string()];
    if plugins.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    } else {
        lines.push(format!("{}{}", indent(1), plugins.join(", ")));
    }

    let mut sorted: Vec<&Arc<Resource>> = resources.iter().collect();
    sorted.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));

    for (heading, kind) in [
        ("Pages", ResourceKind::Page),
        ("Media", ResourceKind::Media),
        ("Static", ResourceKind::Static),
    ] {
        let entries: Vec<Vec<String>> = sorted
            .iter()
            .filter(|r| r.kind() == kind)
            .map(|r| resource_entry(r))
            .collect();
        if !entries.is_empty() {
            lines.push(String::new());
        }
        section(&mut lines, heading, entries);
    }
    lines
}

fn resource_entry(resource: &Resource) -> Vec<String> {
    let mut entry = vec![to_url_path(resource.relative_path())];
    if resource.deploy_path() != resource.relative_path() {
        entry.push(format!("Deploy: {}", to_url_path(resource.deploy_path())));
    }
    if !resource.capabilities().is_empty() {
        let names: Vec<&str> = resource.capabilities().names().collect();
        entry.push(format!("Capabilities: {}", names.join(", ")));
    }
    entry
}

pub fn print_check_output(plugins: &[&str], resources: &[Arc<Resource>]) {
    for line in format_check_output(plugins, resources) {
        println!("{}", line);
    }
}

// ============================================================================
// Build / gen
// ============================================================================

/// One generated resource as a single line.
pub fn format_generated(generated: &Generated) -> String {
    let source = to_url_path(&generated.relative_path);
    match generated.outcome {
        Outcome::Written => format!(
            "{} → {} ({})",
            source,
            to_url_path(&generated.deploy_path),
            plural(generated.bytes, "byte")
        ),
        Outcome::Unchanged => format!("{} (unchanged)", source),
    }
}

/// Full-run summary: written, unchanged, failed and cancelled resources.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut generated: Vec<&Generated> = report.generated.iter().collect();
    generated.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let written = generated
        .iter()
        .filter(|g| g.outcome == Outcome::Written)
        .map(|g| vec![format_generated(g)])
        .collect();
    let unchanged = generated
        .iter()
        .filter(|g| g.outcome == Outcome::Unchanged)
        .map(|g| vec![to_url_path(&g.relative_path)])
        .collect();

    let mut failures: Vec<_> = report.failures.iter().collect();
    failures.sort_by(|a, b| a.path.cmp(&b.path));
    let failed = failures
        .iter()
        .map(|f| vec![to_url_path(&f.path), format!("Error: {}", f.error)])
        .collect();

    let mut cancelled: Vec<&PathBuf> = report.cancelled.iter().collect();
    cancelled.sort();
    let cancelled_entries = cancelled.iter().map(|p| vec![to_url_path(p)]).collect();

    let mut lines = Vec::new();
    section(&mut lines, "Written", written);
    section(&mut lines, "Unchanged", unchanged);
    section(&mut lines, "Failed", failed);
    section(&mut lines, "Cancelled", cancelled_entries);

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let mut summary = format!(
        "Generated {}, {} unchanged",
        plural(report.written(), "resource"),
        report.unchanged()
    );
    if !report.failures.is_empty() {
        summary.push_str(&format!(", {} failed", report.failures.len()));
    }
    if !report.cancelled.is_empty() {
        summary.push_str(&format!(", {} cancelled", report.cancelled.len()));
    }
    lines.push(summary);
    lines
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumb
// ============================================================================

/// A generated derived resource with its dimensions.
pub fn format_derived(derived: &DerivedResource) -> String {
    match derived.dimensions() {
        Ok(dims) => format!("{} ({}x{})", derived, dims.width, dims.height),
        Err(_) => format!("{} (planned)", derived),
    }
}
