//! Small filesystem helpers shared by the registry, generator and plugins.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent(path)?;
    fs::write(path, bytes)
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// True when `target` exists and was modified no earlier than any of
/// `sources`. Sources that do not exist are ignored.
pub fn is_up_to_date(target: &Path, sources: &[&Path]) -> io::Result<bool> {
    let target_modified = match fs::metadata(target) {
        Ok(meta) => meta.modified()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    for source in sources {
        let source_modified = match fs::metadata(source) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        if source_modified > target_modified {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonicalize a directory that may not exist yet.
///
/// Existing directories are canonicalized; missing ones are made absolute
/// against the current directory so prefix checks still work.
pub fn absolute_dir(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(p) => Ok(p),
        Err(e) if e.kind() == io::ErrorKind::NotFound => std::path::absolute(path),
        Err(e) => Err(e),
    }
}
