//! Core content transform, applied between the before and after hooks.

use crate::resource::{Resource, ResourceKind};
use pulldown_cmark::{Parser, html as md_html};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("{} is not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Turns a resource's source bytes into its primary output bytes.
pub trait ContentTransform: Send + Sync {
    fn transform(&self, resource: &Resource, content: Vec<u8>) -> Result<Vec<u8>, TransformError>;
}

/// Markdown pages become HTML; everything else passes through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransform;

impl DefaultTransform {
    fn is_markdown(resource: &Resource) -> bool {
        resource.kind() == ResourceKind::Page
            && matches!(resource.extension().as_str(), "md" | "markdown")
    }
}

impl ContentTransform for DefaultTransform {
    fn transform(&self, resource: &Resource, content: Vec<u8>) -> Result<Vec<u8>, TransformError> {
        if !Self::is_markdown(resource) {
            return Ok(content);
        }
        let text = String::from_utf8(content).map_err(|source| TransformError::Encoding {
            path: resource.relative_path().to_path_buf(),
            source,
        })?;
        let mut html = String::new();
        md_html::push_html(&mut html, Parser::new(&text));
        Ok(html.into_bytes())
    }
}
