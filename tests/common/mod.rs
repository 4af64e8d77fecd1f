//! Helpers shared by the integration tests: the unit-test [`TestSite`] plus
//! what only whole-site tests need.

#![allow(dead_code)]

#[path = "../../src/test_helpers.rs"]
mod test_helpers;

pub use test_helpers::*;

use sitewright::site::Site;
use std::path::PathBuf;

impl TestSite {
    /// A site with the thumbnail plugin enabled and `hyde.jpg` / `hyde.png`
    /// under `content/media/images/`.
    pub fn with_images() -> Self {
        let site = Self::new();
        site.config("plugins = [\"thumbnails\"]\n");
        create_test_jpeg(&site.content("media/images/hyde.jpg"), 800, 600);
        create_test_png(&site.content("media/images/hyde.png"), 640, 480);
        site
    }

    pub fn deploy(&self, rel: &str) -> PathBuf {
        self.root().join("deploy").join(rel)
    }

    pub fn open(&self) -> Site {
        Site::open(self.root()).unwrap()
    }
}
