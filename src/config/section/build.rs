//! `[build]` configuration.

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Build paths and generated-file switches.
///
/// Relative paths are resolved against the project root after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Directory holding `*.md` posts.
    pub content: PathBuf,

    /// Directory holding `blog-post.html`, `blog-index.html`, `publications.html`.
    pub templates: PathBuf,

    /// Output root; pages are written to `<output>/blog/` and `<output>/publications/`.
    pub output: PathBuf,

    /// Directory receiving `sitemap.xml` and `robots.txt`.
    pub public: PathBuf,

    /// Include posts marked `draft: true`.
    pub drafts: bool,

    /// Strip indentation from generated XML.
    pub minify_xml: bool,

    pub sitemap: ToggleConfig,
    pub robots: ToggleConfig,
    pub feed: FeedConfig,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            content: "content/blog".into(),
            templates: "templates".into(),
            output: ".".into(),
            public: "public".into(),
            drafts: false,
            minify_xml: false,
            sitemap: ToggleConfig { enable: true },
            robots: ToggleConfig { enable: true },
            feed: FeedConfig::default(),
        }
    }
}

/// A generated file that can be switched off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    pub enable: bool,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

/// RSS feed of blog posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    /// Path relative to the output root.
    pub path: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: false,
            path: "blog/rss.xml".into(),
        }
    }
}

impl BuildSection {
    /// Resolve relative directories against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for dir in [
            &mut self.content,
            &mut self.templates,
            &mut self.output,
            &mut self.public,
        ] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
    }

    pub fn template(&self, name: &str) -> PathBuf {
        self.templates.join(name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.feed.path.as_os_str().is_empty() || self.feed.path.is_absolute() {
            diag.error_with_hint(
                "build.feed.path",
                format!("`{}` is not a relative file path", self.feed.path.display()),
                "use a path inside the output directory, e.g. \"blog/rss.xml\"",
            );
        }
    }
}
