//! Site configuration management for `site.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site], [build], [publications]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! A legacy `site.config.json` (`{ "baseUrl": "..." }`) is still accepted:
//! either passed explicitly with `--config`, or picked up when `site.toml`
//! is absent.

pub mod section;
pub mod types;

pub use section::{BuildSection, DEFAULT_BASE_URL, PublicationsSection, SiteSection};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    debug, log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "site.toml";

/// Legacy JSON config file name.
pub const LEGACY_CONFIG_FILE: &str = "site.config.json";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing site.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, empty when none was found (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub publications: PublicationsSection,
}

/// Shape of the legacy `site.config.json`.
///
/// Only the keys the generator understands are read; front-end theme data
/// living in the same file is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyJsonConfig {
    base_url: Option<String>,
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
}

impl From<LegacyJsonConfig> for SiteConfig {
    fn from(legacy: LegacyJsonConfig) -> Self {
        let mut config = Self::default();
        config.site.url = legacy.base_url;
        if let Some(title) = legacy.title {
            config.site.title = title;
        }
        if let Some(author) = legacy.author {
            config.site.author = author;
        }
        if let Some(description) = legacy.description {
            config.site.description = description;
        }
        config
    }
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// The project root is `--root` (or cwd); the config path is resolved
    /// against it. A missing config file is not an error: defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        // Before any config debug output
        crate::logger::set_verbose(cli.verbose());

        let root = match &cli.root {
            Some(root) => normalize_path(root),
            None => std::env::current_dir().context("Failed to get current working directory")?,
        };

        let mut config = match Self::resolve_config_path(&root, &cli.config) {
            Some(path) => {
                debug!("config"; "loading {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "no {} found in {}, using defaults", cli.config.display(), root.display());
                Self::default()
            }
        };

        config.root = root;
        if let Some(args) = cli.build_args() {
            config.apply_build_args(args);
        }
        if let Commands::Publications { source, bibtex, .. } = &cli.command {
            Self::update_option(&mut config.publications.source, source.as_ref());
            Self::update_option(&mut config.publications.bibtex.enable, bibtex.as_ref());
        }
        config.normalize_paths();
        config.validate()?;

        Ok(config)
    }

    /// Find the config file: the requested path, or the legacy JSON file
    /// when the default `site.toml` is absent.
    fn resolve_config_path(root: &Path, requested: &Path) -> Option<PathBuf> {
        let path = root.join(requested);
        if path.is_file() {
            return Some(path);
        }

        if requested == Path::new(CONFIG_FILE) {
            let legacy = root.join(LEGACY_CONFIG_FILE);
            if legacy.is_file() {
                return Some(legacy);
            }
        }

        None
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        if is_json(path) {
            return Ok(Self::parse_legacy_json(&content)?);
        }

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Parse the legacy JSON config. An empty file means defaults.
    fn parse_legacy_json(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let legacy: LegacyJsonConfig = serde_json::from_str(content)?;
        Ok(legacy.into())
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Base URL for absolute links, without trailing slash.
    ///
    /// Falls back to [`DEFAULT_BASE_URL`] with a warning.
    pub fn base_url(&self) -> String {
        match self.site.normalized_url() {
            Some(url) => url,
            None => {
                log!("warning"; "site.url missing; using {} for absolute links", DEFAULT_BASE_URL);
                DEFAULT_BASE_URL.to_string()
            }
        }
    }

    /// Blog output directory: `<output>/blog`.
    pub fn blog_dir(&self) -> PathBuf {
        self.build.output.join("blog")
    }

    /// Publications page path: `<output>/publications/index.html`.
    pub fn publications_page(&self) -> PathBuf {
        self.build.output.join("publications").join("index.html")
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        if let Some(ref url) = args.site_url {
            self.site.url = Some(url.clone());
        }
        if args.drafts {
            self.build.drafts = true;
        }
        Self::update_option(&mut self.build.sitemap.enable, args.sitemap.as_ref());
        Self::update_option(&mut self.build.robots.enable, args.robots.as_ref());
        Self::update_option(&mut self.build.feed.enable, args.rss.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        self.build.normalize(&root);
        self.publications.normalize(&root);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors before reporting.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.build.validate(&mut diag);
        self.publications.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Config rooted at `root` with default sections and normalized paths.
#[cfg(test)]
pub fn test_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig {
        root: root.to_path_buf(),
        ..Default::default()
    };
    config.site.url = Some("https://example.org".into());
    config.normalize_paths();
    config
}

// ============================================================================
// tests
// ============================================================================
