//! `[publications]` configuration.

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// DBLP export and publication page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationsSection {
    /// DBLP person XML export.
    pub source: PathBuf,

    /// Record kinds to list (DBLP element names).
    pub kinds: Vec<String>,

    /// Records whose booktitle contains any of these (case-insensitive) are dropped.
    pub exclude_venues: Vec<String>,

    pub bibtex: BibtexConfig,
}

impl Default for PublicationsSection {
    fn default() -> Self {
        Self {
            source: "publications.xml".into(),
            kinds: vec!["inproceedings".into()],
            exclude_venues: vec!["repl4nlp".into()],
            bibtex: BibtexConfig::default(),
        }
    }
}

/// BibTeX file synthesised from the listed publications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BibtexConfig {
    pub enable: bool,
    /// Path relative to the output root.
    pub path: PathBuf,
}

impl Default for BibtexConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "publications/publications.bib".into(),
        }
    }
}

impl PublicationsSection {
    pub fn normalize(&mut self, root: &Path) {
        if self.source.is_relative() {
            self.source = root.join(&self.source);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.kinds.is_empty() {
            diag.error_with_hint(
                "publications.kinds",
                "no record kinds selected",
                "e.g. kinds = [\"inproceedings\", \"article\"]",
            );
        }
        if self.bibtex.path.as_os_str().is_empty() || self.bibtex.path.is_absolute() {
            diag.error(
                "publications.bibtex.path",
                format!("`{}` is not a relative file path", self.bibtex.path.display()),
            );
        }
    }

    /// Lower-cased venue filters, empty entries removed.
    pub fn excluded_venues(&self) -> Vec<String> {
        self.exclude_venues
            .iter()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect()
    }
}
