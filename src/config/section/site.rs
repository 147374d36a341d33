//! `[site]` configuration.

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

/// Fallback used for absolute URLs when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://example.com";

/// Site metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Site title, used by the feed channel.
    pub title: String,

    /// Owner name. Highlighted in publication author lists;
    /// falls back to the DBLP person name when empty.
    pub author: String,

    /// Site description, used by the feed channel.
    pub description: String,

    /// Base URL (e.g. "https://example.github.io").
    #[serde(alias = "baseUrl")]
    pub url: Option<String>,

    /// Language code (e.g. "en").
    pub language: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            description: String::new(),
            url: None,
            language: "en".into(),
        }
    }
}

impl SiteSection {
    /// Configured base URL without trailing slashes, if any.
    pub fn normalized_url(&self) -> Option<String> {
        self.url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    /// `url` must be an absolute http(s) URL when set.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url) = self.normalized_url() else {
            return;
        };

        match url::Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => diag.error_with_hint(
                "site.url",
                format!("unsupported scheme `{}` in `{url}`", parsed.scheme()),
                "use an http:// or https:// URL",
            ),
            Err(e) => diag.error_with_hint(
                "site.url",
                format!("invalid url `{url}`: {e}"),
                "use a full URL such as https://example.com",
            ),
        }
    }
}
