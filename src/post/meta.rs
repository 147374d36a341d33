//! Post metadata from YAML-like (`---`) or TOML (`+++`) front matter.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize};

/// Raw post metadata as written in front matter.
///
/// # Fields
///
/// | Field         | Aliases                     | Description                 |
/// |---------------|-----------------------------|-----------------------------|
/// | `title`       |                             | Page title (default: slug)  |
/// | `description` | `summary`                   | Shown in index and `<meta>` |
/// | `date`        | `published`                 | Publication date            |
/// | `updated`     | `lastUpdated`, `last_updated` | Last update date          |
/// | `draft`       |                             | Skip unless drafts enabled  |
/// | `tags`        |                             | Free-form tags              |
///
/// When both a field and its alias are set, the field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "date_value")]
    pub date: Option<String>,
    #[serde(deserialize_with = "date_value")]
    pub published: Option<String>,
    #[serde(deserialize_with = "date_value")]
    pub updated: Option<String>,
    #[serde(
        rename = "lastUpdated",
        alias = "last_updated",
        deserialize_with = "date_value"
    )]
    pub last_updated: Option<String>,
    pub draft: bool,
    pub tags: Vec<String>,
}

impl PostMeta {
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref()).or_else(|| non_empty(self.summary.as_deref()))
    }

    /// `date`, else `published`.
    pub fn date(&self) -> Option<&str> {
        non_empty(self.date.as_deref()).or_else(|| non_empty(self.published.as_deref()))
    }

    /// `updated`, else `lastUpdated`.
    pub fn updated(&self) -> Option<&str> {
        non_empty(self.updated.as_deref()).or_else(|| non_empty(self.last_updated.as_deref()))
    }
}

/// Accept quoted strings and bare TOML dates (`date = 2024-01-15`).
fn date_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateValue {
        Text(String),
        Toml(toml::value::Datetime),
    }

    Ok(match Option::<DateValue>::deserialize(deserializer)? {
        Some(DateValue::Text(s)) => Some(s),
        Some(DateValue::Toml(dt)) => Some(dt.to_string()),
        None => None,
    })
}

#[inline]
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split front matter from the body.
///
/// Returns default metadata and the whole input when there is no
/// front matter. Invalid TOML front matter is an error.
pub fn parse_front_matter(content: &str) -> Result<(PostMeta, &str)> {
    match detect_front_matter(content) {
        Some((fm, body, true)) => {
            let meta = toml::from_str(fm).map_err(|e| anyhow!("Invalid TOML front matter: {e}"))?;
            Ok((meta, body))
        }
        Some((fm, body, false)) => Ok((parse_yaml_like(fm), body)),
        None => Ok((PostMeta::default(), content)),
    }
}

/// Detect and extract front matter.
/// Returns `(front_matter, body, is_toml)` if found.
fn detect_front_matter(content: &str) -> Option<(&str, &str, bool)> {
    // Fence must open the file, after an optional BOM
    let trimmed = content.strip_prefix('\u{feff}').unwrap_or(content);

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if !trimmed.starts_with(fence) {
            continue;
        }
        let after = &trimmed[3..];
        // Opening fence must be alone on its line
        if !after.starts_with('\n') && !after.starts_with("\r\n") {
            return None;
        }
        let closing = format!("\n{fence}");
        let end = after.find(&closing)?;
        let fm = after[..end].trim();
        let rest = &after[end + closing.len()..];
        // Drop the remainder of the closing fence line
        let body = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => "",
        };
        return Some((fm, body, is_toml));
    }

    None
}

/// Parse simple YAML-like front matter (`key: value` per line).
///
/// Values may be quoted; `tags` accepts `a, b` or `[a, b]`.
fn parse_yaml_like(content: &str) -> PostMeta {
    let mut meta = PostMeta::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = unquote(value.trim());
        let owned = || Some(value.to_string());

        match key.trim() {
            "title" => meta.title = owned(),
            "description" => meta.description = owned(),
            "summary" => meta.summary = owned(),
            "date" => meta.date = owned(),
            "published" => meta.published = owned(),
            "updated" => meta.updated = owned(),
            "lastUpdated" | "last_updated" => meta.last_updated = owned(),
            "draft" => meta.draft = value.eq_ignore_ascii_case("true"),
            "tags" => {
                meta.tags = value
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .split(',')
                    .map(|s| unquote(s.trim()).to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            _ => {}
        }
    }

    meta
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
