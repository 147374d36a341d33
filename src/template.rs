//! `{{name}}` placeholder templates.
//!
//! Templates are plain HTML files. Every `{{name}}` with a known variable is
//! replaced in a single pass; unknown placeholders are left in place so a
//! template can carry markup meant for a later stage. Substituted values are
//! never scanned again, so post content containing `{{...}}` is safe.

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::{borrow::Cow, collections::HashMap, fs, path::Path, sync::LazyLock};

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex")
});

/// Variables for one render.
#[derive(Debug, Clone, Default)]
pub struct Vars<'a> {
    values: HashMap<&'a str, Cow<'a, str>>,
}

impl<'a> Vars<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable (builder style).
    pub fn with(mut self, name: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &'a str, value: impl Into<Cow<'a, str>>) {
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(AsRef::as_ref)
    }
}

/// A loaded HTML template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a template file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Ok(Self::new(source))
    }

    /// Read a template file, `None` if it does not exist.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Substitute all known placeholders.
    pub fn render(&self, vars: &Vars<'_>) -> String {
        RE_PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures<'_>| match vars.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let template = Template::new("<title>{{title}}</title><h1>{{title}}</h1>");
        let vars = Vars::new().with("title", "Hello");
        assert_eq!(
            template.render(&vars),
            "<title>Hello</title><h1>Hello</h1>"
        );
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let template = Template::new("{{known}} {{unknown}}");
        let vars = Vars::new().with("known", "x");
        assert_eq!(template.render(&vars), "x {{unknown}}");
    }

    #[test]
    fn test_values_not_rescanned() {
        let template = Template::new("{{content}} {{assetPrefix}}");
        let vars = Vars::new()
            .with("content", "literal {{assetPrefix}}")
            .with("assetPrefix", "../../");
        assert_eq!(template.render(&vars), "literal {{assetPrefix}} ../../");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let template = Template::new("{{ title }}");
        let vars = Vars::new().with("title", "T");
        assert_eq!(template.render(&vars), "T");
    }

    #[test]
    fn test_dollar_signs_in_values_are_literal() {
        let template = Template::new("{{content}}");
        let vars = Vars::new().with("content", "$$x$$ $1");
        assert_eq!(template.render(&vars), "$$x$$ $1");
    }

    #[test]
    fn test_load_optional_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            Template::load_optional(&dir.path().join("missing.html"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_load_optional_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.html");
        fs::write(&path, "{{x}}").unwrap();
        let template = Template::load_optional(&path).unwrap().unwrap();
        assert_eq!(template.render(&Vars::new().with("x", "1")), "1");
    }
}
