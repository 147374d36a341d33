//! BibTeX export of the listed publications.

use super::Publication;
use crate::{generator::write_output, log};
use anyhow::Result;
use std::{collections::HashSet, path::Path};

/// Title words skipped when synthesising a citation key.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "on", "of", "in", "for", "and", "to", "with", "from", "by", "at", "is",
    "are", "toward", "towards",
];

const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
];

/// Write all entries to `path`.
pub fn write_bibtex(path: &Path, publications: &[Publication]) -> Result<()> {
    write_output(path, to_bibtex(publications))?;
    log!("bibtex"; "{}", path.file_name().unwrap_or_default().to_string_lossy());
    Ok(())
}

/// Render entries separated by blank lines. Synthesised keys are made unique.
pub fn to_bibtex(publications: &[Publication]) -> String {
    let mut used = HashSet::new();
    let mut out = String::new();

    for publication in publications {
        let key = unique_key(cite_key(publication), &mut used);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&entry(publication, &key));
    }
    out
}

/// BibTeX entry type for a DBLP record kind.
pub fn entry_type(kind: &str) -> &'static str {
    match kind {
        "inproceedings" => "inproceedings",
        "article" => "article",
        "incollection" => "incollection",
        "book" => "book",
        "phdthesis" => "phdthesis",
        _ => "misc",
    }
}

/// `DBLP:{key}`, or `{surname}{year}{word}` without a DBLP key.
pub fn cite_key(publication: &Publication) -> String {
    if !publication.key.is_empty() {
        return format!("DBLP:{}", publication.key);
    }

    let surname = publication
        .authors
        .first()
        .and_then(|a| a.name.split_whitespace().last())
        .map(ascii_word)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "anon".to_string());

    let word = publication
        .title
        .split_whitespace()
        .map(ascii_word)
        .find(|w| !w.is_empty() && !STOP_WORDS.contains(&w.as_str()))
        .unwrap_or_default();

    format!("{surname}{}{word}", publication.year.trim())
}

fn unique_key(key: String, used: &mut HashSet<String>) -> String {
    if used.insert(key.clone()) {
        return key;
    }
    let letters = ('a'..='z').map(|c| format!("{key}{c}"));
    let numbers = (27..).map(|n| format!("{key}{n}"));
    letters
        .chain(numbers)
        .find(|candidate| used.insert(candidate.clone()))
        .unwrap_or(key)
}

/// Lower-case ASCII letters and digits of `word`.
fn ascii_word(word: &str) -> String {
    deunicode::deunicode(word)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// DOI from the `doi` field or a doi.org link.
pub fn doi(publication: &Publication) -> Option<String> {
    if !publication.doi.is_empty() {
        return Some(publication.doi.clone());
    }
    let link = publication.link.as_deref()?;
    DOI_PREFIXES
        .iter()
        .find_map(|prefix| link.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn entry(publication: &Publication, key: &str) -> String {
    let mut fields: Vec<(&str, String)> = Vec::new();

    let authors = name_list(publication.authors.iter().map(|a| a.name.as_str()));
    if !authors.is_empty() {
        fields.push(("author", authors));
    }
    let editors = name_list(publication.editors.iter().map(String::as_str));
    if !editors.is_empty() {
        fields.push(("editor", editors));
    }
    fields.push(("title", format!("{{{}}}", escape(&publication.title))));
    if !publication.booktitle.is_empty() {
        fields.push(("booktitle", escape(&publication.booktitle)));
    } else if !publication.journal.is_empty() {
        fields.push(("journal", escape(&publication.journal)));
    }
    if !publication.volume.is_empty() {
        fields.push(("volume", escape(&publication.volume)));
    }
    if !publication.number.is_empty() {
        fields.push(("number", escape(&publication.number)));
    }
    if !publication.pages.is_empty() {
        fields.push(("pages", publication.pages.replace('-', "--").replace("----", "--")));
    }
    if !publication.publisher.is_empty() {
        fields.push(("publisher", escape(&publication.publisher)));
    }
    fields.push(("year", publication.year.clone()));
    if let Some(doi) = doi(publication) {
        fields.push(("doi", doi));
    }
    if let Some(link) = &publication.link {
        fields.push(("url", link.clone()));
    }

    let body = fields
        .iter()
        .map(|(name, value)| format!("  {name:<9} = {{{value}}}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("@{}{{{key},\n{body}\n}}\n", entry_type(&publication.kind))
}

fn name_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.map(escape).collect::<Vec<_>>().join(" and ")
}

/// Escape LaTeX special characters in free text.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}
