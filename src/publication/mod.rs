//! Publications page built from a DBLP person export.
//!
//! ```text
//! publications.xml -> dblp::parse -> select -> render (HTML) + bibtex (.bib)
//! ```

pub mod bibtex;
pub mod dblp;
pub mod render;

use crate::{
    config::{PublicationsSection, SiteConfig},
    log,
    utils::plural_count,
};
use anyhow::{Context, Result};
use dblp::{DblpRecord, UNKNOWN_PERSON};
use regex::Regex;
use std::{fs, sync::LazyLock};

/// DBLP disambiguation suffix: `John Smith 0001`.
static RE_HOMONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d{4}$").expect("valid homonym regex"));

/// Author name without the DBLP homonym number.
pub fn display_name(name: &str) -> &str {
    match RE_HOMONYM.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Who is highlighted in author lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfName<'a> {
    /// `site.author`, compared to display names ignoring case.
    Configured(&'a str),
    /// DBLP person name, compared verbatim so homonyms stay distinct.
    Dblp(&'a str),
    Unknown,
}

impl SelfName<'_> {
    /// Whether a raw DBLP author name refers to the site owner.
    pub fn matches(&self, raw: &str) -> bool {
        match *self {
            Self::Configured(name) => display_name(raw).to_lowercase() == name.to_lowercase(),
            Self::Dblp(name) => raw == name,
            Self::Unknown => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    /// Matches the site owner.
    pub is_self: bool,
}

/// A listed publication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Publication {
    pub kind: String,
    pub key: String,
    /// Title without its trailing period.
    pub title: String,
    pub year: String,
    /// Venue label: booktitle, else journal (with volume when known).
    pub venue: String,
    /// First electronic edition.
    pub link: Option<String>,
    pub authors: Vec<Author>,
    /// Editor names with the homonym number removed.
    pub editors: Vec<String>,
    pub booktitle: String,
    pub journal: String,
    pub volume: String,
    pub number: String,
    pub pages: String,
    pub publisher: String,
    pub doi: String,
}

impl Publication {
    fn from_record(record: &DblpRecord, self_name: SelfName<'_>) -> Self {
        let title = record.title.strip_suffix('.').unwrap_or(&record.title);

        let venue = if !record.booktitle.is_empty() {
            &record.booktitle
        } else {
            &record.journal
        };
        let venue = if !record.journal.is_empty() && !record.volume.is_empty() {
            format!("{venue} ({})", record.volume)
        } else {
            venue.clone()
        };

        let authors = record
            .authors
            .iter()
            .map(|raw| Author {
                name: display_name(raw).to_string(),
                is_self: self_name.matches(raw),
            })
            .collect();

        Self {
            kind: record.kind.clone(),
            key: record.key.clone(),
            title: title.to_string(),
            year: record.year.clone(),
            venue,
            link: record.ee.first().cloned(),
            authors,
            editors: record
                .editors
                .iter()
                .map(|raw| display_name(raw).to_string())
                .collect(),
            booktitle: record.booktitle.clone(),
            journal: record.journal.clone(),
            volume: record.volume.clone(),
            number: record.number.clone(),
            pages: record.pages.clone(),
            publisher: record.publisher.clone(),
            doi: record.doi.clone(),
        }
    }
}

/// Apply kind and venue filters, then drop records without title or year.
///
/// Document order is preserved.
pub fn select(
    records: &[DblpRecord],
    section: &PublicationsSection,
    self_name: SelfName<'_>,
) -> Vec<Publication> {
    let excluded = section.excluded_venues();

    records
        .iter()
        .filter(|r| section.kinds.iter().any(|k| *k == r.kind))
        .filter(|r| {
            let booktitle = r.booktitle.to_lowercase();
            !excluded.iter().any(|v| booktitle.contains(v.as_str()))
        })
        .map(|r| Publication::from_record(r, self_name))
        .filter(|p| !p.title.is_empty() && !p.year.is_empty())
        .collect()
}

/// Name highlighted in author lists: `site.author`, else the DBLP person.
fn self_name<'a>(config: &'a SiteConfig, person: &'a str) -> SelfName<'a> {
    let author = config.site.author.trim();
    if !author.is_empty() {
        SelfName::Configured(author)
    } else if person != UNKNOWN_PERSON {
        SelfName::Dblp(person)
    } else {
        SelfName::Unknown
    }
}

/// Build the publications page and, when enabled, the BibTeX file.
///
/// A missing source file is not an error: the build is skipped.
pub fn build_publications(config: &SiteConfig) -> Result<()> {
    let section = &config.publications;
    let source = &section.source;
    if !source.is_file() {
        log!("warning"; "{} not found, skipping publications build", source.display());
        return Ok(());
    }

    let xml = fs::read_to_string(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let person =
        dblp::parse(&xml).with_context(|| format!("Failed to parse {}", source.display()))?;

    let publications = select(&person.records, section, self_name(config, &person.name));
    let name = display_name(&person.name);

    let bibtex_path = config.build.output.join(&section.bibtex.path);
    let page = config.publications_page();
    let bibtex_href = section
        .bibtex
        .enable
        .then(|| render::href_from(&page, &bibtex_path));

    render::write_page(config, name, &publications, bibtex_href.as_deref())?;
    if section.bibtex.enable {
        bibtex::write_bibtex(&bibtex_path, &publications)?;
    }

    log!("publications"; "{} listed", plural_count(publications.len(), "publication"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::path::Path;

    fn record(kind: &str, title: &str, year: &str, booktitle: &str) -> DblpRecord {
        DblpRecord {
            kind: kind.into(),
            key: format!("conf/x/{title}"),
            title: title.into(),
            year: year.into(),
            booktitle: booktitle.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_display_name_strips_homonym_suffix() {
        assert_eq!(display_name("John Smith 0001"), "John Smith");
        assert_eq!(display_name("John Smith"), "John Smith");
        assert_eq!(display_name("Agent 007"), "Agent 007");
    }

    #[test]
    fn test_select_filters_kind_and_venue() {
        let records = vec![
            record("inproceedings", "Kept.", "2023", "ACL"),
            record("article", "Journal", "2023", ""),
            record("inproceedings", "Workshop", "2022", "RepL4NLP@ACL"),
            record("inproceedings", "", "2021", "EMNLP"),
            record("inproceedings", "No year", "", "EMNLP"),
        ];
        let section = PublicationsSection::default();

        let pubs = select(&records, &section, SelfName::Unknown);
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].title, "Kept");
    }

    #[test]
    fn test_select_custom_kinds() {
        let records = vec![
            record("inproceedings", "A", "2023", "ACL"),
            record("article", "B", "2023", ""),
        ];
        let section = PublicationsSection {
            kinds: vec!["inproceedings".into(), "article".into()],
            ..Default::default()
        };
        assert_eq!(select(&records, &section, SelfName::Unknown).len(), 2);
    }

    #[test]
    fn test_title_loses_one_period() {
        let records = vec![record("inproceedings", "Ends with dots..", "2023", "ACL")];
        let pubs = select(&records, &PublicationsSection::default(), SelfName::Unknown);
        assert_eq!(pubs[0].title, "Ends with dots.");
    }

    #[test]
    fn test_venue_label() {
        let journal = DblpRecord {
            journal: "TACL".into(),
            volume: "11".into(),
            ..Default::default()
        };
        assert_eq!(Publication::from_record(&journal, SelfName::Unknown).venue, "TACL (11)");

        let both = DblpRecord {
            booktitle: "ACL".into(),
            journal: "CoRR".into(),
            volume: "abs/1".into(),
            ..Default::default()
        };
        assert_eq!(Publication::from_record(&both, SelfName::Unknown).venue, "ACL (abs/1)");

        let none = DblpRecord::default();
        assert_eq!(Publication::from_record(&none, SelfName::Unknown).venue, "");
    }

    #[test]
    fn test_authors_and_link() {
        let rec = DblpRecord {
            authors: vec!["Jane Doe 0002".into(), "John Smith".into()],
            ee: vec!["https://a".into(), "https://b".into()],
            ..Default::default()
        };
        let p = Publication::from_record(&rec, SelfName::Configured("jane doe"));
        assert_eq!(p.authors[0].name, "Jane Doe");
        assert!(p.authors[0].is_self);
        assert!(!p.authors[1].is_self);
        assert_eq!(p.link.as_deref(), Some("https://a"));
    }

    #[test]
    fn test_dblp_homonyms_stay_distinct() {
        let rec = DblpRecord {
            authors: vec!["Jane Doe 0001".into(), "Jane Doe 0002".into()],
            ..Default::default()
        };
        let p = Publication::from_record(&rec, SelfName::Dblp("Jane Doe 0001"));
        let is_self: Vec<_> = p.authors.iter().map(|a| a.is_self).collect();
        assert_eq!(is_self, [true, false]);
        assert_eq!(p.authors[1].name, "Jane Doe");
    }

    #[test]
    fn test_number_publisher_and_editors_carried() {
        let rec = DblpRecord {
            kind: "proceedings".into(),
            editors: vec!["Ed Itor 0003".into()],
            number: "4".into(),
            publisher: "ACL".into(),
            ..Default::default()
        };
        let p = Publication::from_record(&rec, SelfName::Unknown);
        assert!(p.authors.is_empty());
        assert_eq!(p.editors, ["Ed Itor"]);
        assert_eq!(p.number, "4");
        assert_eq!(p.publisher, "ACL");
    }

    #[test]
    fn test_self_name_prefers_site_author() {
        let mut config = test_config(Path::new("/site"));
        assert_eq!(self_name(&config, "Jane Doe 0001"), SelfName::Dblp("Jane Doe 0001"));
        assert_eq!(self_name(&config, UNKNOWN_PERSON), SelfName::Unknown);

        config.site.author = "J. Doe".into();
        assert_eq!(self_name(&config, "Jane Doe"), SelfName::Configured("J. Doe"));
        assert!(SelfName::Configured("j. doe").matches("J. Doe 0007"));
    }

    #[test]
    fn test_build_publications_missing_source_skips() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        build_publications(&config).unwrap();
        assert!(!config.publications_page().exists());
    }

    #[test]
    fn test_build_publications_writes_page_and_bibtex() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        fs::create_dir_all(&config.build.templates).unwrap();
        fs::write(
            config.build.template(render::PUBLICATIONS_TEMPLATE),
            "<h1>{{name}}</h1>{{bibtexLink}}<main>{{items}}</main>",
        )
        .unwrap();
        fs::write(
            &config.publications.source,
            r#"<dblpperson name="Jane Doe"><r><inproceedings key="conf/acl/Doe23">
<author>Jane Doe</author><title>Paper.</title><year>2023</year>
<booktitle>ACL</booktitle><ee>https://doi.org/10.1/x</ee>
</inproceedings></r></dblpperson>"#,
        )
        .unwrap();

        build_publications(&config).unwrap();

        let page = fs::read_to_string(config.publications_page()).unwrap();
        assert!(page.contains("<h1>Jane Doe</h1>"));
        assert!(page.contains("href=\"publications.bib\""));
        assert!(page.contains("<span class=\"author-self\">Jane Doe</span>"));

        let bib = fs::read_to_string(config.build.output.join(&config.publications.bibtex.path))
            .unwrap();
        assert!(bib.starts_with("@inproceedings{DBLP:conf/acl/Doe23,"));
    }
}
