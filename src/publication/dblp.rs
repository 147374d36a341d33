//! DBLP person export parsing.
//!
//! Reads the XML served at `https://dblp.org/pid/<pid>.xml`:
//!
//! ```xml
//! <dblpperson name="Jane Doe" pid="12/345" n="2">
//!   <person key="homepages/12/345">...</person>
//!   <r><inproceedings key="conf/acl/Doe23">
//!     <author pid="12/345">Jane Doe</author>
//!     <title>A <i>Study</i>.</title>
//!     <year>2023</year>
//!     <booktitle>ACL</booktitle>
//!     <ee>https://doi.org/10.1/x</ee>
//!   </inproceedings></r>
//! </dblpperson>
//! ```
//!
//! Nested markup inside a field (`<i>`, `<sub>`) is flattened to its text.

use anyhow::{Context, Result};
use quick_xml::{Reader, events::Event};
use std::borrow::Cow;

/// Person name used when the export has none.
pub const UNKNOWN_PERSON: &str = "Your Name";

/// One `<r>` record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DblpRecord {
    /// Element name: `inproceedings`, `article`, ...
    pub kind: String,
    /// DBLP key, e.g. `conf/acl/Doe23`.
    pub key: String,
    pub authors: Vec<String>,
    pub editors: Vec<String>,
    pub title: String,
    pub year: String,
    pub booktitle: String,
    pub journal: String,
    pub volume: String,
    pub number: String,
    pub pages: String,
    pub publisher: String,
    /// Electronic editions, in document order.
    pub ee: Vec<String>,
    pub doi: String,
}

impl DblpRecord {
    fn set_field(&mut self, field: &str, value: String) {
        match field {
            "author" if !value.is_empty() => self.authors.push(value),
            "editor" if !value.is_empty() => self.editors.push(value),
            "ee" if !value.is_empty() => self.ee.push(value),
            // First occurrence wins for scalar fields
            "title" => set_once(&mut self.title, value),
            "year" => set_once(&mut self.year, value),
            "booktitle" => set_once(&mut self.booktitle, value),
            "journal" => set_once(&mut self.journal, value),
            "volume" => set_once(&mut self.volume, value),
            "number" => set_once(&mut self.number, value),
            "pages" => set_once(&mut self.pages, value),
            "publisher" => set_once(&mut self.publisher, value),
            "doi" => set_once(&mut self.doi, value),
            _ => {}
        }
    }
}

#[inline]
fn set_once(slot: &mut String, value: String) {
    if slot.is_empty() {
        *slot = value;
    }
}

/// Parsed export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DblpPerson {
    /// `name` attribute of `<dblpperson>`, or [`UNKNOWN_PERSON`].
    pub name: String,
    pub records: Vec<DblpRecord>,
}

/// Field being collected inside a record.
struct OpenField {
    name: String,
    depth: usize,
    text: String,
}

/// Parse a DBLP person XML document.
pub fn parse(xml: &str) -> Result<DblpPerson> {
    let mut reader = Reader::from_str(xml);

    let mut name: Option<String> = None;
    let mut records = Vec::new();

    let mut depth = 0usize;
    let mut in_r = false;
    let mut record: Option<(DblpRecord, usize)> = None;
    let mut field: Option<OpenField> = None;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("malformed DBLP XML near byte {}", reader.buffer_position()))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                if tag == "dblpperson" && name.is_none() {
                    name = attribute(&e, "name");
                } else if tag == "r" && record.is_none() {
                    in_r = true;
                } else if in_r && record.is_none() {
                    let rec = DblpRecord {
                        key: attribute(&e, "key").unwrap_or_default(),
                        kind: tag,
                        ..Default::default()
                    };
                    record = Some((rec, depth));
                } else if let Some((_, rec_depth)) = &record
                    && field.is_none()
                    && depth == rec_depth + 1
                {
                    field = Some(OpenField {
                        name: tag,
                        depth,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(e) => {
                if name.is_none() && e.name().as_ref() == b"dblpperson" {
                    name = attribute(&e, "name");
                }
            }
            Event::End(_) => {
                if let Some(open) = field.take_if(|f| f.depth == depth)
                    && let Some((rec, _)) = record.as_mut()
                {
                    rec.set_field(&open.name, collapse_whitespace(&open.text));
                } else if let Some((rec, _)) = record.take_if(|(_, d)| *d == depth) {
                    records.push(rec);
                } else if in_r && record.is_none() {
                    // Closing </r>
                    in_r = false;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) => {
                if let Some(open) = field.as_mut() {
                    open.text.push_str(&unescape(&String::from_utf8_lossy(&t)));
                }
            }
            Event::CData(t) => {
                if let Some(open) = field.as_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::GeneralRef(r) => {
                if let Some(open) = field.as_mut() {
                    open.text.push_str(&resolve_entity(&String::from_utf8_lossy(&r)));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(DblpPerson {
        name: name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PERSON.to_string()),
        records,
    })
}

/// Read and unescape an attribute value.
fn attribute(e: &quick_xml::events::BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .map(|a| unescape(&String::from_utf8_lossy(&a.value)).into_owned())
}

/// Trim and fold runs of whitespace (line breaks inside long titles).
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace entity references (`&amp;`, `&#233;`, `&#xE9;`, `&eacute;`).
///
/// Unknown named entities are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';') {
            Some(semi) if semi > 0 && semi <= 10 => {
                out.push_str(&resolve_entity(&after[..semi]));
                rest = &after[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Resolve an entity name (without `&` and `;`).
fn resolve_entity(name: &str) -> Cow<'static, str> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        if let Some(c) = code.and_then(char::from_u32) {
            return Cow::Owned(c.to_string());
        }
        return Cow::Owned(format!("&{name};"));
    }

    let resolved = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        // Latin-1 letters declared in dblp.dtd
        "Agrave" => "À",
        "Aacute" => "Á",
        "Acirc" => "Â",
        "Atilde" => "Ã",
        "Auml" => "Ä",
        "Aring" => "Å",
        "AElig" => "Æ",
        "Ccedil" => "Ç",
        "Egrave" => "È",
        "Eacute" => "É",
        "Ecirc" => "Ê",
        "Euml" => "Ë",
        "Igrave" => "Ì",
        "Iacute" => "Í",
        "Icirc" => "Î",
        "Iuml" => "Ï",
        "ETH" => "Ð",
        "Ntilde" => "Ñ",
        "Ograve" => "Ò",
        "Oacute" => "Ó",
        "Ocirc" => "Ô",
        "Otilde" => "Õ",
        "Ouml" => "Ö",
        "Oslash" => "Ø",
        "Ugrave" => "Ù",
        "Uacute" => "Ú",
        "Ucirc" => "Û",
        "Uuml" => "Ü",
        "Yacute" => "Ý",
        "THORN" => "Þ",
        "szlig" => "ß",
        "agrave" => "à",
        "aacute" => "á",
        "acirc" => "â",
        "atilde" => "ã",
        "auml" => "ä",
        "aring" => "å",
        "aelig" => "æ",
        "ccedil" => "ç",
        "egrave" => "è",
        "eacute" => "é",
        "ecirc" => "ê",
        "euml" => "ë",
        "igrave" => "ì",
        "iacute" => "í",
        "icirc" => "î",
        "iuml" => "ï",
        "eth" => "ð",
        "ntilde" => "ñ",
        "ograve" => "ò",
        "oacute" => "ó",
        "ocirc" => "ô",
        "otilde" => "õ",
        "ouml" => "ö",
        "oslash" => "ø",
        "ugrave" => "ù",
        "uacute" => "ú",
        "ucirc" => "û",
        "uuml" => "ü",
        "yacute" => "ý",
        "thorn" => "þ",
        "yuml" => "ÿ",
        _ => return Cow::Owned(format!("&{name};")),
    };
    Cow::Borrowed(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="US-ASCII"?>
<dblpperson name="Jane Doe" pid="12/345" n="3">
<person key="homepages/12/345" mdate="2024-01-01">
<author pid="12/345">Jane Doe</author>
</person>
<r><inproceedings key="conf/acl/DoeS23" mdate="2023-07-01">
<author pid="12/345">Jane Doe</author>
<author pid="99/1">John Smith 0001</author>
<title>Sparse <i>Attention</i>
 at Scale.</title>
<pages>1-10</pages>
<year>2023</year>
<booktitle>ACL (1)</booktitle>
<ee type="oa">https://doi.org/10.18653/v1/2023.acl-long.1</ee>
<ee>https://aclanthology.org/2023.acl-long.1</ee>
<crossref>conf/acl/2023-1</crossref>
<url>db/conf/acl/acl2023-1.html#DoeS23</url>
</inproceedings>
</r>
<r><article key="journals/corr/abs-2301-00001" mdate="2023-01-05" publtype="informal">
<author pid="12/345">Jane Doe</author>
<title>M&uuml;ller &amp; Co.</title>
<journal>CoRR</journal>
<volume>abs/2301.00001</volume>
<year>2023</year>
<ee type="oa">https://arxiv.org/abs/2301.00001</ee>
</article>
</r>
<coauthors n="1" nc="1">
<co c="0"><na f="s/Smith:John" pid="99/1">John Smith 0001</na></co>
</coauthors>
</dblpperson>
"#;

    #[test]
    fn test_parse_person_name() {
        let person = parse(SAMPLE).unwrap();
        assert_eq!(person.name, "Jane Doe");
    }

    #[test]
    fn test_parse_records() {
        let person = parse(SAMPLE).unwrap();
        assert_eq!(person.records.len(), 2);

        let first = &person.records[0];
        assert_eq!(first.kind, "inproceedings");
        assert_eq!(first.key, "conf/acl/DoeS23");
        assert_eq!(first.authors, vec!["Jane Doe", "John Smith 0001"]);
        assert_eq!(first.title, "Sparse Attention at Scale.");
        assert_eq!(first.year, "2023");
        assert_eq!(first.booktitle, "ACL (1)");
        assert_eq!(first.pages, "1-10");
        assert_eq!(first.ee.len(), 2);
        assert_eq!(first.ee[0], "https://doi.org/10.18653/v1/2023.acl-long.1");
    }

    #[test]
    fn test_parse_entities() {
        let person = parse(SAMPLE).unwrap();
        let second = &person.records[1];
        assert_eq!(second.kind, "article");
        assert_eq!(second.title, "Müller & Co.");
        assert_eq!(second.journal, "CoRR");
        assert_eq!(second.volume, "abs/2301.00001");
    }

    #[test]
    fn test_person_and_coauthors_are_not_records() {
        let person = parse(SAMPLE).unwrap();
        assert!(person.records.iter().all(|r| !r.kind.is_empty() && r.kind != "person"));
    }

    #[test]
    fn test_editors_kept_apart_from_authors() {
        let person = parse(
            r#"<dblpperson name="Ed Itor"><r><proceedings key="conf/x/2024">
<editor>Ed Itor</editor><title>Proceedings.</title><year>2024</year>
<number>2</number><publisher>ACL</publisher>
</proceedings></r></dblpperson>"#,
        )
        .unwrap();
        let record = &person.records[0];
        assert!(record.authors.is_empty());
        assert_eq!(record.editors, vec!["Ed Itor"]);
        assert_eq!(record.number, "2");
        assert_eq!(record.publisher, "ACL");
    }

    #[test]
    fn test_missing_name_defaults() {
        let person = parse("<dblpperson></dblpperson>").unwrap();
        assert_eq!(person.name, UNKNOWN_PERSON);
        assert!(person.records.is_empty());
    }

    #[test]
    fn test_name_attribute_unescaped() {
        let person = parse(r#"<dblpperson name="J&#246;rg O&apos;Neil"/>"#).unwrap();
        assert_eq!(person.name, "Jörg O'Neil");
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(parse("<dblpperson><r><inproceedings></r></dblpperson>").is_err());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("&#233;&#xE9;&eacute;"), "ééé");
        assert_eq!(unescape("&unknown; & stray"), "&unknown; & stray");
    }
}
