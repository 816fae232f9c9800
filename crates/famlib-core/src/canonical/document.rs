//! Descriptive document normalization
//!
//! Streams the XML once, writing a compact normalized copy:
//! build elements removed with their subtree, timestamp attributes removed,
//! remaining attributes sorted by key, text trimmed, and everything outside
//! elements, text and CDATA dropped.

#![allow(clippy::result_large_err)]

use crate::config::CanonicalConfig;
use crate::errors::{ExError, FamlibError};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashSet;

fn malformed(reason: String) -> ExError {
    ExError::from(FamlibError::MalformedArtifact { reason }).with_op("canonicalize")
}

fn write_err(e: impl std::fmt::Display) -> ExError {
    malformed(format!("cannot write document: {}", e))
}

struct StripRules<'a> {
    elements: HashSet<&'a [u8]>,
    attributes: HashSet<&'a [u8]>,
}

impl<'a> StripRules<'a> {
    fn from_config(config: &'a CanonicalConfig) -> Self {
        Self {
            elements: config
                .stripped_elements
                .iter()
                .map(|s| s.as_bytes())
                .collect(),
            attributes: config
                .stripped_attributes
                .iter()
                .map(|s| s.as_bytes())
                .collect(),
        }
    }
}

/// Rebuild a start tag with stripped attributes removed and the rest sorted
fn normalize_start(
    start: &BytesStart<'_>,
    rules: &StripRules<'_>,
) -> Result<BytesStart<'static>, ExError> {
    let mut kept: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(format!("bad attribute: {}", e)))?;
        if rules.attributes.contains(attr.key.local_name().as_ref()) {
            continue;
        }
        kept.push((attr.key.as_ref().to_vec(), attr.value.to_vec()));
    }
    kept.sort();

    let mut normalized = start.to_owned();
    normalized.clear_attributes();
    for (key, value) in &kept {
        normalized.push_attribute((key.as_slice(), value.as_slice()));
    }
    Ok(normalized)
}

/// Normalize a descriptive XML document
///
/// # Errors
///
/// `MalformedArtifact` when the document is not well-formed: mismatched or
/// unclosed tags, duplicate attributes, no root element, or invalid UTF-8 text.
pub fn canonicalize_document(xml: &[u8], config: &CanonicalConfig) -> Result<Vec<u8>, ExError> {
    let rules = StripRules::from_config(config);
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    // Open elements, and how many of those belong to a stripped subtree
    let mut depth: usize = 0;
    let mut skip_depth: usize = 0;
    let mut saw_root = false;

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            malformed(format!(
                "document is not well-formed at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => {
                if depth == 0 && saw_root {
                    return Err(malformed("document has more than one root element".into()));
                }
                depth += 1;
                saw_root = true;
                if skip_depth > 0 || rules.elements.contains(start.local_name().as_ref()) {
                    skip_depth += 1;
                    continue;
                }
                let normalized = normalize_start(&start, &rules)?;
                writer
                    .write_event(Event::Start(normalized))
                    .map_err(write_err)?;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                writer.write_event(Event::End(end)).map_err(write_err)?;
            }
            Event::Empty(start) => {
                if depth == 0 && saw_root {
                    return Err(malformed("document has more than one root element".into()));
                }
                saw_root = true;
                if skip_depth > 0 || rules.elements.contains(start.local_name().as_ref()) {
                    continue;
                }
                let normalized = normalize_start(&start, &rules)?;
                writer
                    .write_event(Event::Empty(normalized))
                    .map_err(write_err)?;
            }
            Event::Text(text) => {
                if skip_depth > 0 || depth == 0 {
                    continue;
                }
                let raw = std::str::from_utf8(&text)
                    .map_err(|e| malformed(format!("text is not valid UTF-8: {}", e)))?;
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    continue;
                }
                writer
                    .write_event(Event::Text(BytesText::from_escaped(trimmed)))
                    .map_err(write_err)?;
            }
            Event::CData(data) => {
                if skip_depth > 0 || depth == 0 {
                    continue;
                }
                writer.write_event(Event::CData(data)).map_err(write_err)?;
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, DOCTYPE
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed("document ends inside an open element".into()));
    }
    if !saw_root {
        return Err(malformed("document has no root element".into()));
    }
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(xml: &str) -> String {
        let bytes = canonicalize_document(xml.as_bytes(), &CanonicalConfig::default()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_strips_build_subtree_and_timestamps() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- exported -->
<entry updated="2024-01-01T10:00:00Z" id="door">
  <title>Door</title>
  <build><number>4711</number><time>10:00</time></build>
</entry>"#;
        assert_eq!(canon(xml), "<entry id=\"door\"><title>Door</title></entry>");
    }

    #[test]
    fn test_attributes_sorted_by_key() {
        assert_eq!(canon(r#"<a z="1" b="2" m="3"/>"#), r#"<a b="2" m="3" z="1"/>"#);
    }

    #[test]
    fn test_prefixed_timestamp_attribute_stripped_by_local_name() {
        assert_eq!(
            canon(r#"<a xmlns:meta="urn:m" meta:savedAt="now" k="v"/>"#),
            r#"<a k="v" xmlns:meta="urn:m"/>"#
        );
    }

    #[test]
    fn test_formatting_differences_do_not_matter() {
        let compact = canon("<family><param name=\"w\">900</param></family>");
        let spaced = canon("<family>\n    <param name=\"w\">  900 </param>\n</family>\n");
        assert_eq!(compact, spaced);
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let err =
            canonicalize_document(b"<a><b></a>", &CanonicalConfig::default()).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::MalformedArtifact);
    }

    #[test]
    fn test_unclosed_root_is_malformed() {
        assert!(canonicalize_document(b"<a><b/>", &CanonicalConfig::default()).is_err());
    }

    #[test]
    fn test_empty_document_is_malformed() {
        assert!(canonicalize_document(b"   ", &CanonicalConfig::default()).is_err());
    }
}
