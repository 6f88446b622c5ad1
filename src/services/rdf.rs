// src/services/rdf.rs

//! Translation extraction from RDF/XML concept documents.
//!
//! A concept document embeds neighbouring concepts (broader, narrower,
//! related) with their own labels. Only `skos:prefLabel` elements that are
//! direct children of the requested `skos:Concept` count as translations.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

const SKOS_NS: &[u8] = b"http://www.w3.org/2004/02/skos/core#";
const RDF_NS: &[u8] = b"http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const XML_NS: &[u8] = b"http://www.w3.org/XML/1998/namespace";

/// Language code to label; `None` for a label element without text.
pub type Translations = BTreeMap<String, Option<String>>;

/// Label currently being read.
struct PendingLabel {
    lang: Option<String>,
    text: Option<String>,
}

/// Extract the language-tagged preferred labels of `concept_uri`.
///
/// Returns an empty map when the document has no matching concept.
/// Labels without `xml:lang` are skipped; a repeated language keeps the last label.
/// Label text is taken verbatim, whitespace included.
pub fn parse_translations(xml: &str, concept_uri: &str) -> quick_xml::Result<Translations> {
    let mut reader = NsReader::from_str(xml);

    let mut translations = Translations::new();
    let mut depth = 0usize;
    let mut concept_depth: Option<usize> = None;
    let mut found = false;
    let mut pending: Option<PendingLabel> = None;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let skos = is_bound(&ns, SKOS_NS);
        match event {
            Event::Start(e) => {
                depth += 1;
                match concept_depth {
                    None if is_skos(skos, &e, b"Concept")
                        && about(&reader, &e)?.as_deref() == Some(concept_uri) =>
                    {
                        concept_depth = Some(depth);
                        found = true;
                    }
                    Some(cd) if depth == cd + 1 && is_skos(skos, &e, b"prefLabel") => {
                        pending = Some(PendingLabel {
                            lang: lang(&reader, &e)?,
                            text: None,
                        });
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match concept_depth {
                None if is_skos(skos, &e, b"Concept")
                    && about(&reader, &e)?.as_deref() == Some(concept_uri) =>
                {
                    found = true;
                    break;
                }
                Some(cd) if depth == cd && is_skos(skos, &e, b"prefLabel") => {
                    if let Some(code) = lang(&reader, &e)? {
                        translations.insert(code, None);
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if let Some(label) = pending.as_mut() {
                    label
                        .text
                        .get_or_insert_with(String::new)
                        .push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if let Some(label) = pending.as_mut() {
                    label
                        .text
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(_) => {
                if let Some(cd) = concept_depth {
                    if depth == cd + 1 {
                        if let Some(label) = pending.take() {
                            match label.lang {
                                Some(code) => {
                                    translations.insert(code, label.text);
                                }
                                None => log::debug!(
                                    "Skipping prefLabel without language tag for {concept_uri}"
                                ),
                            }
                        }
                    } else if depth == cd {
                        break;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !found {
        log::debug!("No matching concept found for {concept_uri}");
    }
    Ok(translations)
}

fn is_skos(skos: bool, e: &BytesStart, local: &[u8]) -> bool {
    skos && e.local_name().as_ref() == local
}

fn is_bound(ns: &ResolveResult, expected: &[u8]) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(bound)) if *bound == expected)
}

/// Value of the attribute `{namespace}local`, if present.
fn attribute(
    reader: &NsReader<&[u8]>,
    e: &BytesStart,
    namespace: &[u8],
    local: &[u8],
) -> quick_xml::Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        let (ns, name) = reader.resolve_attribute(attr.key);
        if is_bound(&ns, namespace) && name.as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn about(reader: &NsReader<&[u8]>, e: &BytesStart) -> quick_xml::Result<Option<String>> {
    attribute(reader, e, RDF_NS, b"about")
}

fn lang(reader: &NsReader<&[u8]>, e: &BytesStart) -> quick_xml::Result<Option<String>> {
    // The `xml` prefix is reserved and never declared, so match it by name too.
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"xml:lang" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    attribute(reader, e, XML_NS, b"lang")
}
