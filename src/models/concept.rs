//! Payloads returned by the vocabulary REST API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::url::page_from_uri;

/// A concept descriptor as it appears in top concept lists, hierarchy
/// entries and `narrower` child lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRef {
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, rename = "prefLabel", skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,

    #[serde(default, rename = "hasChildren")]
    pub has_children: bool,

    /// Immediate children; only hierarchy entries carry this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrower: Option<Vec<ConceptRef>>,
}

impl ConceptRef {
    /// Trailing path segment of the URI, used as lookup key for enrichment.
    pub fn page(&self) -> &str {
        page_from_uri(&self.uri)
    }

    /// Preferred label, falling back to the plain label.
    pub fn display_label(&self) -> &str {
        self.pref_label
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or_default()
    }

    /// Same descriptor without its child list.
    pub fn without_children(&self) -> Self {
        Self {
            narrower: None,
            ..self.clone()
        }
    }
}

/// Response of `GET {base}/topConcepts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopConcepts {
    #[serde(default)]
    pub topconcepts: Vec<ConceptRef>,
}

/// Response of `GET {base}/hierarchy`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HierarchyResponse {
    #[serde(default, rename = "broaderTransitive")]
    pub broader_transitive: Option<BTreeMap<String, ConceptRef>>,
}

/// What a hierarchy response says about one concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The concept's entry lists its immediate children.
    Children(Vec<ConceptRef>),
    /// The entry is itself a terminal descriptor without `narrower`.
    Leaf(ConceptRef),
    /// Nothing to traverse.
    Empty,
}

impl HierarchyResponse {
    /// Top-level entries in key order; empty when the key is missing.
    pub fn entries(&self) -> impl Iterator<Item = &ConceptRef> {
        self.broader_transitive.iter().flat_map(|map| map.values())
    }

    /// Resolve the children of `uri` from this response.
    pub fn expansion_of(&self, uri: &str) -> Expansion {
        let Some(map) = &self.broader_transitive else {
            log::debug!("\"broaderTransitive\" not in hierarchy data for {uri}");
            return Expansion::Empty;
        };
        let Some(entry) = map.get(uri) else {
            log::debug!("No hierarchy entry for {uri}");
            return Expansion::Empty;
        };
        match &entry.narrower {
            Some(children) => Expansion::Children(children.clone()),
            None => Expansion::Leaf(entry.without_children()),
        }
    }
}

/// Response of `GET {base}/mappings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingsResponse {
    #[serde(default)]
    pub mappings: Option<Vec<Mapping>>,
}

/// One mapped concept of another vocabulary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mapping {
    #[serde(default, rename = "prefLabel")]
    pub pref_label: Option<String>,
}

impl MappingsResponse {
    /// Preferred labels of all mappings, in source order.
    pub fn labels(self) -> Vec<String> {
        self.mappings
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.pref_label)
            .collect()
    }
}
