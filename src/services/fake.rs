//! In-memory [`TaxonomyClient`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{ConceptRef, HierarchyResponse};
use crate::services::rdf::Translations;
use crate::services::taxonomy::TaxonomyClient;
use crate::utils::url::page_from_uri;

const BASE: &str = "http://vocab.test";

/// Serves canned responses; anything not configured answers 404.
#[derive(Default)]
pub struct FakeTaxonomyClient {
    top_concepts: Option<Vec<ConceptRef>>,
    hierarchies: HashMap<String, HierarchyResponse>,
    descriptions: HashMap<String, Vec<String>>,
    mappings: HashMap<String, Vec<String>>,
    translations: HashMap<String, Translations>,
    requests: Mutex<Vec<String>>,
}

impl FakeTaxonomyClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_concepts(mut self, concepts: Vec<ConceptRef>) -> Self {
        self.top_concepts = Some(concepts);
        self
    }

    pub fn with_hierarchy(mut self, page: &str, json: &str) -> Self {
        let response = serde_json::from_str(json).expect("valid hierarchy json");
        self.hierarchies.insert(page.to_string(), response);
        self
    }

    pub fn with_description(mut self, page: &str, candidates: &[&str]) -> Self {
        self.descriptions
            .insert(page.to_string(), candidates.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_mappings(mut self, page: &str, labels: &[&str]) -> Self {
        self.mappings
            .insert(page.to_string(), labels.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_translations(mut self, page: &str, labels: &[(&str, &str)]) -> Self {
        self.translations.insert(
            page.to_string(),
            labels
                .iter()
                .map(|(lang, label)| (lang.to_string(), Some(label.to_string())))
                .collect(),
        );
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of hierarchy requests issued for a page.
    pub fn hierarchy_requests(&self, page: &str) -> usize {
        let url = hierarchy_url(page);
        self.requests().iter().filter(|r| **r == url).count()
    }

    fn serve<T: Clone>(&self, url: String, value: Option<&T>) -> Result<T> {
        self.requests.lock().unwrap().push(url.clone());
        value
            .cloned()
            .ok_or(AppError::Remote { url, status: 404 })
    }
}

pub fn hierarchy_url(page: &str) -> String {
    format!("{BASE}/hierarchy?uri={page}&lang=en")
}

pub fn mappings_url(page: &str) -> String {
    format!("{BASE}/mappings?uri={page}&lang=en&clang=en")
}

#[async_trait]
impl TaxonomyClient for FakeTaxonomyClient {
    async fn top_concepts(&self) -> Result<Vec<ConceptRef>> {
        self.serve(format!("{BASE}/topConcepts?lang=en"), self.top_concepts.as_ref())
    }

    async fn hierarchy(&self, page: &str) -> Result<HierarchyResponse> {
        self.serve(hierarchy_url(page), self.hierarchies.get(page))
    }

    async fn mappings(&self, page: &str) -> Result<Vec<String>> {
        self.serve(mappings_url(page), self.mappings.get(page))
    }

    async fn description_candidates(&self, uri: &str) -> Result<Vec<String>> {
        self.serve(uri.to_string(), self.descriptions.get(page_from_uri(uri)))
    }

    async fn translations(&self, page: &str) -> Result<Translations> {
        self.serve(
            format!("{BASE}/data?uri={page}&format=application/rdf+xml"),
            self.translations.get(page),
        )
    }
}
