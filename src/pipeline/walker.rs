// src/pipeline/walker.rs

//! Depth-first traversal of a vocabulary tree.
//!
//! The walker keeps an explicit work stack instead of recursing, so the
//! depth of the remote tree never limits the crawl. Children are visited in
//! the order the service returns them, each one before its own subtree.

use std::collections::HashSet;

use crate::error::AppError;
use crate::models::{ConceptRef, Expansion, FailedRequests, HierarchyResponse, RootFailure};
use crate::services::{Enricher, TaxonomyClient};

/// Mutable state of one crawl run.
#[derive(Debug, Default)]
struct CrawlState {
    max_count: Option<usize>,
    visited: usize,
    failures: FailedRequests,
    seen: HashSet<String>,
    expanded: HashSet<String>,
}

impl CrawlState {
    fn new(max_count: Option<usize>) -> Self {
        Self {
            max_count,
            ..Self::default()
        }
    }

    /// Whether the global visit cap has been reached.
    fn cap_reached(&self) -> bool {
        self.max_count.is_some_and(|max| self.visited >= max)
    }
}

/// What a finished walk produced, before assembly.
#[derive(Debug)]
pub struct Walk<N> {
    pub nodes: Vec<N>,
    pub visited: usize,
    pub failures: FailedRequests,
    pub root_failure: Option<RootFailure>,
}

enum Step {
    Visit { concept: ConceptRef, depth: usize },
    Expand { concept: ConceptRef, depth: usize },
}

/// Traversal engine parameterized by the enrichment strategy.
pub struct TreeWalker<'a, E: Enricher> {
    client: &'a dyn TaxonomyClient,
    enricher: &'a E,
    state: CrawlState,
    nodes: Vec<E::Node>,
    stack: Vec<Step>,
    root_failure: Option<RootFailure>,
}

impl<'a, E: Enricher> TreeWalker<'a, E> {
    pub fn new(client: &'a dyn TaxonomyClient, enricher: &'a E, max_count: Option<usize>) -> Self {
        Self {
            client,
            enricher,
            state: CrawlState::new(max_count),
            nodes: Vec::new(),
            stack: Vec::new(),
            root_failure: None,
        }
    }

    /// Walk every top concept of the vocabulary and their subtrees.
    pub async fn walk_top_concepts(mut self) -> Walk<E::Node> {
        match self.client.top_concepts().await {
            Ok(concepts) => {
                log::info!("Found {} top concepts", concepts.len());
                self.schedule(concepts, 0);
                self.drain().await;
            }
            Err(e) => self.fail_root(&e),
        }
        self.finish()
    }

    /// Walk the entries of a root page's hierarchy and their subtrees.
    pub async fn walk_from_root(mut self, page: &str) -> Walk<E::Node> {
        match self.client.hierarchy(page).await {
            Ok(response) => {
                self.schedule_root(&response, page);
                self.drain().await;
            }
            Err(e) => self.fail_root(&e),
        }
        self.finish()
    }

    /// Every top-level entry is visited first, then its children from the same response.
    /// Entries listed without children of their own (ancestors of the root page) are
    /// expanded through their own hierarchy when flagged `hasChildren`.
    fn schedule_root(&mut self, response: &HierarchyResponse, root_page: &str) {
        let entries: Vec<ConceptRef> = response.entries().cloned().collect();
        if entries.is_empty() {
            log::warn!("\"broaderTransitive\" not in root hierarchy data; nothing to crawl");
        }

        for entry in entries.iter().rev() {
            match response.expansion_of(&entry.uri) {
                Expansion::Children(children) => {
                    self.state.expanded.insert(entry.uri.clone());
                    self.schedule(children, 1);
                }
                Expansion::Leaf(leaf) if leaf.has_children && leaf.page() != root_page => {
                    self.stack.push(Step::Expand {
                        concept: leaf,
                        depth: 0,
                    });
                }
                _ => {
                    self.state.expanded.insert(entry.uri.clone());
                }
            }
            self.stack.push(Step::Visit {
                concept: entry.without_children(),
                depth: 0,
            });
        }
    }

    /// Push children so that they pop in source order, each before its subtree.
    fn schedule(&mut self, children: Vec<ConceptRef>, depth: usize) {
        for child in children.into_iter().rev() {
            if child.has_children {
                self.stack.push(Step::Expand {
                    concept: child.clone(),
                    depth,
                });
            }
            self.stack.push(Step::Visit {
                concept: child,
                depth,
            });
        }
    }

    async fn drain(&mut self) {
        while let Some(step) = self.stack.pop() {
            if self.state.cap_reached() {
                log::info!("Reached max count of {} visited concepts", self.state.visited);
                self.stack.clear();
                break;
            }
            match step {
                Step::Visit { concept, depth } => self.visit(concept, depth).await,
                Step::Expand { concept, depth } => self.expand(concept, depth).await,
            }
        }
    }

    async fn visit(&mut self, concept: ConceptRef, depth: usize) {
        if !self.state.seen.insert(concept.uri.clone()) {
            log::debug!("Already visited {}", concept.uri);
            return;
        }

        log::debug!(
            "{} Processing: {}",
            "-".repeat(depth),
            self.enricher.progress_label(&concept)
        );

        let node = self
            .enricher
            .enrich(self.client, &concept, &mut self.state.failures)
            .await;
        self.nodes.push(node);
        self.state.visited += 1;
    }

    async fn expand(&mut self, concept: ConceptRef, depth: usize) {
        if !self.state.expanded.insert(concept.uri.clone()) {
            log::debug!("Already expanded {}", concept.uri);
            return;
        }

        let response = match self.client.hierarchy(concept.page()).await {
            Ok(response) => response,
            Err(e) => {
                self.state.failures.record(&e);
                return;
            }
        };

        if let Expansion::Children(children) = response.expansion_of(&concept.uri) {
            self.schedule(children, depth + 1);
        }
    }

    fn fail_root(&mut self, error: &AppError) {
        log::error!("Root fetch failed, crawl is empty: {error}");
        self.state.failures.record(error);
        self.root_failure = Some(RootFailure::from(error));
    }

    fn finish(self) -> Walk<E::Node> {
        Walk {
            nodes: self.nodes,
            visited: self.state.visited,
            failures: self.state.failures,
            root_failure: self.root_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TranslationEntry;
    use crate::services::fake::{FakeTaxonomyClient, hierarchy_url};
    use crate::services::{ClassificationEnricher, TranslationEnricher};

    fn concept(page: &str, notation: &str, has_children: bool) -> ConceptRef {
        ConceptRef {
            uri: format!("http://vocab.test/hs/{page}"),
            label: Some(format!("Class {notation}")),
            notation: Some(notation.to_string()),
            has_children,
            ..ConceptRef::default()
        }
    }

    fn hierarchy_json(page: &str, children: &[(&str, &str, bool)]) -> String {
        let narrower: Vec<String> = children
            .iter()
            .map(|(p, n, c)| {
                format!(
                    r#"{{"uri": "http://vocab.test/hs/{p}", "label": "Class {n}", "notation": "{n}", "hasChildren": {c}}}"#
                )
            })
            .collect();
        format!(
            r#"{{"broaderTransitive": {{"http://vocab.test/hs/{page}": {{"uri": "http://vocab.test/hs/{page}", "prefLabel": "Page {page}", "hasChildren": true, "narrower": [{}]}}}}}}"#,
            narrower.join(",")
        )
    }

    /// 1 -> (11 -> (111, 112), 12)
    fn small_tree() -> FakeTaxonomyClient {
        FakeTaxonomyClient::new()
            .with_top_concepts(vec![concept("1", "1", true)])
            .with_hierarchy("1", &hierarchy_json("1", &[("11", "11", true), ("12", "12", false)]))
            .with_hierarchy(
                "11",
                &hierarchy_json("11", &[("111", "111", false), ("112", "112", false)]),
            )
    }

    fn notations(walk: &Walk<crate::models::ClassifiedConcept>) -> Vec<&str> {
        walk.nodes
            .iter()
            .map(|n| n.notation.as_deref().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn visits_in_pre_order() {
        let client = small_tree();
        let walk = TreeWalker::new(&client, &ClassificationEnricher, None)
            .walk_top_concepts()
            .await;

        assert_eq!(notations(&walk), vec!["1", "11", "111", "112", "12"]);
        assert_eq!(walk.visited, 5);
        assert!(walk.root_failure.is_none());
    }

    #[tokio::test]
    async fn leaves_are_enriched_but_never_expanded() {
        let client = small_tree().with_description("12", &["Plucked"]);
        let walk = TreeWalker::new(&client, &ClassificationEnricher, None)
            .walk_top_concepts()
            .await;

        let leaf = walk
            .nodes
            .iter()
            .find(|n| n.notation.as_deref() == Some("12"))
            .unwrap();
        assert_eq!(leaf.entry.description, "Plucked");
        for page in ["12", "111", "112"] {
            assert_eq!(client.hierarchy_requests(page), 0, "page {page}");
        }
        assert_eq!(client.hierarchy_requests("1"), 1);
        assert_eq!(client.hierarchy_requests("11"), 1);
    }

    #[tokio::test]
    async fn missing_key_means_no_children_and_no_failure() {
        let client = FakeTaxonomyClient::new()
            .with_top_concepts(vec![concept("1", "1", true)])
            .with_hierarchy("1", r#"{"uri": "http://vocab.test/hs/1"}"#)
            .with_description("1", &["Idiophones"])
            .with_mappings("1", &[]);
        let walk = TreeWalker::new(&client, &ClassificationEnricher, None)
            .walk_top_concepts()
            .await;

        assert_eq!(walk.visited, 1);
        assert!(walk.failures.is_empty());
    }

    #[tokio::test]
    async fn visit_cap_is_never_exceeded() {
        for cap in 0..=6 {
            let client = small_tree();
            let walk = TreeWalker::new(&client, &ClassificationEnricher, Some(cap))
                .walk_top_concepts()
                .await;

            assert_eq!(walk.visited, cap.min(5), "cap {cap}");
            assert_eq!(walk.nodes.len(), walk.visited);
        }
    }

    #[tokio::test]
    async fn cap_stops_expansion() {
        let client = small_tree();
        let walk = TreeWalker::new(&client, &ClassificationEnricher, Some(2))
            .walk_top_concepts()
            .await;

        assert_eq!(notations(&walk), vec!["1", "11"]);
        assert_eq!(client.hierarchy_requests("11"), 0);
    }

    #[tokio::test]
    async fn failed_hierarchy_abandons_only_that_branch() {
        let client = FakeTaxonomyClient::new()
            .with_top_concepts(vec![concept("1", "1", true), concept("2", "2", true)])
            .with_hierarchy("2", &hierarchy_json("2", &[("21", "21", false)]));
        let walk = TreeWalker::new(&client, &ClassificationEnricher, None)
            .walk_top_concepts()
            .await;

        assert_eq!(notations(&walk), vec!["1", "2", "21"]);
        assert!(walk.failures.urls().contains(&hierarchy_url("1")));
        assert!(walk.root_failure.is_none());
    }

    #[tokio::test]
    async fn failed_top_concepts_is_a_root_failure() {
        let client = FakeTaxonomyClient::new();
        let walk = TreeWalker::new(&client, &ClassificationEnricher, None)
            .walk_top_concepts()
            .await;

        assert!(walk.nodes.is_empty());
        let failure = walk.root_failure.unwrap();
        assert_eq!(failure.url, "http://vocab.test/topConcepts?lang=en");
        assert_eq!(walk.failures.urls(), [failure.url]);
    }

    #[tokio::test]
    async fn cycles_are_not_followed() {
        let client = FakeTaxonomyClient::new()
            .with_top_concepts(vec![concept("1", "1", true)])
            .with_hierarchy("1", &hierarchy_json("1", &[("2", "2", true)]))
            .with_hierarchy("2", &hierarchy_json("2", &[("1", "1", true)]));
        let walk = TreeWalker::new(&client, &ClassificationEnricher, None)
            .walk_top_concepts()
            .await;

        assert_eq!(notations(&walk), vec!["1", "2"]);
        assert_eq!(client.hierarchy_requests("1"), 1);
    }

    #[tokio::test]
    async fn root_walk_visits_entries_then_children() {
        let root = r#"{"broaderTransitive": {
            "http://vocab.test/hs/2208": {
                "uri": "http://vocab.test/hs/2208",
                "prefLabel": "Instruments",
                "hasChildren": true,
                "narrower": [
                    {"uri": "http://vocab.test/hs/3", "label": "Flutes", "hasChildren": true},
                    {"uri": "http://vocab.test/hs/4", "label": "Drums", "hasChildren": false}
                ]
            }
        }}"#;
        let flutes = r#"{"broaderTransitive": {
            "http://vocab.test/hs/3": {"uri": "http://vocab.test/hs/3", "prefLabel": "Flutes", "hasChildren": true}
        }}"#;
        let client = FakeTaxonomyClient::new()
            .with_hierarchy("2208", root)
            .with_hierarchy("3", flutes)
            .with_translations("2208", &[("en", "Instruments")])
            .with_translations("3", &[("en", "Flutes"), ("de", "Flöten")]);

        let walk = TreeWalker::new(&client, &TranslationEnricher, None)
            .walk_from_root("2208")
            .await;

        let labels: Vec<&str> = walk.nodes.iter().map(|n: &TranslationEntry| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Instruments", "Flutes", "Drums"]);
        assert_eq!(client.hierarchy_requests("2208"), 1);
        assert_eq!(client.hierarchy_requests("3"), 1);
        // Drums has no translations configured.
        assert_eq!(walk.failures.len(), 1);
        assert_eq!(walk.nodes[2].translations, None);
    }

    #[tokio::test]
    async fn leaf_entry_in_root_response_is_visited() {
        let root = r#"{"broaderTransitive": {
            "http://vocab.test/hs/77": {"uri": "http://vocab.test/hs/77", "prefLabel": "Ocarina", "hasChildren": false}
        }}"#;
        let client = FakeTaxonomyClient::new()
            .with_hierarchy("77", root)
            .with_translations("77", &[("en", "Ocarina")]);

        let walk = TreeWalker::new(&client, &TranslationEnricher, None)
            .walk_from_root("77")
            .await;

        assert_eq!(walk.visited, 1);
        assert_eq!(walk.nodes[0].label, "Ocarina");
        assert!(walk.failures.is_empty());
    }

    #[tokio::test]
    async fn ancestor_entry_without_narrower_is_expanded() {
        let root = r#"{"broaderTransitive": {
            "http://vocab.test/kw/0": {"uri": "http://vocab.test/kw/0", "prefLabel": "Ancestor", "hasChildren": true},
            "http://vocab.test/kw/1": {
                "uri": "http://vocab.test/kw/1", "prefLabel": "Root", "hasChildren": true,
                "narrower": [{"uri": "http://vocab.test/kw/5", "label": "Harp", "hasChildren": false}]
            }
        }}"#;
        let ancestor = r#"{"broaderTransitive": {
            "http://vocab.test/kw/0": {
                "uri": "http://vocab.test/kw/0", "prefLabel": "Ancestor", "hasChildren": true,
                "narrower": [
                    {"uri": "http://vocab.test/kw/1", "label": "Root", "hasChildren": true},
                    {"uri": "http://vocab.test/kw/2", "label": "Sibling", "hasChildren": false}
                ]
            }
        }}"#;
        let client = FakeTaxonomyClient::new()
            .with_hierarchy("1", root)
            .with_hierarchy("0", ancestor);

        let walk = TreeWalker::new(&client, &TranslationEnricher, None)
            .walk_from_root("1")
            .await;

        let labels: Vec<&str> = walk.nodes.iter().map(|n: &TranslationEntry| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Ancestor", "Root", "Sibling", "Harp"]);
        assert_eq!(client.hierarchy_requests("0"), 1);
        assert_eq!(client.hierarchy_requests("1"), 1);
        assert_eq!(walk.visited, 4);
    }

    #[tokio::test]
    async fn root_entry_without_narrower_is_not_fetched_twice() {
        let root = r#"{"broaderTransitive": {
            "http://vocab.test/kw/8": {"uri": "http://vocab.test/kw/8", "prefLabel": "Lute", "hasChildren": true}
        }}"#;
        let client = FakeTaxonomyClient::new()
            .with_hierarchy("8", root)
            .with_translations("8", &[("en", "Lute")]);

        let walk = TreeWalker::new(&client, &TranslationEnricher, None)
            .walk_from_root("8")
            .await;

        assert_eq!(walk.visited, 1);
        assert_eq!(client.hierarchy_requests("8"), 1);
        assert!(walk.failures.is_empty());
    }

    #[tokio::test]
    async fn failed_root_hierarchy_is_a_root_failure() {
        let client = FakeTaxonomyClient::new();
        let walk = TreeWalker::new(&client, &TranslationEnricher, None)
            .walk_from_root("2208")
            .await;

        assert!(walk.nodes.is_empty());
        assert_eq!(walk.root_failure.unwrap().url, hierarchy_url("2208"));
    }
}
