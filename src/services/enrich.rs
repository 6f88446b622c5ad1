// src/services/enrich.rs

//! Enrichment strategies applied to every visited concept.

use async_trait::async_trait;

use crate::models::{
    ClassificationEntry, ClassifiedConcept, ConceptRef, FailedRequests, TranslationEntry,
};
use crate::services::description::longest_description;
use crate::services::taxonomy::TaxonomyClient;

/// Turns a visited concept descriptor into an output record.
///
/// Failed fetches are recorded in `failures` and replaced by placeholders;
/// enrichment itself never fails.
#[async_trait]
pub trait Enricher: Send + Sync {
    type Node: Send;

    async fn enrich(
        &self,
        client: &dyn TaxonomyClient,
        concept: &ConceptRef,
        failures: &mut FailedRequests,
    ) -> Self::Node;

    /// Short name used in progress logs.
    fn progress_label<'a>(&self, concept: &'a ConceptRef) -> &'a str {
        concept.display_label()
    }
}

/// Description and mapped instrument names for classification classes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassificationEnricher;

#[async_trait]
impl Enricher for ClassificationEnricher {
    type Node = ClassifiedConcept;

    async fn enrich(
        &self,
        client: &dyn TaxonomyClient,
        concept: &ConceptRef,
        failures: &mut FailedRequests,
    ) -> ClassifiedConcept {
        let page = concept.page();

        let description = match client.description_candidates(&concept.uri).await {
            Ok(candidates) => longest_description(&candidates)
                .unwrap_or_default()
                .to_string(),
            Err(e) => {
                failures.record(&e);
                String::new()
            }
        };

        let instruments = client.mappings(page).await.unwrap_or_else(|e| {
            failures.record(&e);
            Vec::new()
        });

        ClassifiedConcept {
            notation: concept.notation.clone(),
            entry: ClassificationEntry {
                label: concept.display_label().to_string(),
                instruments,
                description,
                page: page.to_string(),
            },
        }
    }

    fn progress_label<'a>(&self, concept: &'a ConceptRef) -> &'a str {
        concept
            .notation
            .as_deref()
            .unwrap_or_else(|| concept.display_label())
    }
}

/// Language-tagged labels for instrument keywords.
#[derive(Debug, Default, Clone, Copy)]
pub struct TranslationEnricher;

#[async_trait]
impl Enricher for TranslationEnricher {
    type Node = TranslationEntry;

    async fn enrich(
        &self,
        client: &dyn TaxonomyClient,
        concept: &ConceptRef,
        failures: &mut FailedRequests,
    ) -> TranslationEntry {
        let page = concept.page();
        let translations = match client.translations(page).await {
            Ok(translations) => Some(translations),
            Err(e) => {
                failures.record(&e);
                None
            }
        };

        TranslationEntry {
            label: concept.display_label().to_string(),
            translations,
            page: page.to_string(),
        }
    }
}
