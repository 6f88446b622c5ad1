//! Service layer for the vocabulary crawler.
//!
//! This module contains the remote-facing logic for:
//! - Vocabulary API access (`TaxonomyClient`, `HttpTaxonomyClient`)
//! - Per-concept enrichment (`ClassificationEnricher`, `TranslationEnricher`)
//! - Detail page and RDF document parsing

pub mod description;
mod enrich;
pub mod rdf;
mod taxonomy;

#[cfg(test)]
pub(crate) mod fake;

pub use enrich::{ClassificationEnricher, Enricher, TranslationEnricher};
pub use taxonomy::{HttpTaxonomyClient, TaxonomyClient};
