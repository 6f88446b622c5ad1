// src/models/mod.rs

//! Domain models for the vocabulary crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod concept;
mod config;
mod entry;
mod outcome;

// Re-export all public types
pub use concept::{ConceptRef, Expansion, HierarchyResponse, Mapping, MappingsResponse, TopConcepts};
pub use config::{Config, CrawlerConfig, OutputConfig, VocabularyConfig};
pub use entry::{
    ClassificationDataset, ClassificationEntry, ClassifiedConcept, TranslationDataset,
    TranslationEntry,
};
pub use outcome::{CrawlOutcome, FailedRequests, RootFailure};
