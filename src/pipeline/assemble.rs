// src/pipeline/assemble.rs

//! Deterministic ordering and duplicate removal of visited nodes.

use std::collections::HashSet;
use std::collections::btree_map::Entry;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{ClassificationDataset, ClassifiedConcept, TranslationDataset, TranslationEntry};

/// Key nodes by notation code in ascending order; the first node seen for a
/// code wins. Nodes without a notation cannot be keyed and are dropped.
pub fn assemble_classification(nodes: Vec<ClassifiedConcept>) -> ClassificationDataset {
    let mut dataset = ClassificationDataset::new();
    for node in nodes {
        let Some(notation) = node.notation else {
            log::warn!(
                "Skipping concept page {} without notation",
                node.entry.page
            );
            continue;
        };
        match dataset.entry(notation) {
            Entry::Vacant(slot) => {
                slot.insert(node.entry);
            }
            Entry::Occupied(existing) => log::debug!(
                "Duplicate notation {}: keeping page {}, dropping page {}",
                existing.key(),
                existing.get().page,
                node.entry.page
            ),
        }
    }
    dataset
}

/// Sort entries by label (stable) and drop exact duplicates.
pub fn assemble_translations(mut nodes: Vec<TranslationEntry>) -> Result<TranslationDataset> {
    nodes.sort_by(|a, b| a.label.cmp(&b.label));
    remove_duplicates(nodes)
}

/// Keep the first of every group of entries whose canonical JSON is identical.
pub fn remove_duplicates<T: Serialize>(entries: Vec<T>) -> Result<Vec<T>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(fingerprint(&entry)?) {
            unique.push(entry);
        }
    }
    Ok(unique)
}

/// SHA-256 of the canonical serialization (struct field order, sorted maps).
fn fingerprint<T: Serialize>(entry: &T) -> Result<String> {
    let canonical = serde_json::to_vec(entry)?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}
