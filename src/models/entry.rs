//! Output records written to the JSON datasets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One class of the classification dataset, keyed by notation in the output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationEntry {
    #[serde(rename = "Label")]
    pub label: String,

    #[serde(rename = "Instruments")]
    pub instruments: Vec<String>,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "MIMOPage")]
    pub page: String,
}

/// A visited classification concept before assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedConcept {
    /// Notation code; the output key
    pub notation: Option<String>,
    pub entry: ClassificationEntry,
}

/// One keyword of the translation dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationEntry {
    #[serde(rename = "Label")]
    pub label: String,

    /// Language code to label; `null` when the data endpoint failed
    #[serde(rename = "Translations")]
    pub translations: Option<BTreeMap<String, Option<String>>>,

    #[serde(rename = "MIMOPage")]
    pub page: String,
}

/// Classification dataset: notation code to entry, in ascending code order.
pub type ClassificationDataset = BTreeMap<String, ClassificationEntry>;

/// Translation dataset: entries ordered by label.
pub type TranslationDataset = Vec<TranslationEntry>;
