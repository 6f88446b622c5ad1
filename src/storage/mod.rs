//! Storage abstractions for dataset persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! output/
//! ├── hornbostelSachs.json     # notation -> {Label, Instruments, Description, MIMOPage}
//! └── translationsMIMO.json    # [{Label, Translations, MIMOPage}, ...]
//! ```

pub mod local;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for dataset storage backends.
#[async_trait]
pub trait DatasetStorage: Send + Sync {
    /// Write a serialized document under `name`, returning where it landed.
    async fn write_document(&self, name: &str, bytes: &[u8]) -> Result<String>;
}

/// Serialize with four-space indentation; non-ASCII characters stay literal.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut bytes, formatter);
    value.serialize(&mut serializer)?;
    Ok(bytes)
}

/// Serialize a dataset and hand it to the storage backend.
pub async fn save_dataset<T: Serialize + ?Sized + Sync>(
    storage: &dyn DatasetStorage,
    name: &str,
    value: &T,
) -> Result<String> {
    let bytes = to_pretty_json(value)?;
    storage.write_document(name, &bytes).await
}
