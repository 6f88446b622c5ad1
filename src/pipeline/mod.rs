//! Pipeline entry points for crawler operations.
//!
//! - `run_classification`: Crawl the classification tree from its top concepts
//! - `run_translation`: Crawl the keyword tree below a root page

pub mod assemble;
mod crawl;
pub mod walker;

pub use crawl::{crawl_classification, crawl_translations, run_classification, run_translation};
pub use walker::{TreeWalker, Walk};
