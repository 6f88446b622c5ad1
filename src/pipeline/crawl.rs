// src/pipeline/crawl.rs

//! Classification and translation crawl runs.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{ClassificationDataset, Config, CrawlOutcome, TranslationDataset};
use crate::pipeline::assemble::{assemble_classification, assemble_translations};
use crate::pipeline::walker::{TreeWalker, Walk};
use crate::services::{ClassificationEnricher, TaxonomyClient, TranslationEnricher};
use crate::storage::{DatasetStorage, save_dataset};

/// Crawl the classification tree from the vocabulary's top concepts, or from
/// `root_page` when one is configured.
pub async fn crawl_classification(
    config: &Config,
    client: &dyn TaxonomyClient,
) -> CrawlOutcome<ClassificationDataset> {
    let started_at = Utc::now();
    log::info!("Crawling classification from {}", config.classification.base_url);

    let walker = TreeWalker::new(client, &ClassificationEnricher, config.crawler.max_count);
    let walk = match config.classification.root_page.as_deref() {
        Some(page) => walker.walk_from_root(page).await,
        None => walker.walk_top_concepts().await,
    };

    into_outcome(walk, started_at).map_output(assemble_classification)
}

/// Crawl the keyword tree below the configured root page.
pub async fn crawl_translations(
    config: &Config,
    client: &dyn TaxonomyClient,
) -> Result<CrawlOutcome<TranslationDataset>> {
    let started_at = Utc::now();
    let root_page = config
        .translation
        .root_page
        .as_deref()
        .ok_or_else(|| AppError::config("translation.root_page is not set"))?;
    log::info!(
        "Crawling translations from {} (root page {root_page})",
        config.translation.base_url
    );

    let walk = TreeWalker::new(client, &TranslationEnricher, config.crawler.max_count)
        .walk_from_root(root_page)
        .await;

    into_outcome(walk, started_at).try_map_output(assemble_translations)
}

/// Crawl the classification tree and write the dataset.
pub async fn run_classification(
    config: &Config,
    client: &dyn TaxonomyClient,
    storage: &dyn DatasetStorage,
) -> Result<CrawlOutcome<ClassificationDataset>> {
    let outcome = crawl_classification(config, client).await;
    let records = outcome.output.len();
    persist(config, storage, &config.classification.output_file, outcome, records).await
}

/// Crawl the translation tree and write the dataset.
pub async fn run_translation(
    config: &Config,
    client: &dyn TaxonomyClient,
    storage: &dyn DatasetStorage,
) -> Result<CrawlOutcome<TranslationDataset>> {
    let outcome = crawl_translations(config, client).await?;
    let records = outcome.output.len();
    persist(config, storage, &config.translation.output_file, outcome, records).await
}

fn into_outcome<N>(walk: Walk<N>, started_at: DateTime<Utc>) -> CrawlOutcome<Vec<N>> {
    CrawlOutcome {
        output: walk.nodes,
        visited: walk.visited,
        failed_urls: walk.failures.into_urls(),
        root_failure: walk.root_failure,
        started_at,
        finished_at: Utc::now(),
    }
}

async fn persist<T>(
    config: &Config,
    storage: &dyn DatasetStorage,
    file_name: &str,
    outcome: CrawlOutcome<T>,
    records: usize,
) -> Result<CrawlOutcome<T>>
where
    T: serde::Serialize + Sync,
{
    if config.crawler.abort_on_root_failure {
        outcome.ensure_root()?;
    } else if let Some(failure) = &outcome.root_failure {
        log::error!("Root fetch failed, writing empty dataset: {}", failure.message);
    }

    let location = save_dataset(storage, file_name, &outcome.output).await?;
    log_summary(&outcome, records, &location);
    Ok(outcome)
}

fn log_summary<T>(outcome: &CrawlOutcome<T>, records: usize, location: &str) {
    log::info!(
        "Visited {} concepts in {}s, saved {} records to {}",
        outcome.visited,
        outcome.elapsed_secs(),
        records,
        location
    );
    if outcome.failed_urls.is_empty() {
        log::info!("No failed requests");
        return;
    }
    log::warn!("{} requests failed:", outcome.failed_urls.len());
    for url in &outcome.failed_urls {
        log::warn!("  - {url}");
    }
}
