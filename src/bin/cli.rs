//! Vocabulary Crawler CLI
//!
//! Crawls the instrument classification and keyword vocabularies and writes
//! them as JSON datasets.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vocab_crawler::{
    error::Result,
    models::{Config, VocabularyConfig},
    pipeline,
    services::HttpTaxonomyClient,
    storage::LocalStorage,
    utils::http,
};

/// Vocabulary Crawler - musical instrument taxonomy exporter
#[derive(Parser, Debug)]
#[command(
    name = "vocab-crawler",
    version,
    about = "Export instrument classification and translations from a SKOS vocabulary service"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "crawler.toml")]
    config: PathBuf,

    /// Override the output directory
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Stop after visiting this many concepts
    #[arg(long, global = true)]
    max_count: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the classification tree
    Classify,

    /// Crawl the keyword tree and collect translations
    Translate,

    /// Run both crawls: Classify → Translate
    All,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn taxonomy_client(config: &Config, vocabulary: &VocabularyConfig) -> Result<HttpTaxonomyClient> {
    let client = http::create_async_client(&config.crawler)?;
    Ok(HttpTaxonomyClient::new(
        client,
        &config.crawler,
        vocabulary.clone(),
    ))
}

async fn classify(config: &Config, storage: &LocalStorage) -> Result<()> {
    let client = taxonomy_client(config, &config.classification)?;
    let outcome = pipeline::run_classification(config, &client, storage).await?;
    log::info!("Classification complete: {} classes", outcome.output.len());
    Ok(())
}

async fn translate(config: &Config, storage: &LocalStorage) -> Result<()> {
    let client = taxonomy_client(config, &config.translation)?;
    let outcome = pipeline::run_translation(config, &client, storage).await?;
    log::info!("Translation complete: {} keywords", outcome.output.len());
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        log::info!(
            "No config at {}, using defaults",
            cli.config.display()
        );
        Config::default()
    };

    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.display().to_string();
    }
    if cli.max_count.is_some() {
        config.crawler.max_count = cli.max_count;
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let storage = LocalStorage::new(&config.output.dir);

    match cli.command {
        Command::Classify => classify(&config, &storage).await?,

        Command::Translate => translate(&config, &storage).await?,

        Command::All => {
            log::info!("Step 1/2: Crawling classification...");
            classify(&config, &storage).await?;

            log::info!("Step 2/2: Crawling translations...");
            translate(&config, &storage).await?;
        }

        Command::Validate => {
            log::info!("✓ Config OK");
            log::info!(
                "Classification: {} -> {}",
                config.classification.base_url,
                config.output_path(&config.classification.output_file).display()
            );
            log::info!(
                "Translation: {} -> {}",
                config.translation.base_url,
                config.output_path(&config.translation.output_file).display()
            );
        }
    }

    log::info!("Done!");

    Ok(())
}
