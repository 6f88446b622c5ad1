// src/services/taxonomy.rs

//! Typed access to the vocabulary REST API.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{
    ConceptRef, CrawlerConfig, HierarchyResponse, MappingsResponse, TopConcepts, VocabularyConfig,
};
use crate::services::description::description_candidates;
use crate::services::rdf::{Translations, parse_translations};
use crate::utils::http::{fetch_json, fetch_text};
use crate::utils::rate_limit::{JitteredDelay, RateLimiter};
use crate::utils::url::endpoint;

/// Remote operations a crawl needs.
///
/// Every method fails with a request-scoped [`AppError`] (see
/// [`AppError::request_url`]) so callers can record the failing URL.
#[async_trait]
pub trait TaxonomyClient: Send + Sync {
    /// Top concepts of the vocabulary.
    async fn top_concepts(&self) -> Result<Vec<ConceptRef>>;

    /// Hierarchy (broader context and immediate children) of a page.
    async fn hierarchy(&self, page: &str) -> Result<HierarchyResponse>;

    /// Preferred labels of the instruments mapped to a page.
    async fn mappings(&self, page: &str) -> Result<Vec<String>>;

    /// Candidate description fragments scraped from a concept's detail page.
    async fn description_candidates(&self, uri: &str) -> Result<Vec<String>>;

    /// Language-tagged preferred labels of a page.
    async fn translations(&self, page: &str) -> Result<Translations>;
}

/// [`TaxonomyClient`] backed by the vocabulary service over HTTP.
pub struct HttpTaxonomyClient {
    client: Client,
    vocabulary: VocabularyConfig,
    lang: String,
    limiter: Box<dyn RateLimiter>,
}

impl HttpTaxonomyClient {
    /// Create a client with the politeness delay from the crawler config.
    pub fn new(client: Client, crawler: &CrawlerConfig, vocabulary: VocabularyConfig) -> Self {
        let (min, max) = crawler.delay_range();
        Self::with_limiter(
            client,
            vocabulary,
            &crawler.lang,
            Box::new(JitteredDelay::new(min, max)),
        )
    }

    /// Create a client with a custom rate limiting policy.
    pub fn with_limiter(
        client: Client,
        vocabulary: VocabularyConfig,
        lang: &str,
        limiter: Box<dyn RateLimiter>,
    ) -> Self {
        Self {
            client,
            vocabulary,
            lang: lang.to_string(),
            limiter,
        }
    }

    pub fn top_concepts_url(&self) -> Result<String> {
        self.url("topConcepts", &[("lang", self.lang.as_str())])
    }

    pub fn hierarchy_url(&self, page: &str) -> Result<String> {
        let uri = self.vocabulary.concept_uri(page);
        self.url("hierarchy", &[("uri", uri.as_str()), ("lang", self.lang.as_str())])
    }

    pub fn mappings_url(&self, page: &str) -> Result<String> {
        let uri = self.vocabulary.concept_uri(page);
        self.url(
            "mappings",
            &[
                ("uri", uri.as_str()),
                ("lang", self.lang.as_str()),
                ("clang", self.lang.as_str()),
            ],
        )
    }

    pub fn data_url(&self, page: &str) -> Result<String> {
        let uri = self.vocabulary.concept_uri(page);
        self.url("data", &[("uri", uri.as_str()), ("format", "application/rdf+xml")])
    }

    fn url(&self, operation: &str, params: &[(&str, &str)]) -> Result<String> {
        Ok(endpoint(&self.vocabulary.base_url, operation, params)?.into())
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.limiter.acquire().await;
        log::debug!("GET {url}");
        fetch_text(&self.client, url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned + Send>(&self, url: &str) -> Result<T> {
        self.limiter.acquire().await;
        log::debug!("GET {url}");
        fetch_json(&self.client, url).await
    }
}

#[async_trait]
impl TaxonomyClient for HttpTaxonomyClient {
    async fn top_concepts(&self) -> Result<Vec<ConceptRef>> {
        let url = self.top_concepts_url()?;
        let response: TopConcepts = self.get_json(&url).await?;
        Ok(response.topconcepts)
    }

    async fn hierarchy(&self, page: &str) -> Result<HierarchyResponse> {
        let url = self.hierarchy_url(page)?;
        self.get_json(&url).await
    }

    async fn mappings(&self, page: &str) -> Result<Vec<String>> {
        let url = self.mappings_url(page)?;
        let response: MappingsResponse = self.get_json(&url).await?;
        Ok(response.labels())
    }

    async fn description_candidates(&self, uri: &str) -> Result<Vec<String>> {
        let html = self.get_text(uri).await?;
        description_candidates(&html)
    }

    async fn translations(&self, page: &str) -> Result<Translations> {
        let url = self.data_url(page)?;
        let xml = self.get_text(&url).await?;
        parse_translations(&xml, &self.vocabulary.concept_uri(page))
            .map_err(|e| AppError::decode(&url, e))
    }
}
