// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::Result;

/// Extract the page id (last path segment) from a concept URI.
///
/// # Examples
/// ```
/// use vocab_crawler::utils::url::page_from_uri;
///
/// assert_eq!(page_from_uri("http://www.mimo-db.eu/HornbostelAndSachs/123"), "123");
/// ```
pub fn page_from_uri(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Build `{base}/{operation}?k=v&...` with form-urlencoded query values.
pub fn endpoint(base: &str, operation: &str, params: &[(&str, &str)]) -> Result<Url> {
    let path = format!("{}/{}", base.trim_end_matches('/'), operation);
    if params.is_empty() {
        return Ok(Url::parse(&path)?);
    }
    Ok(Url::parse_with_params(&path, params)?)
}
