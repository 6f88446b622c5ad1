// src/services/description.rs

//! Description extraction from concept detail pages.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};

/// Property values on the detail page: `<div class="property-value-wrapper"><ul><li><span>`.
const PROPERTY_VALUE_SELECTOR: &str = r#"div[class*="property-value-wrapper"] > ul > li > span"#;

/// Collect the direct text nodes of every property value span, in document order.
pub fn description_candidates(html: &str) -> Result<Vec<String>> {
    let selector = parse_selector(PROPERTY_VALUE_SELECTOR)?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .flat_map(|span| {
            span.children()
                .filter_map(|node| node.value().as_text().map(|text| (**text).to_owned()))
        })
        .collect())
}

/// Pick the longest candidate by character count; among equally long
/// candidates the one appearing last wins.
pub fn longest_description<S: AsRef<str>>(candidates: &[S]) -> Option<&str> {
    candidates
        .iter()
        .map(AsRef::as_ref)
        .max_by_key(|text| text.chars().count())
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::config(format!("Invalid selector '{s}': {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"
        <html><body>
          <div class="property">
            <div class="property-value-wrapper">
              <ul>
                <li><span>Frame drums</span></li>
                <li><span>The depth of the body does not exceed the radius of the membrane<a href="x">link</a></span></li>
              </ul>
            </div>
          </div>
          <div class="other-wrapper"><ul><li><span>ignored because of the wrapper class name</span></li></ul></div>
          <div class="property-value-wrapper notes">
            <ul><li><span>211.3</span></li></ul>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_candidates_are_direct_text_nodes() {
        let candidates = description_candidates(DETAIL_PAGE).unwrap();
        assert_eq!(
            candidates,
            vec![
                "Frame drums",
                "The depth of the body does not exceed the radius of the membrane",
                "211.3",
            ]
        );
    }

    #[test]
    fn test_page_without_wrapper_has_no_candidates() {
        let candidates = description_candidates("<html><body><p>nothing</p></body></html>").unwrap();
        assert!(candidates.is_empty());
        assert_eq!(longest_description(&candidates), None);
    }

    #[test]
    fn test_longest_candidate_wins() {
        let candidates = ["drum", "frame drum", "membrane idiophone"];
        assert_eq!(longest_description(&candidates), Some("membrane idiophone"));
    }

    #[test]
    fn test_ties_go_to_the_last_candidate() {
        assert_eq!(longest_description(&["abc", "xyz"]), Some("xyz"));
        assert_eq!(longest_description(&["abc", "xyz", "de"]), Some("xyz"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // "Flöte" is 5 characters but 6 bytes.
        assert_eq!(longest_description(&["Flöte", "flute"]), Some("flute"));
    }
}
