//! Unified restaurant search: local rows first, an external places
//! provider topping the list up to [`SEARCH_RESULT_CAP`].

use crate::model::restaurant::{PriceRange, Restaurant};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The most results a search response ever carries, across both sources.
pub const SEARCH_RESULT_CAP: usize = 5;

pub const SEARCH_QUERY_MIN_LEN: usize = 2;

/// Prefix marking ids that belong to the external provider rather than a
/// local row.
pub const EXTERNAL_ID_PREFIX: &str = "ext_";

#[must_use]
pub fn external_id(place_id: &str) -> String {
    format!("{EXTERNAL_ID_PREFIX}{place_id}")
}

#[must_use]
pub fn strip_external_id(id: &str) -> Option<&str> {
    id.strip_prefix(EXTERNAL_ID_PREFIX)
}

/// A validated free-text search query: trimmed, at least
/// [`SEARCH_QUERY_MIN_LEN`] characters.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct SearchQuery(String);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Search query must be at least 2 characters")]
pub struct SearchQueryTooShortError;

impl SearchQuery {
    pub fn new(raw: &str) -> Result<Self, SearchQueryTooShortError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < SEARCH_QUERY_MIN_LEN {
            return Err(SearchQueryTooShortError);
        }

        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Local,
    External,
}

/// A transient search hit; never persisted.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub location: String,
    pub cuisine: String,
    pub price_range: PriceRange,
    pub thumbnail_url: Option<String>,
    pub rating: Option<f64>,
    pub place_id: Option<String>,
    pub source: SearchSource,
}

impl SearchResult {
    #[must_use]
    pub fn from_restaurant(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id.to_string(),
            name: restaurant.name,
            location: restaurant.location,
            cuisine: restaurant.cuisine,
            price_range: restaurant.price_range,
            thumbnail_url: restaurant.image_url,
            rating: restaurant.rating,
            place_id: restaurant.place_id,
            source: SearchSource::Local,
        }
    }

    fn duplicates(&self, other: &Self) -> bool {
        if let (Some(own), Some(theirs)) = (&self.place_id, &other.place_id) {
            return own == theirs;
        }

        self.name.eq_ignore_ascii_case(&other.name)
            && self.location.eq_ignore_ascii_case(&other.location)
    }
}

/// Merge local and external hits. Local results keep their order and win
/// ties; externals only fill whatever room is left under
/// [`SEARCH_RESULT_CAP`].
#[must_use]
pub fn merge_results(
    local: Vec<SearchResult>,
    external: Vec<SearchResult>,
) -> Vec<SearchResult> {
    let mut merged = local;
    merged.truncate(SEARCH_RESULT_CAP);

    for candidate in external {
        if merged.len() >= SEARCH_RESULT_CAP {
            break;
        }
        if merged.iter().any(|existing| existing.duplicates(&candidate)) {
            continue;
        }
        merged.push(candidate);
    }

    merged
}

#[cfg(test)]
mod tests {
    use crate::model::restaurant::PriceRange;
    use crate::model::search::{
        SEARCH_RESULT_CAP, SearchQuery, SearchResult, SearchSource, external_id, merge_results,
        strip_external_id,
    };

    fn local(name: &str, place_id: Option<&str>) -> SearchResult {
        SearchResult {
            id: name.to_owned(),
            name: name.to_owned(),
            location: "Toronto".to_owned(),
            cuisine: "Italian".to_owned(),
            price_range: PriceRange::Moderate,
            thumbnail_url: None,
            rating: Some(4.2),
            place_id: place_id.map(str::to_owned),
            source: SearchSource::Local,
        }
    }

    fn external(name: &str, place_id: &str) -> SearchResult {
        SearchResult {
            id: external_id(place_id),
            name: name.to_owned(),
            location: "Toronto".to_owned(),
            cuisine: "Italian".to_owned(),
            price_range: PriceRange::Moderate,
            thumbnail_url: None,
            rating: Some(4.0),
            place_id: Some(place_id.to_owned()),
            source: SearchSource::External,
        }
    }

    #[test]
    fn query_must_be_two_characters() {
        assert!(SearchQuery::new("").is_err());
        assert!(SearchQuery::new("a").is_err());
        assert!(SearchQuery::new("  a  ").is_err());
        assert_eq!(SearchQuery::new(" ab ").unwrap().get(), "ab");
    }

    #[test]
    fn query_error_message_is_exact() {
        let err = SearchQuery::new("a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Search query must be at least 2 characters"
        );
    }

    #[test]
    fn external_id_round_trips() {
        let id = external_id("abc123");
        assert_eq!(id, "ext_abc123");
        assert_eq!(strip_external_id(&id), Some("abc123"));
        assert_eq!(strip_external_id("42"), None);
    }

    #[test]
    fn merge_caps_the_result_count() {
        let locals: Vec<_> = (0..4).map(|i| local(&format!("l{i}"), None)).collect();
        let externals: Vec<_> = (0..4)
            .map(|i| external(&format!("e{i}"), &format!("p{i}")))
            .collect();

        let merged = merge_results(locals, externals);
        assert_eq!(merged.len(), SEARCH_RESULT_CAP);
        assert_eq!(merged[3].source, SearchSource::Local);
        assert_eq!(merged[4].source, SearchSource::External);
    }

    #[test]
    fn full_local_page_takes_no_externals() {
        let locals: Vec<_> = (0..SEARCH_RESULT_CAP + 2)
            .map(|i| local(&format!("l{i}"), None))
            .collect();
        let merged = merge_results(locals, vec![external("e", "p")]);

        assert_eq!(merged.len(), SEARCH_RESULT_CAP);
        assert!(merged.iter().all(|r| r.source == SearchSource::Local));
    }

    #[test]
    fn local_wins_place_id_ties() {
        let merged = merge_results(
            vec![local("Trattoria", Some("shared-place"))],
            vec![
                external("Trattoria Duplicate", "shared-place"),
                external("Osteria", "other-place"),
            ],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source, SearchSource::Local);
        assert_eq!(merged[1].name, "Osteria");
    }

    #[test]
    fn name_and_location_deduplicate_without_place_ids() {
        let merged = merge_results(
            vec![local("Noodle Bar", None)],
            vec![external("NOODLE BAR", "p1"), external("Ramen Den", "p2")],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].name, "Ramen Den");
    }

    #[test]
    fn provider_outage_degrades_to_local_only() {
        let merged = merge_results(vec![local("l0", None)], Vec::new());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, SearchSource::Local);
    }
}
