//! Client for the external places provider the search endpoint falls back
//! to when the local catalogue comes up short.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use supperclub_common::model::restaurant::PriceRange;
use supperclub_common::model::search::{SearchResult, SearchSource, external_id};
use thiserror::Error;

pub const PLACES_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

const DETAILS_FIELDS: &str =
    "place_id,name,formatted_address,vicinity,types,price_level,rating";

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("no places API key is configured")]
    Disabled,
    #[error("request to the places provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("the places provider answered with status {0}")]
    Provider(String),
}

#[derive(Clone, Debug, Deserialize)]
struct PlacesSearchResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PlaceDetailsResponse {
    result: Option<PlaceResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    price_level: Option<u8>,
    rating: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct PlacesClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl PlacesClient {
    pub fn new(api_key: Option<String>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_owned())
    }

    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(PLACES_REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Free-text search, biased towards restaurants by appending the
    /// keyword and type filter.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, PlacesError> {
        let api_key = self.api_key.as_deref().ok_or(PlacesError::Disabled)?;
        let url = format!("{}/textsearch/json", self.base_url);
        let search_term = format!("{query} restaurant");

        let response: PlacesSearchResponse = self
            .http
            .get(&url)
            .query(&[
                ("query", search_term.as_str()),
                ("type", "restaurant"),
                ("key", api_key),
            ])
            .send()
            .await?
            .json()
            .await?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            status => {
                return Err(PlacesError::Provider(provider_status(
                    status,
                    response.error_message,
                )));
            }
        }

        Ok(response.results.into_iter().map(to_search_result).collect())
    }

    pub async fn place_details(&self, place_id: &str) -> Result<Option<SearchResult>, PlacesError> {
        let api_key = self.api_key.as_deref().ok_or(PlacesError::Disabled)?;
        let url = format!("{}/details/json", self.base_url);

        let response: PlaceDetailsResponse = self
            .http
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAILS_FIELDS),
                ("key", api_key),
            ])
            .send()
            .await?
            .json()
            .await?;

        match response.status.as_str() {
            "OK" => Ok(response.result.map(to_search_result)),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            status => Err(PlacesError::Provider(provider_status(
                status,
                response.error_message,
            ))),
        }
    }
}

fn provider_status(status: &str, error_message: Option<String>) -> String {
    match error_message {
        Some(message) => format!("{status}: {message}"),
        None => status.to_owned(),
    }
}

fn to_search_result(place: PlaceResult) -> SearchResult {
    let address = place.formatted_address.or(place.vicinity);
    let location = address.as_deref().map(short_location).unwrap_or_default();

    SearchResult {
        id: external_id(&place.place_id),
        name: place.name,
        location,
        cuisine: cuisine_from_types(&place.types),
        price_range: price_range_from_level(place.price_level),
        thumbnail_url: None,
        rating: place.rating,
        place_id: Some(place.place_id),
        source: SearchSource::External,
    }
}

fn price_range_from_level(level: Option<u8>) -> PriceRange {
    match level {
        Some(0 | 1) => PriceRange::Budget,
        Some(3) => PriceRange::Upscale,
        Some(4..) => PriceRange::Luxury,
        Some(2) | None => PriceRange::Moderate,
    }
}

fn cuisine_from_types(types: &[String]) -> String {
    let label = types.iter().find_map(|place_type| {
        Some(match place_type.as_str() {
            "bakery" => "Bakery",
            "bar" => "Bar",
            "cafe" => "Cafe",
            "coffee_shop" => "Coffee",
            "meal_takeaway" => "Takeaway",
            "meal_delivery" => "Delivery",
            "italian_restaurant" => "Italian",
            "japanese_restaurant" => "Japanese",
            "chinese_restaurant" => "Chinese",
            "mexican_restaurant" => "Mexican",
            "thai_restaurant" => "Thai",
            "indian_restaurant" => "Indian",
            "french_restaurant" => "French",
            "american_restaurant" => "American",
            "steakhouse" => "Steakhouse",
            "seafood_restaurant" => "Seafood",
            "vegetarian_restaurant" => "Vegetarian",
            "breakfast_restaurant" => "Breakfast",
            "pizza_restaurant" => "Pizza",
            _ => return None,
        })
    });

    label.unwrap_or("Restaurant").to_owned()
}

/// Reduce a full formatted address to a `City, Region` label, dropping
/// street, postal code and country parts.
fn short_location(address: &str) -> String {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return address.to_owned();
    }

    let city = parts[parts.len() - 3];
    let mut region = parts[parts.len() - 2];

    // Trailing runs of uppercase letters and digits are postal codes.
    loop {
        match region.rsplit_once(' ') {
            Some((head, tail))
                if tail.len() >= 3
                    && tail
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) =>
            {
                region = head.trim_end();
            }
            _ => break,
        }
    }

    format!("{city}, {region}")
}

#[cfg(test)]
mod tests {
    use crate::server::places::{
        PlacesSearchResponse, cuisine_from_types, price_range_from_level, short_location,
        to_search_result,
    };
    use supperclub_common::model::restaurant::PriceRange;
    use supperclub_common::model::search::SearchSource;

    #[test]
    fn price_levels_map_to_ranges() {
        assert_eq!(price_range_from_level(None), PriceRange::Moderate);
        assert_eq!(price_range_from_level(Some(0)), PriceRange::Budget);
        assert_eq!(price_range_from_level(Some(1)), PriceRange::Budget);
        assert_eq!(price_range_from_level(Some(2)), PriceRange::Moderate);
        assert_eq!(price_range_from_level(Some(3)), PriceRange::Upscale);
        assert_eq!(price_range_from_level(Some(4)), PriceRange::Luxury);
    }

    #[test]
    fn cuisine_prefers_the_first_known_type() {
        assert_eq!(
            cuisine_from_types(&["establishment".to_owned(), "thai_restaurant".to_owned()]),
            "Thai"
        );
        assert_eq!(cuisine_from_types(&["restaurant".to_owned()]), "Restaurant");
        assert_eq!(cuisine_from_types(&[]), "Restaurant");
    }

    #[test]
    fn addresses_shorten_to_city_and_region() {
        assert_eq!(
            short_location("123 Main St, Toronto, ON M5V 1A1, Canada"),
            "Toronto, ON"
        );
        assert_eq!(
            short_location("1 Pike Pl, Seattle, WA 98101, United States"),
            "Seattle, WA"
        );
        assert_eq!(short_location("Somewhere"), "Somewhere");
    }

    #[test]
    fn search_response_parses_and_converts() {
        let body = r#"{
            "status": "OK",
            "results": [
                {
                    "place_id": "abc123",
                    "name": "Golden Lotus",
                    "formatted_address": "55 Spring St, Toronto, ON M5V 2A1, Canada",
                    "types": ["chinese_restaurant", "restaurant"],
                    "price_level": 3,
                    "rating": 4.6
                }
            ]
        }"#;

        let response: PlacesSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, "OK");

        let result = to_search_result(response.results.into_iter().next().unwrap());
        assert_eq!(result.id, "ext_abc123");
        assert_eq!(result.source, SearchSource::External);
        assert_eq!(result.cuisine, "Chinese");
        assert_eq!(result.price_range, PriceRange::Upscale);
        assert_eq!(result.location, "Toronto, ON");
        assert_eq!(result.place_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn zero_results_parse_without_a_results_array() {
        let body = r#"{"status": "ZERO_RESULTS"}"#;
        let response: PlacesSearchResponse = serde_json::from_str(body).unwrap();

        assert!(response.results.is_empty());
        assert!(response.error_message.is_none());
    }
}
