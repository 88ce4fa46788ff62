use crate::model::Id;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct RestaurantMarker;

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Restaurant {
    pub id: Id<RestaurantMarker>,
    pub name: String,
    pub location: String,
    pub cuisine: String,
    pub price_range: PriceRange,
    pub address: Option<String>,
    pub place_id: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct CreateRestaurant {
    pub name: String,
    pub location: String,
    pub cuisine: String,
    pub price_range: PriceRange,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// `$` through `$$$$`, coarse price buckets.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize,
)]
pub enum PriceRange {
    #[serde(rename = "$")]
    Budget,
    #[default]
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Upscale,
    #[serde(rename = "$$$$")]
    Luxury,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Not a known price range: {0}")]
pub struct InvalidPriceRangeError(String);

impl PriceRange {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PriceRange::Budget => "$",
            PriceRange::Moderate => "$$",
            PriceRange::Upscale => "$$$",
            PriceRange::Luxury => "$$$$",
        }
    }
}

impl Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceRange {
    type Err = InvalidPriceRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "$" => Ok(PriceRange::Budget),
            "$$" => Ok(PriceRange::Moderate),
            "$$$" => Ok(PriceRange::Upscale),
            "$$$$" => Ok(PriceRange::Luxury),
            _ => Err(InvalidPriceRangeError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::restaurant::PriceRange;

    #[test]
    fn price_range_round_trips() {
        for range in [
            PriceRange::Budget,
            PriceRange::Moderate,
            PriceRange::Upscale,
            PriceRange::Luxury,
        ] {
            assert_eq!(range.as_str().parse::<PriceRange>(), Ok(range));
        }

        assert!("$$$$$".parse::<PriceRange>().is_err());
        assert!("cheap".parse::<PriceRange>().is_err());
    }
}
