use crate::model::{
    Id,
    restaurant::{Restaurant, RestaurantMarker},
    user::User,
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A review-style post about a single restaurant, as served by the API
/// with author and restaurant joined in.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub author: User,
    pub restaurant: Restaurant,
    pub content: String,
    pub rating: Rating,
    pub visibility: Visibility,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct CreatePost {
    pub restaurant_id: Id<RestaurantMarker>,
    pub content: String,
    pub rating: Rating,
    pub visibility: Visibility,
}

/// Author-only edit; absent fields keep their current value.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct UpdatePost {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

/// Which feed candidate set a query targets.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedScope {
    /// All public posts.
    #[default]
    Global,
    /// Posts by followed users and circle-mates, plus the caller's own.
    Circle,
}

/// A whole-star rating between 1 and 5.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Rating must be between 1 and 5, got {0}")]
pub struct InvalidRatingError(i64);

impl Rating {
    #[must_use]
    pub fn new(stars: u8) -> Option<Self> {
        (RATING_MIN..=RATING_MAX).contains(&stars).then_some(Self(stars))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidRatingError(i64::from(value)))
    }
}

impl TryFrom<i16> for Rating {
    type Error = InvalidRatingError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidRatingError(i64::from(value)))
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = u8::deserialize(deserializer)?;
        Rating::new(inner).ok_or_else(|| {
            Error::invalid_value(Unexpected::Unsigned(u64::from(inner)), &"a rating from 1 to 5")
        })
    }
}

/// Who may see a post.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Not a known visibility: {0}")]
pub struct InvalidVisibilityError(String);

impl Visibility {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = InvalidVisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            _ => Err(InvalidVisibilityError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::post::{Rating, Visibility};

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert_eq!(Rating::new(1).map(Rating::get), Some(1));
        assert_eq!(Rating::new(5).map(Rating::get), Some(5));
        assert!(Rating::try_from(999_i16).is_err());
        assert!(Rating::try_from(-1_i16).is_err());
    }

    #[test]
    fn visibility_round_trips() {
        for visibility in [Visibility::Public, Visibility::Private] {
            assert_eq!(visibility.as_str().parse::<Visibility>(), Ok(visibility));
        }
        assert!("circle".parse::<Visibility>().is_err());
    }
}
