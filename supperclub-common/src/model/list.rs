use crate::model::{
    Id,
    circle::CircleMarker,
    post::Rating,
    restaurant::{Restaurant, RestaurantMarker},
    user::UserMarker,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ListMarker;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ListItemMarker;

/// A curated, shareable collection of restaurants. Names are not unique;
/// two lists called "Date Night" can happily coexist.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct RestaurantList {
    pub id: Id<ListMarker>,
    pub owner_id: Id<UserMarker>,
    pub circle_id: Option<Id<CircleMarker>>,
    pub name: String,
    pub description: Option<String>,
    pub visibility: ListVisibility,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct CreateList {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: ListVisibility,
    #[serde(default)]
    pub circle_id: Option<Id<CircleMarker>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct UpdateList {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Option<ListVisibility>,
}

/// A list together with its items, the shape `GET /lists/{id}` serves.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ListWithItems {
    #[serde(flatten)]
    pub list: RestaurantList,
    pub items: Vec<ListItem>,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct ListItem {
    pub id: Id<ListItemMarker>,
    pub restaurant: Restaurant,
    pub rating: Option<Rating>,
    pub liked: Option<String>,
    pub disliked: Option<String>,
    pub notes: Option<String>,
    pub position: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct CreateListItem {
    pub restaurant_id: Id<RestaurantMarker>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub liked: Option<String>,
    #[serde(default)]
    pub disliked: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct UpdateListItem {
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub liked: Option<String>,
    #[serde(default)]
    pub disliked: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Who may see (and add to) a list.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListVisibility {
    /// Anyone may view, any authenticated user may add items.
    #[default]
    Public,
    /// Scoped to the owning circle; only the owner may add items.
    Circle,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Not a known list visibility: {0}")]
pub struct InvalidListVisibilityError(String);

impl ListVisibility {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListVisibility::Public => "public",
            ListVisibility::Circle => "circle",
        }
    }
}

impl Display for ListVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListVisibility {
    type Err = InvalidListVisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(ListVisibility::Public),
            "circle" => Ok(ListVisibility::Circle),
            _ => Err(InvalidListVisibilityError(s.to_owned())),
        }
    }
}
