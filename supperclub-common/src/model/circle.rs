use crate::model::{Id, user::UserMarker};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CircleMarker;

/// A friend group; membership widens the circle feed scope and unlocks
/// circle-visibility lists.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Circle {
    pub id: Id<CircleMarker>,
    pub creator_id: Id<UserMarker>,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct CreateCircle {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct CircleSummary {
    #[serde(flatten)]
    pub circle: Circle,
    pub member_count: i64,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleRole {
    Owner,
    #[default]
    Member,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Not a known circle role: {0}")]
pub struct InvalidCircleRoleError(String);

impl CircleRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CircleRole::Owner => "owner",
            CircleRole::Member => "member",
        }
    }
}

impl Display for CircleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CircleRole {
    type Err = InvalidCircleRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(CircleRole::Owner),
            "member" => Ok(CircleRole::Member),
            _ => Err(InvalidCircleRoleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::circle::CircleRole;

    #[test]
    fn role_round_trips() {
        for role in [CircleRole::Owner, CircleRole::Member] {
            assert_eq!(role.as_str().parse::<CircleRole>(), Ok(role));
        }
        assert!("admin".parse::<CircleRole>().is_err());
    }
}
