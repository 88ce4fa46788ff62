pub mod auth;
pub mod circle;
pub mod list;
pub mod page;
pub mod post;
pub mod restaurant;
pub mod search;
pub mod user;

use crate::{
    model::{
        auth::InvalidAuthTokenHashError,
        circle::InvalidCircleRoleError,
        list::InvalidListVisibilityError,
        post::{InvalidRatingError, InvalidVisibilityError},
        restaurant::InvalidPriceRangeError,
        user::InvalidUserHandleError,
    },
    snowflake::{Epoch, Snowflake, SnowflakeGenerator},
    util::NonPositiveDurationError,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;
use time::{UtcDateTime, macros::utc_datetime};

/// Raised when data loaded from storage no longer satisfies a model
/// invariant.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    UserHandle(#[from] InvalidUserHandleError),
    #[error(transparent)]
    NonPositiveDuration(#[from] NonPositiveDurationError),
    #[error(transparent)]
    TokenHash(#[from] InvalidAuthTokenHashError),
    #[error(transparent)]
    Rating(#[from] InvalidRatingError),
    #[error(transparent)]
    Visibility(#[from] InvalidVisibilityError),
    #[error(transparent)]
    ListVisibility(#[from] InvalidListVisibilityError),
    #[error(transparent)]
    PriceRange(#[from] InvalidPriceRangeError),
    #[error(transparent)]
    CircleRole(#[from] InvalidCircleRoleError),
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct SupperclubEpoch;
impl Epoch for SupperclubEpoch {
    const EPOCH_TIME: UtcDateTime = utc_datetime!(2025-01-01 00:00);
}

pub type SupperclubSnowflake = Snowflake<SupperclubEpoch>;
pub type SupperclubSnowflakeGenerator = SnowflakeGenerator<SupperclubEpoch>;

/// A snowflake tagged with the entity type it identifies, so a post id
/// cannot be passed where a user id is expected.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(SupperclubSnowflake, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(snowflake: SupperclubSnowflake) -> Self {
        Self(snowflake, PhantomData)
    }

    #[must_use]
    pub fn snowflake(self) -> SupperclubSnowflake {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<SupperclubSnowflake> for Id<Marker> {
    fn from(value: SupperclubSnowflake) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for SupperclubSnowflake {
    fn from(value: Id<Marker>) -> Self {
        value.0
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Id::new(SupperclubSnowflake::new(value))
    }
}

impl<Marker> From<Id<Marker>> for u64 {
    fn from(value: Id<Marker>) -> Self {
        value.snowflake().get()
    }
}
