//! Row shapes as they come off the wire, converted into domain models via
//! `TryFrom` so invalid stored data surfaces as an error instead of a
//! panic.

use sqlx::FromRow;
use supperclub_common::model::{
    ModelValidationError,
    auth::Authentication,
    circle::{Circle, CircleSummary},
    list::{ListItem, RestaurantList},
    post::{Post, Rating},
    restaurant::Restaurant,
    user::{User, UserHandle},
};
use time::{Duration, PrimitiveDateTime};

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub(crate) struct UserRecord {
    pub user_snowflake: i64,
    pub handle: String,
    pub name: String,
    pub bio: Option<String>,
}

#[derive(Clone, PartialEq, Debug, FromRow)]
pub(crate) struct RestaurantRecord {
    pub restaurant_snowflake: i64,
    pub name: String,
    pub location: String,
    pub cuisine: String,
    pub price_range: String,
    pub address: Option<String>,
    pub place_id: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
}

/// A post joined with its author and restaurant, the only shape posts are
/// ever served in.
#[derive(Clone, PartialEq, Debug, FromRow)]
pub(crate) struct PostRecord {
    pub post_snowflake: i64,
    pub content: String,
    pub rating: i16,
    pub visibility: String,
    pub created_at: PrimitiveDateTime,
    pub author_snowflake: i64,
    pub author_handle: String,
    pub author_name: String,
    pub author_bio: Option<String>,
    pub restaurant_snowflake: i64,
    pub restaurant_name: String,
    pub restaurant_location: String,
    pub restaurant_cuisine: String,
    pub restaurant_price_range: String,
    pub restaurant_address: Option<String>,
    pub restaurant_place_id: Option<String>,
    pub restaurant_image_url: Option<String>,
    pub restaurant_rating: Option<f64>,
}

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub(crate) struct ListRecord {
    pub list_snowflake: i64,
    pub owner_snowflake: i64,
    pub circle_snowflake: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub visibility: String,
    pub created_at: PrimitiveDateTime,
}

#[derive(Clone, PartialEq, Debug, FromRow)]
pub(crate) struct ListItemRecord {
    pub item_snowflake: i64,
    pub rating: Option<i16>,
    pub liked: Option<String>,
    pub disliked: Option<String>,
    pub notes: Option<String>,
    pub position: i32,
    pub added_at: PrimitiveDateTime,
    pub restaurant_snowflake: i64,
    pub restaurant_name: String,
    pub restaurant_location: String,
    pub restaurant_cuisine: String,
    pub restaurant_price_range: String,
    pub restaurant_address: Option<String>,
    pub restaurant_place_id: Option<String>,
    pub restaurant_image_url: Option<String>,
    pub restaurant_rating: Option<f64>,
}

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub(crate) struct CircleSummaryRecord {
    pub circle_snowflake: i64,
    pub creator_snowflake: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: PrimitiveDateTime,
    pub member_count: i64,
}

#[derive(Clone, Eq, PartialEq, Debug, FromRow)]
pub(crate) struct AuthenticationRecord {
    pub user_snowflake: i64,
    pub token_hash: Vec<u8>,
    pub created_at: PrimitiveDateTime,
    pub expires_after_seconds: Option<i64>,
}

impl TryFrom<UserRecord> for User {
    type Error = ModelValidationError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.user_snowflake.cast_unsigned().into(),
            handle: UserHandle::new(value.handle)?,
            name: value.name,
            bio: value.bio,
        })
    }
}

impl TryFrom<RestaurantRecord> for Restaurant {
    type Error = ModelValidationError;

    fn try_from(value: RestaurantRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.restaurant_snowflake.cast_unsigned().into(),
            name: value.name,
            location: value.location,
            cuisine: value.cuisine,
            price_range: value.price_range.parse()?,
            address: value.address,
            place_id: value.place_id,
            image_url: value.image_url,
            rating: value.rating,
        })
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_snowflake.cast_unsigned().into(),
            author: User {
                id: value.author_snowflake.cast_unsigned().into(),
                handle: UserHandle::new(value.author_handle)?,
                name: value.author_name,
                bio: value.author_bio,
            },
            restaurant: Restaurant {
                id: value.restaurant_snowflake.cast_unsigned().into(),
                name: value.restaurant_name,
                location: value.restaurant_location,
                cuisine: value.restaurant_cuisine,
                price_range: value.restaurant_price_range.parse()?,
                address: value.restaurant_address,
                place_id: value.restaurant_place_id,
                image_url: value.restaurant_image_url,
                rating: value.restaurant_rating,
            },
            content: value.content,
            rating: Rating::try_from(value.rating)?,
            visibility: value.visibility.parse()?,
            created_at: value.created_at.assume_utc(),
        })
    }
}

impl TryFrom<ListRecord> for RestaurantList {
    type Error = ModelValidationError;

    fn try_from(value: ListRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.list_snowflake.cast_unsigned().into(),
            owner_id: value.owner_snowflake.cast_unsigned().into(),
            circle_id: value
                .circle_snowflake
                .map(|snowflake| snowflake.cast_unsigned().into()),
            name: value.name,
            description: value.description,
            visibility: value.visibility.parse()?,
            created_at: value.created_at.assume_utc(),
        })
    }
}

impl TryFrom<ListItemRecord> for ListItem {
    type Error = ModelValidationError;

    fn try_from(value: ListItemRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.item_snowflake.cast_unsigned().into(),
            restaurant: Restaurant {
                id: value.restaurant_snowflake.cast_unsigned().into(),
                name: value.restaurant_name,
                location: value.restaurant_location,
                cuisine: value.restaurant_cuisine,
                price_range: value.restaurant_price_range.parse()?,
                address: value.restaurant_address,
                place_id: value.restaurant_place_id,
                image_url: value.restaurant_image_url,
                rating: value.restaurant_rating,
            },
            rating: value.rating.map(Rating::try_from).transpose()?,
            liked: value.liked,
            disliked: value.disliked,
            notes: value.notes,
            position: value.position,
            added_at: value.added_at.assume_utc(),
        })
    }
}

impl TryFrom<CircleSummaryRecord> for CircleSummary {
    type Error = ModelValidationError;

    fn try_from(value: CircleSummaryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            circle: Circle {
                id: value.circle_snowflake.cast_unsigned().into(),
                creator_id: value.creator_snowflake.cast_unsigned().into(),
                name: value.name,
                description: value.description,
                created_at: value.created_at.assume_utc(),
            },
            member_count: value.member_count,
        })
    }
}

impl TryFrom<AuthenticationRecord> for Authentication {
    type Error = ModelValidationError;

    fn try_from(value: AuthenticationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user: value.user_snowflake.cast_unsigned().into(),
            token_hash: value.token_hash.into_boxed_slice().try_into()?,
            created_at: value.created_at.as_utc(),
            expires_after: value
                .expires_after_seconds
                .map(|seconds| Duration::seconds(seconds).try_into())
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::record::{ListItemRecord, PostRecord, UserRecord};
    use supperclub_common::model::{
        ModelValidationError,
        list::ListItem,
        post::Post,
        user::User,
    };
    use time::macros::datetime;

    fn post_record() -> PostRecord {
        PostRecord {
            post_snowflake: 42,
            content: "Get the tasting menu.".to_owned(),
            rating: 5,
            visibility: "public".to_owned(),
            created_at: datetime!(2025-06-01 18:30),
            author_snowflake: 7,
            author_handle: "dumpling_dan".to_owned(),
            author_name: "Dan".to_owned(),
            author_bio: None,
            restaurant_snowflake: 9,
            restaurant_name: "Golden Lotus".to_owned(),
            restaurant_location: "Toronto".to_owned(),
            restaurant_cuisine: "Chinese".to_owned(),
            restaurant_price_range: "$$".to_owned(),
            restaurant_address: None,
            restaurant_place_id: None,
            restaurant_image_url: None,
            restaurant_rating: Some(4.4),
        }
    }

    #[test]
    fn post_record_converts() {
        let post = Post::try_from(post_record()).unwrap();

        assert_eq!(u64::from(post.id), 42);
        assert_eq!(post.author.handle.get(), "dumpling_dan");
        assert_eq!(post.rating.get(), 5);
        assert_eq!(post.restaurant.name, "Golden Lotus");
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let record = PostRecord {
            rating: 11,
            ..post_record()
        };

        assert!(matches!(
            Post::try_from(record),
            Err(ModelValidationError::Rating(_))
        ));
    }

    #[test]
    fn unknown_visibility_is_rejected() {
        let record = PostRecord {
            visibility: "friends-of-friends".to_owned(),
            ..post_record()
        };

        assert!(matches!(
            Post::try_from(record),
            Err(ModelValidationError::Visibility(_))
        ));
    }

    #[test]
    fn empty_handle_is_rejected() {
        let record = UserRecord {
            user_snowflake: 1,
            handle: String::new(),
            name: "Nameless".to_owned(),
            bio: None,
        };

        assert!(matches!(
            User::try_from(record),
            Err(ModelValidationError::UserHandle(_))
        ));
    }

    #[test]
    fn list_item_record_converts_without_rating() {
        let record = ListItemRecord {
            item_snowflake: 3,
            rating: None,
            liked: Some("The noodles".to_owned()),
            disliked: None,
            notes: None,
            position: 2,
            added_at: datetime!(2025-06-02 12:00),
            restaurant_snowflake: 9,
            restaurant_name: "Golden Lotus".to_owned(),
            restaurant_location: "Toronto".to_owned(),
            restaurant_cuisine: "Chinese".to_owned(),
            restaurant_price_range: "$$$".to_owned(),
            restaurant_address: None,
            restaurant_place_id: None,
            restaurant_image_url: None,
            restaurant_rating: None,
        };

        let item = ListItem::try_from(record).unwrap();
        assert!(item.rating.is_none());
        assert_eq!(item.position, 2);
        assert_eq!(item.liked.as_deref(), Some("The noodles"));
    }
}
