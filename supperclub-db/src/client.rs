use crate::record::{
    AuthenticationRecord, CircleSummaryRecord, ListItemRecord, ListRecord, PostRecord,
    RestaurantRecord, UserRecord,
};
use sqlx::PgPool;
use std::sync::{Mutex, PoisonError};
use supperclub_common::model::{
    Id, ModelValidationError, SupperclubSnowflake, SupperclubSnowflakeGenerator,
    auth::{AuthTokenHash, Authentication},
    circle::{Circle, CircleMarker, CircleRole, CircleSummary, CreateCircle},
    list::{
        CreateList, CreateListItem, ListItem, ListItemMarker, ListMarker, RestaurantList,
        UpdateList, UpdateListItem,
    },
    page::{Page, PageNumber, PageSize},
    post::{CreatePost, FeedScope, Post, PostMarker, UpdatePost, Visibility},
    restaurant::{CreateRestaurant, Restaurant, RestaurantMarker},
    search::SearchQuery,
    user::{CreateUser, User, UserMarker},
};
use supperclub_common::snowflake::{ProcessId, WorkerId};
use supperclub_common::util::PositiveDuration;
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("The user handle is already taken")]
    HandleTaken,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Posts are only ever served joined with their author and restaurant.
const POST_SELECT: &str = "
    SELECT
        posts.post_snowflake,
        posts.content,
        posts.rating,
        posts.visibility,
        posts.created_at,
        users.user_snowflake AS author_snowflake,
        users.handle AS author_handle,
        users.name AS author_name,
        users.bio AS author_bio,
        restaurants.restaurant_snowflake,
        restaurants.name AS restaurant_name,
        restaurants.location AS restaurant_location,
        restaurants.cuisine AS restaurant_cuisine,
        restaurants.price_range AS restaurant_price_range,
        restaurants.address AS restaurant_address,
        restaurants.place_id AS restaurant_place_id,
        restaurants.image_url AS restaurant_image_url,
        restaurants.rating AS restaurant_rating
    FROM posts
    JOIN users ON users.user_snowflake = posts.author_snowflake
    JOIN restaurants ON restaurants.restaurant_snowflake = posts.restaurant_snowflake
";

const LIST_ITEM_SELECT: &str = "
    SELECT
        list_items.item_snowflake,
        list_items.rating,
        list_items.liked,
        list_items.disliked,
        list_items.notes,
        list_items.position,
        list_items.added_at,
        restaurants.restaurant_snowflake,
        restaurants.name AS restaurant_name,
        restaurants.location AS restaurant_location,
        restaurants.cuisine AS restaurant_cuisine,
        restaurants.price_range AS restaurant_price_range,
        restaurants.address AS restaurant_address,
        restaurants.place_id AS restaurant_place_id,
        restaurants.image_url AS restaurant_image_url,
        restaurants.rating AS restaurant_rating
    FROM list_items
    JOIN restaurants ON restaurants.restaurant_snowflake = list_items.restaurant_snowflake
";

const RESTAURANT_COLUMNS: &str =
    "restaurant_snowflake, name, location, cuisine, price_range, address, place_id, image_url, rating";

/// Viewer ($1) sees their own posts plus public posts from people they
/// follow or share a circle with.
const CIRCLE_FEED_FILTER: &str = "
    posts.author_snowflake = $1
    OR (
        posts.visibility = 'public'
        AND (
            EXISTS (
                SELECT 1 FROM follows
                WHERE follows.follower_snowflake = $1
                    AND follows.followed_snowflake = posts.author_snowflake
            )
            OR EXISTS (
                SELECT 1 FROM circle_members viewer
                JOIN circle_members peer
                    ON peer.circle_snowflake = viewer.circle_snowflake
                WHERE viewer.user_snowflake = $1
                    AND peer.user_snowflake = posts.author_snowflake
            )
        )
    )
";

#[derive(Debug)]
pub struct DbClient {
    pool: PgPool,
    snowflake_generator: Mutex<SupperclubSnowflakeGenerator>,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool, worker_id: WorkerId, process_id: ProcessId) -> Self {
        let snowflake_generator =
            Mutex::new(SupperclubSnowflakeGenerator::new(worker_id, process_id));

        Self {
            pool,
            snowflake_generator,
        }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    /// A minimal database round trip, used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn pool_size(&self) -> u32 {
        self.pool.size()
    }

    #[must_use]
    pub fn pool_idle(&self) -> usize {
        self.pool.num_idle()
    }

    #[must_use]
    pub fn pool_max_connections(&self) -> u32 {
        self.pool.options().get_max_connections()
    }

    fn generate_snowflake(&self) -> SupperclubSnowflake {
        // A poisoned generator still holds a valid increment; keep going.
        self.snowflake_generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate()
    }

    pub async fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        let record: Option<UserRecord> = sqlx::query_as(
            "
            SELECT user_snowflake, handle, name, bio
            FROM users
            WHERE user_snowflake = $1
            ",
        )
        .bind(user_id.snowflake().get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let user = record.map(User::try_from).transpose()?;
        Ok(user)
    }

    pub async fn create_user(&self, user: &CreateUser) -> Result<Id<UserMarker>> {
        let user_snowflake = self.generate_snowflake();

        let returned: std::result::Result<i64, sqlx::Error> = sqlx::query_scalar(
            "
            INSERT INTO users (user_snowflake, handle, name, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING user_snowflake
            ",
        )
        .bind(user_snowflake.get().cast_signed())
        .bind(user.handle.get())
        .bind(&user.name)
        .bind(user.bio.as_deref())
        .fetch_one(&self.pool)
        .await;

        match returned {
            Ok(snowflake) => Ok(snowflake.cast_unsigned().into()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DbError::HandleTaken)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn create_auth(
        &self,
        user_id: Id<UserMarker>,
        token_hash: &AuthTokenHash,
        expires_after: Option<PositiveDuration>,
    ) -> Result<()> {
        sqlx::query(
            "
            INSERT INTO authentications (token_hash, user_snowflake, expires_after_seconds)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(&token_hash.0[..])
        .bind(user_id.snowflake().get().cast_signed())
        .bind(expires_after.map(|duration| duration.get().whole_seconds()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch_auth(&self, token_hash: &AuthTokenHash) -> Result<Option<Authentication>> {
        let record: Option<AuthenticationRecord> = sqlx::query_as(
            "
            SELECT user_snowflake, token_hash, created_at, expires_after_seconds
            FROM authentications
            WHERE token_hash = $1
            ",
        )
        .bind(&token_hash.0[..])
        .fetch_optional(&self.pool)
        .await?;

        let authentication = record.map(Authentication::try_from).transpose()?;
        Ok(authentication)
    }

    pub async fn create_restaurant(&self, restaurant: &CreateRestaurant) -> Result<Restaurant> {
        let restaurant_snowflake = self.generate_snowflake();

        let record: RestaurantRecord = sqlx::query_as(&format!(
            "
            INSERT INTO restaurants
                (restaurant_snowflake, name, location, cuisine, price_range, address, place_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RESTAURANT_COLUMNS}
            ",
        ))
        .bind(restaurant_snowflake.get().cast_signed())
        .bind(&restaurant.name)
        .bind(&restaurant.location)
        .bind(&restaurant.cuisine)
        .bind(restaurant.price_range.as_str())
        .bind(restaurant.address.as_deref())
        .bind(restaurant.place_id.as_deref())
        .bind(restaurant.image_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let restaurant = Restaurant::try_from(record)?;
        Ok(restaurant)
    }

    pub async fn fetch_restaurant(
        &self,
        restaurant_id: Id<RestaurantMarker>,
    ) -> Result<Option<Restaurant>> {
        let record: Option<RestaurantRecord> = sqlx::query_as(&format!(
            "
            SELECT {RESTAURANT_COLUMNS}
            FROM restaurants
            WHERE restaurant_snowflake = $1
            ",
        ))
        .bind(restaurant_id.snowflake().get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let restaurant = record.map(Restaurant::try_from).transpose()?;
        Ok(restaurant)
    }

    /// Case-insensitive substring match over name, location and cuisine.
    pub async fn search_restaurants(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<Restaurant>> {
        let pattern = format!("%{}%", query.get());

        let records: Vec<RestaurantRecord> = sqlx::query_as(&format!(
            "
            SELECT {RESTAURANT_COLUMNS}
            FROM restaurants
            WHERE name ILIKE $1 OR location ILIKE $1 OR cuisine ILIKE $1
            ORDER BY name
            LIMIT $2
            ",
        ))
        .bind(&pattern)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let restaurants = records
            .into_iter()
            .map(Restaurant::try_from)
            .collect::<std::result::Result<_, _>>()?;
        Ok(restaurants)
    }

    pub async fn create_post(
        &self,
        author_id: Id<UserMarker>,
        post: &CreatePost,
    ) -> Result<Id<PostMarker>> {
        let post_snowflake = self.generate_snowflake();

        let returned: i64 = sqlx::query_scalar(
            "
            INSERT INTO posts
                (post_snowflake, author_snowflake, restaurant_snowflake, content, rating, visibility)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING post_snowflake
            ",
        )
        .bind(post_snowflake.get().cast_signed())
        .bind(author_id.snowflake().get().cast_signed())
        .bind(post.restaurant_id.snowflake().get().cast_signed())
        .bind(&post.content)
        .bind(i16::from(post.rating.get()))
        .bind(post.visibility.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(returned.cast_unsigned().into())
    }

    pub async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record: Option<PostRecord> =
            sqlx::query_as(&format!("{POST_SELECT} WHERE posts.post_snowflake = $1"))
                .bind(post_id.snowflake().get().cast_signed())
                .fetch_optional(&self.pool)
                .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    pub async fn fetch_user_posts(
        &self,
        author_id: Id<UserMarker>,
        include_private: bool,
    ) -> Result<Vec<Post>> {
        let records: Vec<PostRecord> = sqlx::query_as(&format!(
            "
            {POST_SELECT}
            WHERE posts.author_snowflake = $1
                AND (posts.visibility = 'public' OR $2)
            ORDER BY posts.post_snowflake DESC
            ",
        ))
        .bind(author_id.snowflake().get().cast_signed())
        .bind(include_private)
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<std::result::Result<_, _>>()?;
        Ok(posts)
    }

    /// One feed page, probing one row past `limit` so `has_more` needs no
    /// count query.
    pub async fn fetch_feed_page(
        &self,
        viewer_id: Id<UserMarker>,
        scope: FeedScope,
        page: PageNumber,
        limit: PageSize,
    ) -> Result<Page<Post>> {
        let records: Vec<PostRecord> = match scope {
            FeedScope::Global => {
                sqlx::query_as(&format!(
                    "
                    {POST_SELECT}
                    WHERE posts.visibility = 'public'
                    ORDER BY posts.post_snowflake DESC
                    LIMIT $1 OFFSET $2
                    ",
                ))
                .bind(limit.probe())
                .bind(page.offset(limit))
                .fetch_all(&self.pool)
                .await?
            }
            FeedScope::Circle => {
                sqlx::query_as(&format!(
                    "
                    {POST_SELECT}
                    WHERE {CIRCLE_FEED_FILTER}
                    ORDER BY posts.post_snowflake DESC
                    LIMIT $2 OFFSET $3
                    ",
                ))
                .bind(viewer_id.snowflake().get().cast_signed())
                .bind(limit.probe())
                .bind(page.offset(limit))
                .fetch_all(&self.pool)
                .await?
            }
        };

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Page::from_probe(posts, page, limit))
    }

    pub async fn update_post(&self, post_id: Id<PostMarker>, update: &UpdatePost) -> Result<bool> {
        let result = sqlx::query(
            "
            UPDATE posts
            SET content = COALESCE($2, content),
                rating = COALESCE($3, rating),
                visibility = COALESCE($4, visibility)
            WHERE post_snowflake = $1
            ",
        )
        .bind(post_id.snowflake().get().cast_signed())
        .bind(update.content.as_deref())
        .bind(update.rating.map(|rating| i16::from(rating.get())))
        .bind(update.visibility.map(Visibility::as_str))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_post(&self, post_id: Id<PostMarker>) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE post_snowflake = $1")
            .bind(post_id.snowflake().get().cast_signed())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create_list(
        &self,
        owner_id: Id<UserMarker>,
        list: &CreateList,
    ) -> Result<RestaurantList> {
        let list_snowflake = self.generate_snowflake();

        let record: ListRecord = sqlx::query_as(
            "
            INSERT INTO restaurant_lists
                (list_snowflake, owner_snowflake, circle_snowflake, name, description, visibility)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING list_snowflake, owner_snowflake, circle_snowflake, name, description,
                visibility, created_at
            ",
        )
        .bind(list_snowflake.get().cast_signed())
        .bind(owner_id.snowflake().get().cast_signed())
        .bind(
            list.circle_id
                .map(|circle_id| circle_id.snowflake().get().cast_signed()),
        )
        .bind(&list.name)
        .bind(list.description.as_deref())
        .bind(list.visibility.as_str())
        .fetch_one(&self.pool)
        .await?;

        let list = RestaurantList::try_from(record)?;
        Ok(list)
    }

    pub async fn fetch_list(&self, list_id: Id<ListMarker>) -> Result<Option<RestaurantList>> {
        let record: Option<ListRecord> = sqlx::query_as(
            "
            SELECT list_snowflake, owner_snowflake, circle_snowflake, name, description,
                visibility, created_at
            FROM restaurant_lists
            WHERE list_snowflake = $1
            ",
        )
        .bind(list_id.snowflake().get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let list = record.map(RestaurantList::try_from).transpose()?;
        Ok(list)
    }

    pub async fn update_list(
        &self,
        list_id: Id<ListMarker>,
        update: &UpdateList,
    ) -> Result<Option<RestaurantList>> {
        let record: Option<ListRecord> = sqlx::query_as(
            "
            UPDATE restaurant_lists
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                visibility = COALESCE($4, visibility)
            WHERE list_snowflake = $1
            RETURNING list_snowflake, owner_snowflake, circle_snowflake, name, description,
                visibility, created_at
            ",
        )
        .bind(list_id.snowflake().get().cast_signed())
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.visibility.map(|visibility| visibility.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        let list = record.map(RestaurantList::try_from).transpose()?;
        Ok(list)
    }

    /// Items go with the list via `ON DELETE CASCADE`.
    pub async fn delete_list(&self, list_id: Id<ListMarker>) -> Result<bool> {
        let result = sqlx::query("DELETE FROM restaurant_lists WHERE list_snowflake = $1")
            .bind(list_id.snowflake().get().cast_signed())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create_list_item(
        &self,
        list_id: Id<ListMarker>,
        item: &CreateListItem,
    ) -> Result<Id<ListItemMarker>> {
        let item_snowflake = self.generate_snowflake();

        let returned: i64 = sqlx::query_scalar(
            "
            INSERT INTO list_items
                (item_snowflake, list_snowflake, restaurant_snowflake, rating, liked, disliked,
                notes, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING item_snowflake
            ",
        )
        .bind(item_snowflake.get().cast_signed())
        .bind(list_id.snowflake().get().cast_signed())
        .bind(item.restaurant_id.snowflake().get().cast_signed())
        .bind(item.rating.map(|rating| i16::from(rating.get())))
        .bind(item.liked.as_deref())
        .bind(item.disliked.as_deref())
        .bind(item.notes.as_deref())
        .bind(item.position.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(returned.cast_unsigned().into())
    }

    pub async fn fetch_list_items(&self, list_id: Id<ListMarker>) -> Result<Vec<ListItem>> {
        let records: Vec<ListItemRecord> = sqlx::query_as(&format!(
            "
            {LIST_ITEM_SELECT}
            WHERE list_items.list_snowflake = $1
            ORDER BY list_items.position, list_items.item_snowflake
            ",
        ))
        .bind(list_id.snowflake().get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        let items = records
            .into_iter()
            .map(ListItem::try_from)
            .collect::<std::result::Result<_, _>>()?;
        Ok(items)
    }

    pub async fn fetch_list_item(
        &self,
        list_id: Id<ListMarker>,
        item_id: Id<ListItemMarker>,
    ) -> Result<Option<ListItem>> {
        let record: Option<ListItemRecord> = sqlx::query_as(&format!(
            "
            {LIST_ITEM_SELECT}
            WHERE list_items.list_snowflake = $1 AND list_items.item_snowflake = $2
            ",
        ))
        .bind(list_id.snowflake().get().cast_signed())
        .bind(item_id.snowflake().get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let item = record.map(ListItem::try_from).transpose()?;
        Ok(item)
    }

    pub async fn update_list_item(
        &self,
        list_id: Id<ListMarker>,
        item_id: Id<ListItemMarker>,
        update: &UpdateListItem,
    ) -> Result<bool> {
        let result = sqlx::query(
            "
            UPDATE list_items
            SET rating = COALESCE($3, rating),
                liked = COALESCE($4, liked),
                disliked = COALESCE($5, disliked),
                notes = COALESCE($6, notes),
                position = COALESCE($7, position)
            WHERE list_snowflake = $1 AND item_snowflake = $2
            ",
        )
        .bind(list_id.snowflake().get().cast_signed())
        .bind(item_id.snowflake().get().cast_signed())
        .bind(update.rating.map(|rating| i16::from(rating.get())))
        .bind(update.liked.as_deref())
        .bind(update.disliked.as_deref())
        .bind(update.notes.as_deref())
        .bind(update.position)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_list_item(
        &self,
        list_id: Id<ListMarker>,
        item_id: Id<ListItemMarker>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM list_items WHERE list_snowflake = $1 AND item_snowflake = $2",
        )
        .bind(list_id.snowflake().get().cast_signed())
        .bind(item_id.snowflake().get().cast_signed())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create_circle(
        &self,
        creator_id: Id<UserMarker>,
        circle: &CreateCircle,
    ) -> Result<Circle> {
        let circle_snowflake = self.generate_snowflake();

        let mut tx = self.pool.begin().await?;

        let created_at: time::PrimitiveDateTime = sqlx::query_scalar(
            "
            INSERT INTO circles (circle_snowflake, creator_snowflake, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING created_at
            ",
        )
        .bind(circle_snowflake.get().cast_signed())
        .bind(creator_id.snowflake().get().cast_signed())
        .bind(&circle.name)
        .bind(circle.description.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "
            INSERT INTO circle_members (circle_snowflake, user_snowflake, role)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(circle_snowflake.get().cast_signed())
        .bind(creator_id.snowflake().get().cast_signed())
        .bind(CircleRole::Owner.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Circle {
            id: circle_snowflake.into(),
            creator_id,
            name: circle.name.clone(),
            description: circle.description.clone(),
            created_at: created_at.assume_utc(),
        })
    }

    pub async fn fetch_circle_summary(
        &self,
        circle_id: Id<CircleMarker>,
    ) -> Result<Option<CircleSummary>> {
        let record: Option<CircleSummaryRecord> = sqlx::query_as(
            "
            SELECT
                circles.circle_snowflake,
                circles.creator_snowflake,
                circles.name,
                circles.description,
                circles.created_at,
                COUNT(circle_members.user_snowflake) AS member_count
            FROM circles
            LEFT JOIN circle_members
                ON circle_members.circle_snowflake = circles.circle_snowflake
            WHERE circles.circle_snowflake = $1
            GROUP BY circles.circle_snowflake
            ",
        )
        .bind(circle_id.snowflake().get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let summary = record.map(CircleSummary::try_from).transpose()?;
        Ok(summary)
    }

    /// Joining twice is a no-op.
    pub async fn add_circle_member(
        &self,
        circle_id: Id<CircleMarker>,
        user_id: Id<UserMarker>,
        role: CircleRole,
    ) -> Result<()> {
        sqlx::query(
            "
            INSERT INTO circle_members (circle_snowflake, user_snowflake, role)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(circle_id.snowflake().get().cast_signed())
        .bind(user_id.snowflake().get().cast_signed())
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Following twice is a no-op.
    pub async fn create_follow(
        &self,
        follower_id: Id<UserMarker>,
        followed_id: Id<UserMarker>,
    ) -> Result<()> {
        sqlx::query(
            "
            INSERT INTO follows (follower_snowflake, followed_snowflake)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(follower_id.snowflake().get().cast_signed())
        .bind(followed_id.snowflake().get().cast_signed())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_follow(
        &self,
        follower_id: Id<UserMarker>,
        followed_id: Id<UserMarker>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM follows WHERE follower_snowflake = $1 AND followed_snowflake = $2",
        )
        .bind(follower_id.snowflake().get().cast_signed())
        .bind(followed_id.snowflake().get().cast_signed())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn fetch_followers(&self, user_id: Id<UserMarker>) -> Result<Vec<User>> {
        let records: Vec<UserRecord> = sqlx::query_as(
            "
            SELECT users.user_snowflake, users.handle, users.name, users.bio
            FROM follows
            JOIN users ON users.user_snowflake = follows.follower_snowflake
            WHERE follows.followed_snowflake = $1
            ORDER BY follows.created_at DESC
            ",
        )
        .bind(user_id.snowflake().get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        let users = records
            .into_iter()
            .map(User::try_from)
            .collect::<std::result::Result<_, _>>()?;
        Ok(users)
    }

    pub async fn fetch_following(&self, user_id: Id<UserMarker>) -> Result<Vec<User>> {
        let records: Vec<UserRecord> = sqlx::query_as(
            "
            SELECT users.user_snowflake, users.handle, users.name, users.bio
            FROM follows
            JOIN users ON users.user_snowflake = follows.followed_snowflake
            WHERE follows.follower_snowflake = $1
            ORDER BY follows.created_at DESC
            ",
        )
        .bind(user_id.snowflake().get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        let users = records
            .into_iter()
            .map(User::try_from)
            .collect::<std::result::Result<_, _>>()?;
        Ok(users)
    }
}
