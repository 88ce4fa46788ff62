use crate::server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use supperclub_common::model::{
    Id,
    auth::AuthToken,
    post::Post,
    user::{CreateUser, User, UserMarker},
};
use supperclub_common::util::PositiveDuration;
use supperclub_db::client::DbClient;
use time::Duration;

/// Tokens issued at registration stop working after this long.
const TOKEN_LIFETIME_DAYS: i64 = 30;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(create_user)
        .typed_get(get_user)
        .typed_get(get_user_posts)
        .typed_get(get_user_followers)
        .typed_get(get_user_following)
        .typed_put(follow_user)
        .typed_delete(unfollow_user)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users", rejection(ServerError))]
struct UsersPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}", rejection(ServerError))]
struct UserPath {
    id: Id<UserMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}/posts", rejection(ServerError))]
struct UserPostsPath {
    id: Id<UserMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}/followers", rejection(ServerError))]
struct UserFollowersPath {
    id: Id<UserMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}/following", rejection(ServerError))]
struct UserFollowingPath {
    id: Id<UserMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/follows/{user_id}", rejection(ServerError))]
struct FollowPath {
    user_id: Id<UserMarker>,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
struct RegisterResponse {
    user: User,
    /// Returned exactly once; only its hash is stored.
    token: String,
}

async fn create_user(
    UsersPath(): UsersPath,
    State(db): State<Arc<DbClient>>,
    Json(create): Json<CreateUser>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user_id = db.create_user(&create).await?;

    let token = AuthToken::generate_random(user_id);
    let token_hash = token.hash()?;
    let lifetime = PositiveDuration::new_unchecked(Duration::days(TOKEN_LIFETIME_DAYS));
    db.create_auth(user_id, &token_hash, Some(lifetime)).await?;

    let user = User {
        id: user_id,
        handle: create.handle,
        name: create.name,
        bio: create.bio,
    };

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            token: token.as_token_str(),
        }),
    ))
}

async fn get_user(
    UserPath { id }: UserPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<User>> {
    let user = db
        .fetch_user(id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    Ok(Json(user))
}

/// Private posts only show up on your own profile.
async fn get_user_posts(
    UserPostsPath { id }: UserPostsPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Post>>> {
    db.fetch_user(id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    let include_private = user.user_id() == id;
    let posts = db.fetch_user_posts(id, include_private).await?;

    Ok(Json(posts))
}

async fn get_user_followers(
    UserFollowersPath { id }: UserFollowersPath,
    State(db): State<Arc<DbClient>>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    db.fetch_user(id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    let followers = db.fetch_followers(id).await?;
    Ok(Json(followers))
}

async fn get_user_following(
    UserFollowingPath { id }: UserFollowingPath,
    State(db): State<Arc<DbClient>>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    db.fetch_user(id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    let following = db.fetch_following(id).await?;
    Ok(Json(following))
}

async fn follow_user(
    FollowPath { user_id }: FollowPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<StatusCode> {
    if user_id == user.user_id() {
        return Err(ServerError::SelfFollow);
    }

    db.fetch_user(user_id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(user_id))?;

    db.create_follow(user.user_id(), user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn unfollow_user(
    FollowPath { user_id }: FollowPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<StatusCode> {
    db.delete_follow(user.user_id(), user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
