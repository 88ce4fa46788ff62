use crate::server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use supperclub_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker, UpdatePost},
};
use supperclub_db::client::DbClient;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_post)
        .typed_post(create_post)
        .typed_put(update_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: Id<PostMarker>,
}

async fn get_post(
    PostPath { id }: PostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Post>> {
    let post = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn create_post(
    PostsPath(): PostsPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(create): Json<CreatePost>,
) -> Result<(StatusCode, Json<Post>)> {
    db.fetch_restaurant(create.restaurant_id)
        .await?
        .ok_or_else(|| ServerError::RestaurantByIdNotFound(create.restaurant_id.to_string()))?;

    let post_id = db.create_post(user.user_id(), &create).await?;
    let post = db
        .fetch_post(post_id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(post_id))?;

    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    PostPath { id }: PostPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(update): Json<UpdatePost>,
) -> Result<Json<Post>> {
    let existing = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;
    if existing.author.id != user.user_id() {
        return Err(ServerError::NotResourceOwner);
    }

    db.update_post(id, &update).await?;

    let post = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn delete_post(
    PostPath { id }: PostPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<StatusCode> {
    let existing = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;
    if existing.author.id != user.user_id() {
        return Err(ServerError::NotResourceOwner);
    }

    db.delete_post(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
