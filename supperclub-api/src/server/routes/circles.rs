use crate::server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use supperclub_common::model::{
    Id,
    circle::{Circle, CircleMarker, CircleRole, CircleSummary, CreateCircle},
};
use supperclub_db::client::DbClient;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(create_circle)
        .typed_get(get_circle)
        .typed_post(join_circle)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/circles", rejection(ServerError))]
struct CirclesPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/circles/{id}", rejection(ServerError))]
struct CirclePath {
    id: Id<CircleMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/circles/{id}/members", rejection(ServerError))]
struct CircleMembersPath {
    id: Id<CircleMarker>,
}

async fn create_circle(
    CirclesPath(): CirclesPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(create): Json<CreateCircle>,
) -> Result<(StatusCode, Json<Circle>)> {
    let circle = db.create_circle(user.user_id(), &create).await?;

    Ok((StatusCode::CREATED, Json(circle)))
}

async fn get_circle(
    CirclePath { id }: CirclePath,
    State(db): State<Arc<DbClient>>,
    _user: AuthenticatedUser,
) -> Result<Json<CircleSummary>> {
    let summary = db
        .fetch_circle_summary(id)
        .await?
        .ok_or(ServerError::CircleByIdNotFound(id))?;

    Ok(Json(summary))
}

async fn join_circle(
    CircleMembersPath { id }: CircleMembersPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<StatusCode> {
    db.fetch_circle_summary(id)
        .await?
        .ok_or(ServerError::CircleByIdNotFound(id))?;

    db.add_circle_member(id, user.user_id(), CircleRole::Member)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
