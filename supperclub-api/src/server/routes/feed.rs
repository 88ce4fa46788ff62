use crate::server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json, query::Query};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use supperclub_common::model::page::{PageNumber, PageSize, Pagination};
use supperclub_common::model::post::{FeedScope, Post};
use supperclub_db::client::DbClient;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_feed)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/feed", rejection(ServerError))]
struct FeedPath();

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct FeedParams {
    #[serde(default)]
    scope: FeedScope,
    #[serde(default)]
    page: PageNumber,
    #[serde(default)]
    limit: PageSize,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
struct FeedResponse {
    posts: Vec<Post>,
    pagination: Pagination,
}

async fn get_feed(
    FeedPath(): FeedPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>> {
    let limit = params.limit.clamped();

    let page = db
        .fetch_feed_page(user.user_id(), params.scope, params.page, limit)
        .await?;

    Ok(Json(FeedResponse {
        posts: page.items,
        pagination: page.pagination,
    }))
}
