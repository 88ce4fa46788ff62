use crate::server::{
    Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json, places::PlacesClient,
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use supperclub_common::model::{
    Id,
    restaurant::{CreateRestaurant, Restaurant, RestaurantMarker},
    search::{SearchResult, strip_external_id},
};
use supperclub_db::client::DbClient;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(create_restaurant)
        .typed_get(get_restaurant)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/restaurants", rejection(ServerError))]
struct RestaurantsPath();

/// The id is either a local snowflake or `ext_<place_id>` for a provider
/// result that was never materialized locally.
#[derive(TypedPath, Deserialize)]
#[typed_path("/restaurants/{id}", rejection(ServerError))]
struct RestaurantPath {
    id: String,
}

async fn create_restaurant(
    RestaurantsPath(): RestaurantsPath,
    State(db): State<Arc<DbClient>>,
    _user: AuthenticatedUser,
    Json(create): Json<CreateRestaurant>,
) -> Result<(StatusCode, Json<Restaurant>)> {
    let restaurant = db.create_restaurant(&create).await?;

    Ok((StatusCode::CREATED, Json(restaurant)))
}

async fn get_restaurant(
    RestaurantPath { id }: RestaurantPath,
    State(db): State<Arc<DbClient>>,
    State(places): State<Arc<PlacesClient>>,
    _user: AuthenticatedUser,
) -> Result<Json<SearchResult>> {
    if let Some(place_id) = strip_external_id(&id) {
        let details = places
            .place_details(place_id)
            .await?
            .ok_or_else(|| ServerError::RestaurantByIdNotFound(id.clone()))?;

        return Ok(Json(details));
    }

    let restaurant_id: Id<RestaurantMarker> = id
        .parse::<u64>()
        .map_err(|_| ServerError::InvalidRestaurantId(id.clone()))?
        .into();

    let restaurant = db
        .fetch_restaurant(restaurant_id)
        .await?
        .ok_or_else(|| ServerError::RestaurantByIdNotFound(id.clone()))?;

    Ok(Json(SearchResult::from_restaurant(restaurant)))
}
