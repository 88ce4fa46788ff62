use crate::server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use supperclub_common::model::{
    Id,
    list::{
        CreateList, CreateListItem, ListItem, ListItemMarker, ListMarker, ListVisibility,
        ListWithItems, RestaurantList, UpdateList, UpdateListItem,
    },
};
use supperclub_db::client::DbClient;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(create_list)
        .typed_get(get_list)
        .typed_put(update_list)
        .typed_delete(delete_list)
        .typed_post(create_list_item)
        .typed_put(update_list_item)
        .typed_delete(delete_list_item)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/lists", rejection(ServerError))]
struct ListsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/lists/{id}", rejection(ServerError))]
struct ListPath {
    id: Id<ListMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/lists/{id}/items", rejection(ServerError))]
struct ListItemsPath {
    id: Id<ListMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/lists/{list_id}/items/{item_id}", rejection(ServerError))]
struct ListItemPath {
    list_id: Id<ListMarker>,
    item_id: Id<ListItemMarker>,
}

async fn create_list(
    ListsPath(): ListsPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(create): Json<CreateList>,
) -> Result<(StatusCode, Json<RestaurantList>)> {
    if let Some(circle_id) = create.circle_id {
        db.fetch_circle_summary(circle_id)
            .await?
            .ok_or(ServerError::CircleByIdNotFound(circle_id))?;
    }

    let list = db.create_list(user.user_id(), &create).await?;

    Ok((StatusCode::CREATED, Json(list)))
}

async fn get_list(
    ListPath { id }: ListPath,
    State(db): State<Arc<DbClient>>,
    _user: AuthenticatedUser,
) -> Result<Json<ListWithItems>> {
    let list = db
        .fetch_list(id)
        .await?
        .ok_or(ServerError::ListByIdNotFound(id))?;
    let items = db.fetch_list_items(id).await?;

    Ok(Json(ListWithItems { list, items }))
}

async fn update_list(
    ListPath { id }: ListPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(update): Json<UpdateList>,
) -> Result<Json<RestaurantList>> {
    let existing = db
        .fetch_list(id)
        .await?
        .ok_or(ServerError::ListByIdNotFound(id))?;
    if existing.owner_id != user.user_id() {
        return Err(ServerError::NotResourceOwner);
    }

    let list = db
        .update_list(id, &update)
        .await?
        .ok_or(ServerError::ListByIdNotFound(id))?;

    Ok(Json(list))
}

async fn delete_list(
    ListPath { id }: ListPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<StatusCode> {
    let existing = db
        .fetch_list(id)
        .await?
        .ok_or(ServerError::ListByIdNotFound(id))?;
    if existing.owner_id != user.user_id() {
        return Err(ServerError::NotResourceOwner);
    }

    db.delete_list(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_list_item(
    ListItemsPath { id }: ListItemsPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
    Json(create): Json<CreateListItem>,
) -> Result<(StatusCode, Json<ListItem>)> {
    let list = db
        .fetch_list(id)
        .await?
        .ok_or(ServerError::ListByIdNotFound(id))?;

    // Anyone may add to a public list; circle lists take items from their
    // owner only.
    if list.visibility == ListVisibility::Circle && list.owner_id != user.user_id() {
        return Err(ServerError::NotResourceOwner);
    }

    db.fetch_restaurant(create.restaurant_id)
        .await?
        .ok_or_else(|| ServerError::RestaurantByIdNotFound(create.restaurant_id.to_string()))?;

    let item_id = db.create_list_item(id, &create).await?;
    let item = db
        .fetch_list_item(id, item_id)
        .await?
        .ok_or(ServerError::ListItemByIdNotFound(item_id))?;

    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_list_item(
    ListItemPath { list_id, item_id }: ListItemPath,
    State(db): State<Arc<DbClient>>,
    _user: AuthenticatedUser,
    Json(update): Json<UpdateListItem>,
) -> Result<Json<ListItem>> {
    let updated = db.update_list_item(list_id, item_id, &update).await?;
    if !updated {
        return Err(ServerError::ListItemByIdNotFound(item_id));
    }

    let item = db
        .fetch_list_item(list_id, item_id)
        .await?
        .ok_or(ServerError::ListItemByIdNotFound(item_id))?;

    Ok(Json(item))
}

async fn delete_list_item(
    ListItemPath { list_id, item_id }: ListItemPath,
    State(db): State<Arc<DbClient>>,
    _user: AuthenticatedUser,
) -> Result<StatusCode> {
    let deleted = db.delete_list_item(list_id, item_id).await?;
    if !deleted {
        return Err(ServerError::ListItemByIdNotFound(item_id));
    }

    Ok(StatusCode::NO_CONTENT)
}
