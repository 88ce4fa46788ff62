use crate::server::{
    Result, ServerError, ServerRouter, auth::AuthenticatedUser, json::Json, places::PlacesClient,
    places::PlacesError, query::Query,
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use supperclub_common::model::search::{
    SEARCH_RESULT_CAP, SearchQuery, SearchResult, merge_results,
};
use supperclub_db::client::DbClient;
use tracing::{debug, warn};

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(search)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/search", rejection(ServerError))]
struct SearchPath();

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct SearchParams {
    q: String,
}

/// Local catalogue first; the places provider tops the list up to the cap.
/// A provider outage degrades to local-only rather than failing the
/// request.
async fn search(
    SearchPath(): SearchPath,
    State(db): State<Arc<DbClient>>,
    State(places): State<Arc<PlacesClient>>,
    _user: AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>> {
    let query = SearchQuery::new(&params.q)?;

    let local: Vec<SearchResult> = db
        .search_restaurants(&query, SEARCH_RESULT_CAP)
        .await?
        .into_iter()
        .map(SearchResult::from_restaurant)
        .collect();

    let external = if local.len() < SEARCH_RESULT_CAP {
        match places.search(query.get()).await {
            Ok(results) => results,
            Err(PlacesError::Disabled) => {
                debug!("Places provider disabled, serving local results only");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "Places provider failed, serving local results only");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(Json(merge_results(local, external)))
}
