use crate::server::{
    json::Json,
    metrics::RequestMetrics,
    places::{PlacesClient, PlacesError},
};
use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_extra::typed_header::TypedHeaderRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use supperclub_common::model::{
    Id,
    auth::{AuthTokenDecodeError, AuthTokenHashError},
    circle::CircleMarker,
    list::{ListItemMarker, ListMarker},
    post::PostMarker,
    search::SearchQueryTooShortError,
    user::UserMarker,
};
use supperclub_db::client::{DbClient, DbError};
use thiserror::Error;
use tracing::error;

pub mod auth;
pub mod json;
pub mod metrics;
pub mod places;
pub mod query;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
    pub places_client: Arc<PlacesClient>,
    pub metrics: Arc<RequestMetrics>,
}

pub fn routes() -> Router<ServerState> {
    Router::new()
        .nest("/api", routes::routes())
        .fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Query rejected: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Authorization header was missing or invalid: {0}")]
    InvalidAuthorizationHeader(TypedHeaderRejection),
    #[error("The provided auth token could not be decoded: {0}")]
    InvalidAuthToken(#[from] AuthTokenDecodeError),
    #[error("The auth token could not be hashed: {0}")]
    AuthTokenHash(#[from] AuthTokenHashError),
    #[error("Provided token was invalid")]
    InvalidToken,
    #[error(transparent)]
    Database(#[from] DbError),
    #[error(transparent)]
    SearchQuery(#[from] SearchQueryTooShortError),
    #[error("The places provider is unavailable: {0}")]
    PlacesProvider(#[from] PlacesError),
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
    #[error("User with id {0} was not found.")]
    UserByIdNotFound(Id<UserMarker>),
    #[error("Restaurant with id {0} was not found.")]
    RestaurantByIdNotFound(String),
    #[error("Restaurant id {0} is not a valid id.")]
    InvalidRestaurantId(String),
    #[error("List with id {0} was not found.")]
    ListByIdNotFound(Id<ListMarker>),
    #[error("List item with id {0} was not found.")]
    ListItemByIdNotFound(Id<ListItemMarker>),
    #[error("Circle with id {0} was not found.")]
    CircleByIdNotFound(Id<CircleMarker>),
    #[error("Only the owner may modify this resource.")]
    NotResourceOwner,
    #[error("You cannot follow yourself.")]
    SelfFollow,
}

impl ServerError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_)
            | ServerError::UserByIdNotFound(_)
            | ServerError::RestaurantByIdNotFound(_)
            | ServerError::ListByIdNotFound(_)
            | ServerError::ListItemByIdNotFound(_)
            | ServerError::CircleByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidAuthorizationHeader(rejection) if rejection.is_missing() => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::InvalidToken => StatusCode::UNAUTHORIZED,
            ServerError::QueryRejection(_)
            | ServerError::JsonRejection(_)
            | ServerError::InvalidAuthorizationHeader(_)
            | ServerError::InvalidAuthToken(_)
            | ServerError::SearchQuery(_)
            | ServerError::InvalidRestaurantId(_)
            | ServerError::SelfFollow => StatusCode::BAD_REQUEST,
            ServerError::NotResourceOwner => StatusCode::FORBIDDEN,
            ServerError::Database(DbError::HandleTaken) => StatusCode::CONFLICT,
            ServerError::PlacesProvider(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::JsonResponse(_)
            | ServerError::Database(_)
            | ServerError::AuthTokenHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(error_response)).into_response()
    }
}
