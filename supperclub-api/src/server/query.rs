use crate::server::ServerError;
use axum::extract::{FromRequestParts, Query as AxumQuery};

/// Query-string extractor mirroring [`crate::server::json::Json`]: invalid
/// parameters reject with the shared error JSON.
#[derive(FromRequestParts, Debug, Clone, Copy, Default)]
#[from_request(via(AxumQuery), rejection(ServerError))]
pub struct Query<T>(pub T);
