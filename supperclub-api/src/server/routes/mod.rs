use crate::server::ServerRouter;
use axum::Router;

mod circles;
mod feed;
mod health;
mod lists;
mod posts;
mod restaurants;
mod search;
mod users;

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(feed::routes())
        .merge(search::routes())
        .merge(posts::routes())
        .merge(lists::routes())
        .merge(users::routes())
        .merge(circles::routes())
        .merge(restaurants::routes())
        .merge(health::routes())
}
