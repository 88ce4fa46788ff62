use crate::server::{ServerState, metrics::RequestMetrics, places::PlacesClient};
use axum::middleware;
use sqlx::postgres::PgPoolOptions;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use supperclub_common::snowflake::{ProcessId, SnowflakePartOutOfRangeError, WorkerId};
use supperclub_db::client::{DbClient, DbError};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server;

const DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Snowflake id part out of range: {0}")]
    SnowflakeId(#[from] SnowflakePartOutOfRangeError<u8>),
    #[error("Error connecting to the database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Error running migrations: {0}")]
    Migrate(#[from] DbError),
    #[error("Error building the places http client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    database_url: String,
    worker_id: u8,
    process_id: u8,
    places_api_key: Option<String>,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "supperclub_api=debug,supperclub_common=debug,supperclub_db=debug,\
                tower_http=debug,axum::rejection=trace,sqlx=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .connect(&env.database_url)
        .await?;

    let worker_id = WorkerId::try_from(env.worker_id)?;
    let process_id = ProcessId::try_from(env.process_id)?;
    let db_client = DbClient::new(pool, worker_id, process_id);
    db_client.migrate().await?;

    if env.places_api_key.is_none() {
        warn!("PLACES_API_KEY is not set; search will serve local results only");
    }
    let places_client = PlacesClient::new(env.places_api_key)?;

    let state = ServerState {
        db_client: Arc::new(db_client),
        places_client: Arc::new(places_client),
        metrics: Arc::new(RequestMetrics::default()),
    };

    let app = server::routes()
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            server::metrics::track_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InitError::TcpServe)?;

    Ok(())
}
