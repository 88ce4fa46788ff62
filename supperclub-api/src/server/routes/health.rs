use crate::server::{
    ServerError, ServerRouter,
    json::Json,
    metrics::{MetricsSnapshot, MetricsSummary, RequestMetrics},
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use supperclub_db::client::DbClient;

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_health)
        .typed_get(get_metrics)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/health", rejection(ServerError))]
struct HealthPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/metrics", rejection(ServerError))]
struct MetricsPath();

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
    connection_pool: ConnectionPoolHealth,
    requests: MetricsSummary,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
struct DatabaseHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
    max_connections: u32,
}

/// Round-trips the database and reports pool and request-sampler state.
/// 200 when the database answers, 503 otherwise.
async fn get_health(
    HealthPath(): HealthPath,
    State(db): State<Arc<DbClient>>,
    State(metrics): State<Arc<RequestMetrics>>,
) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let database = match tokio::time::timeout(DB_CHECK_TIMEOUT, db.ping()).await {
        Ok(Ok(())) => DatabaseHealth {
            status: "ok",
            response_time_ms: Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
            error: None,
        },
        Ok(Err(err)) => DatabaseHealth {
            status: "error",
            response_time_ms: None,
            error: Some(err.to_string()),
        },
        Err(_) => DatabaseHealth {
            status: "error",
            response_time_ms: None,
            error: Some("Query timeout (>5s)".to_owned()),
        },
    };

    let connection_pool = ConnectionPoolHealth {
        size: db.pool_size(),
        idle_connections: db.pool_idle(),
        max_connections: db.pool_max_connections(),
    };

    let healthy = database.status == "ok";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" },
            database,
            connection_pool,
            requests: metrics.summary(),
        }),
    )
}

async fn get_metrics(
    MetricsPath(): MetricsPath,
    State(metrics): State<Arc<RequestMetrics>>,
) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
