use std::{error::Error, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use clap::Parser;
use common::config::{BackendConfig, Config};
use http::header::HeaderValue;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::{
    error::ApiError,
    model::{DEFAULT_ESTADOS, EstadoPedido, Pedido, SetupReport, validate_estado},
    storage::PedidoStorage,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "pedidos/config/dev.yaml")]
    pub config: String,
}

pub fn initialize_executable() -> Result<Config, Box<dyn Error + Send + Sync>> {
    if let Ok(path) = dotenvy::dotenv() {
        println!("Loaded environment from: {:?}", path);
    }

    let args = Args::parse();
    println!("Loading config from: {}", args.config);
    let config = Config::load(&args.config)?;
    println!("Loaded config: {:#?}", config);

    Ok(config)
}

/// `RUST_LOG` takes precedence over the configured level.
pub fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        eprintln!("Tracing subscriber already initialized");
    }
}

#[derive(Clone)]
pub struct AppState {
    storage: Arc<dyn PedidoStorage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn PedidoStorage>) -> Self {
        Self { storage }
    }
}

/// First value of `key` in the query string. Repeated keys never reject the
/// request, so every answer keeps the JSON error shape.
pub fn first_query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

pub async fn get_pedidos_by_estado(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Pedido>>, ApiError> {
    let estado = validate_estado(first_query_value(&params, "estado"))?;

    // A store failure here is a 500, not a missing estado.
    let id_estado = match state.storage.find_estado_id(estado).await {
        Ok(Some(id_estado)) => id_estado,
        Ok(None) => {
            tracing::info!(estado, "Estado not present in catalog");
            return Err(ApiError::EstadoNotFound(estado.to_string()));
        }
        Err(e) => {
            tracing::error!(error = %e, estado, "Failed to resolve estado");
            return Err(ApiError::PedidosUnavailable);
        }
    };

    match state.storage.list_pedidos_by_estado(id_estado).await {
        Ok(pedidos) => {
            tracing::info!(estado, count = pedidos.len(), "Listed pedidos");
            Ok(Json(pedidos))
        }
        Err(e) => {
            tracing::error!(error = %e, estado, id_estado, "Failed to list pedidos");
            Err(ApiError::PedidosUnavailable)
        }
    }
}

pub async fn get_all_estados_pedido(
    State(state): State<AppState>,
) -> Result<Json<Vec<EstadoPedido>>, ApiError> {
    state.storage.list_estados().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "Failed to list estados");
        ApiError::EstadosUnavailable
    })
}

pub async fn setup_estados(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SetupReport>), ApiError> {
    let outcomes = state.storage.setup_estados(&DEFAULT_ESTADOS).await.map_err(|e| {
        tracing::error!(error = %e, "Cannot run estado setup");
        ApiError::DatabaseUnavailable
    })?;

    let report = SetupReport::from_outcomes(&outcomes);
    if report.success() {
        tracing::info!(entries = report.details.len(), "Estado setup completed");
    } else {
        tracing::warn!(details = ?report.details, "Estado setup completed with failures");
    }
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}

fn cors_layer(config: &BackendConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

pub fn create_router(state: AppState, config: &BackendConfig) -> Router {
    Router::new()
        .route("/pedidos", get(get_pedidos_by_estado))
        .route("/estados_pedido", get(get_all_estados_pedido))
        .route("/setup_estados", post(setup_estados))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

pub async fn run_backend(
    config: BackendConfig,
    storage: Arc<dyn PedidoStorage>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = create_router(AppState::new(storage), &config);

    tracing::info!("Starting backend service at {}", config.server_address);
    tracing::info!("GET  /pedidos?estado=<{}>", crate::model::ALLOWED_ESTADOS.join("|"));
    tracing::info!("GET  /estados_pedido");
    tracing::info!("POST /setup_estados");

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
