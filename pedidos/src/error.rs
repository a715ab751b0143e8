use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::model::ALLOWED_ESTADOS;

/// Failures at the data-access boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to connect to MySQL: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Failed to execute query: {0}")]
    Query(#[source] sqlx::Error),
}

/// Errors returned to HTTP callers as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Parámetro 'estado' es requerido")]
    MissingEstado,

    #[error("Estado '{0}' no es válido. Estados permitidos: {allowed}", allowed = ALLOWED_ESTADOS.join(", "))]
    InvalidEstado(String),

    #[error("No se encontró el estado '{0}' en la base de datos.")]
    EstadoNotFound(String),

    #[error("Error al obtener los pedidos de la base de datos")]
    PedidosUnavailable,

    #[error("Error al obtener los estados de pedido")]
    EstadosUnavailable,

    #[error("No se pudo conectar a la base de datos")]
    DatabaseUnavailable,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingEstado | ApiError::InvalidEstado(_) => StatusCode::BAD_REQUEST,
            ApiError::EstadoNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PedidosUnavailable
            | ApiError::EstadosUnavailable
            | ApiError::DatabaseUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
