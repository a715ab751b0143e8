use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ApiError;

pub type EstadoId = i32;
pub type PedidoId = i32;
pub type UsuarioId = i32;

/// Status names accepted by `GET /pedidos`. Kept apart from the
/// `Estado_pedidos` catalog, which may hold more rows than these.
pub const ALLOWED_ESTADOS: [&str; 4] = ["Enviados", "Cancelados", "Pagados", "Reenviados"];

pub fn validate_estado(estado: Option<&str>) -> Result<&str, ApiError> {
    let estado = match estado {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ApiError::MissingEstado),
    };

    if ALLOWED_ESTADOS.contains(&estado) {
        Ok(estado)
    } else {
        Err(ApiError::InvalidEstado(estado.to_string()))
    }
}

/// Renders a stored timestamp the way `datetime.isoformat()` does: seconds
/// precision, with microseconds only when they are non-zero.
pub fn to_iso8601(value: Option<NaiveDateTime>) -> Option<String> {
    value.map(|ts| {
        if ts.nanosecond() / 1_000 == 0 {
            ts.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        }
    })
}

/// Raw row of the order listing query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PedidoRow {
    pub id_pedido: PedidoId,
    pub id_usuario: UsuarioId,
    pub nombre_usuario: Option<String>,
    pub apellido_usuario: Option<String>,
    pub correo_electronico: Option<String>,
    pub fecha_pedido: Option<NaiveDateTime>,
    pub direccion_envio: Option<String>,
    pub id_estado: EstadoId,
    pub nombre_estado: String,
    pub total_pedido: Option<Decimal>,
    pub notas_pedido: Option<String>,
    pub fecha_actualizacion: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pedido {
    pub id_pedido: PedidoId,
    pub id_usuario: UsuarioId,
    pub nombre_usuario: Option<String>,
    pub apellido_usuario: Option<String>,
    pub correo_electronico: Option<String>,
    pub fecha_pedido: Option<String>,
    pub direccion_envio: Option<String>,
    pub id_estado: EstadoId,
    pub nombre_estado: String,
    pub total_pedido: Option<Decimal>,
    pub notas_pedido: Option<String>,
    pub fecha_actualizacion: Option<String>,
}

impl From<PedidoRow> for Pedido {
    fn from(row: PedidoRow) -> Self {
        Self {
            id_pedido: row.id_pedido,
            id_usuario: row.id_usuario,
            nombre_usuario: row.nombre_usuario,
            apellido_usuario: row.apellido_usuario,
            correo_electronico: row.correo_electronico,
            fecha_pedido: to_iso8601(row.fecha_pedido),
            direccion_envio: row.direccion_envio,
            id_estado: row.id_estado,
            nombre_estado: row.nombre_estado,
            total_pedido: row.total_pedido,
            notas_pedido: row.notas_pedido,
            fecha_actualizacion: to_iso8601(row.fecha_actualizacion),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct EstadoPedido {
    pub id_estado: EstadoId,
    pub nombre_estado: String,
    pub descripcion_estado: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstadoSeed {
    pub nombre: &'static str,
    pub descripcion: &'static str,
}

/// Catalog rows created by `POST /setup_estados`.
pub const DEFAULT_ESTADOS: [EstadoSeed; 8] = [
    EstadoSeed { nombre: "Pendiente", descripcion: "Pedido recibido, pendiente de procesamiento." },
    EstadoSeed { nombre: "En Proceso", descripcion: "El pedido está siendo preparado." },
    EstadoSeed { nombre: "Enviado", descripcion: "El pedido ha sido enviado al cliente." },
    EstadoSeed { nombre: "Entregado", descripcion: "El pedido ha sido entregado al cliente." },
    EstadoSeed { nombre: "Cancelado", descripcion: "El pedido ha sido cancelado." },
    EstadoSeed { nombre: "Pagado", descripcion: "El pedido ha sido pagado por el cliente." },
    EstadoSeed { nombre: "Reenviado", descripcion: "El pedido ha sido reenviado." },
    EstadoSeed { nombre: "Devuelto", descripcion: "El pedido ha sido devuelto." },
];

/// Result of bootstrapping a single catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupOutcome {
    AlreadyExists { nombre: String },
    Inserted { nombre: String, id: u64 },
    Failed { nombre: String, error: String },
}

impl SetupOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SetupOutcome::Failed { .. })
    }
}

impl fmt::Display for SetupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupOutcome::AlreadyExists { nombre } => write!(f, "Estado '{}' ya existe.", nombre),
            SetupOutcome::Inserted { nombre, id } => {
                write!(f, "Estado '{}' insertado con ID: {}", nombre, id)
            }
            SetupOutcome::Failed { nombre, error } => {
                write!(f, "Error al insertar estado '{}': {}", nombre, error)
            }
        }
    }
}

pub const SETUP_COMPLETED_MESSAGE: &str = "Proceso de configuración de estados completado.";

/// Body of `POST /setup_estados`. Only `message` and `details` are
/// serialized; the failure count stays internal and is read through
/// [`SetupReport::success`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupReport {
    pub message: String,
    pub details: Vec<String>,
    #[serde(skip)]
    failures: usize,
}

impl SetupReport {
    pub fn from_outcomes(outcomes: &[SetupOutcome]) -> Self {
        Self {
            message: SETUP_COMPLETED_MESSAGE.to_string(),
            details: outcomes.iter().map(ToString::to_string).collect(),
            failures: outcomes.iter().filter(|o| o.is_failure()).count(),
        }
    }

    /// True when no entry failed to insert.
    pub fn success(&self) -> bool {
        self.failures == 0
    }
}
