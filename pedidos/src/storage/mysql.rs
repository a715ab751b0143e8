use async_trait::async_trait;
use common::config::DatabaseConfig;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, MySqlConnection};
use tracing::{debug, error, info, warn};

use crate::error::StorageError;
use crate::model::{EstadoId, EstadoPedido, EstadoSeed, Pedido, PedidoRow, SetupOutcome};
use crate::storage::PedidoStorage;

const SELECT_ESTADO_ID: &str = "SELECT id_estado FROM Estado_pedidos WHERE nombre_estado = ?";

const SELECT_PEDIDOS_BY_ESTADO: &str = r#"
    SELECT
        p.id_pedido,
        p.id_usuario,
        u.nombre_usuario,
        u.apellido_usuario,
        u.correo_electronico,
        p.fecha_pedido,
        p.direccion_envio,
        p.id_estado,
        ep.nombre_estado,
        p.total_pedido,
        p.notas_pedido,
        p.fecha_actualizacion
    FROM Pedidos p
    JOIN Usuarios u ON p.id_usuario = u.id_usuario
    JOIN Estado_pedidos ep ON p.id_estado = ep.id_estado
    WHERE p.id_estado = ?
    ORDER BY p.fecha_pedido DESC
"#;

const SELECT_ESTADOS: &str =
    "SELECT id_estado, nombre_estado, descripcion_estado FROM Estado_pedidos ORDER BY nombre_estado";

const INSERT_ESTADO: &str =
    "INSERT INTO Estado_pedidos (nombre_estado, descripcion_estado) VALUES (?, ?)";

/// MySQL-backed storage. Every operation opens its own connection and
/// closes it before returning; the connection is also dropped (and its
/// socket closed) on any early return.
#[derive(Clone)]
pub struct MySqlPedidoStorage {
    options: MySqlConnectOptions,
}

impl MySqlPedidoStorage {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
        }
    }

    async fn connect(&self) -> Result<MySqlConnection, StorageError> {
        let conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to connect to MySQL");
                StorageError::Connection(e)
            })?;
        debug!("Opened MySQL connection");
        Ok(conn)
    }
}

async fn close(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close MySQL connection cleanly");
    }
}

fn query_error(e: sqlx::Error) -> StorageError {
    error!(error = %e, "Failed to execute query");
    StorageError::Query(e)
}

/// `Ok(None)` when the name is already in the catalog, otherwise the id
/// assigned to the new row. The insert runs in its own transaction.
async fn insert_estado_if_missing(
    conn: &mut MySqlConnection,
    seed: &EstadoSeed,
) -> Result<Option<u64>, sqlx::Error> {
    let existing = sqlx::query_scalar::<_, EstadoId>(SELECT_ESTADO_ID)
        .bind(seed.nombre)
        .fetch_optional(&mut *conn)
        .await?;
    if existing.is_some() {
        return Ok(None);
    }

    let mut tx = conn.begin().await?;
    let inserted = sqlx::query(INSERT_ESTADO)
        .bind(seed.nombre)
        .bind(seed.descripcion)
        .execute(&mut *tx)
        .await;

    match inserted {
        Ok(result) => {
            tx.commit().await?;
            Ok(Some(result.last_insert_id()))
        }
        Err(e) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(error = %rollback_error, estado = seed.nombre, "Rollback failed");
            }
            Err(e)
        }
    }
}

#[async_trait]
impl PedidoStorage for MySqlPedidoStorage {
    async fn find_estado_id(&self, nombre_estado: &str) -> Result<Option<EstadoId>, StorageError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_scalar::<_, EstadoId>(SELECT_ESTADO_ID)
            .bind(nombre_estado)
            .fetch_optional(&mut conn)
            .await;
        close(conn).await;

        let id_estado = result.map_err(query_error)?;
        debug!(nombre_estado, ?id_estado, "Resolved estado");
        Ok(id_estado)
    }

    async fn list_pedidos_by_estado(&self, id_estado: EstadoId) -> Result<Vec<Pedido>, StorageError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, PedidoRow>(SELECT_PEDIDOS_BY_ESTADO)
            .bind(id_estado)
            .fetch_all(&mut conn)
            .await;
        close(conn).await;

        let rows = result.map_err(query_error)?;
        debug!(id_estado, count = rows.len(), "Fetched pedidos");
        Ok(rows.into_iter().map(Pedido::from).collect())
    }

    async fn list_estados(&self) -> Result<Vec<EstadoPedido>, StorageError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, EstadoPedido>(SELECT_ESTADOS)
            .fetch_all(&mut conn)
            .await;
        close(conn).await;

        result.map_err(query_error)
    }

    async fn setup_estados(&self, seeds: &[EstadoSeed]) -> Result<Vec<SetupOutcome>, StorageError> {
        let mut conn = self.connect().await?;
        let mut outcomes = Vec::with_capacity(seeds.len());

        for seed in seeds {
            let nombre = seed.nombre.to_string();
            let outcome = match insert_estado_if_missing(&mut conn, seed).await {
                Ok(None) => SetupOutcome::AlreadyExists { nombre },
                Ok(Some(id)) => {
                    info!(estado = seed.nombre, id, "Inserted estado");
                    SetupOutcome::Inserted { nombre, id }
                }
                Err(e) => {
                    error!(error = %e, estado = seed.nombre, "Failed to insert estado");
                    SetupOutcome::Failed { nombre, error: e.to_string() }
                }
            };
            outcomes.push(outcome);
        }

        close(conn).await;
        Ok(outcomes)
    }
}
