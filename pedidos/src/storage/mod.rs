// Re-export storage-related modules
pub mod mysql;

pub use mysql::*;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::model::{EstadoId, EstadoPedido, EstadoSeed, Pedido, SetupOutcome};

#[async_trait]
pub trait PedidoStorage: Send + Sync {
    /// Resolve a status name (exact, case-sensitive) to its identifier.
    async fn find_estado_id(&self, nombre_estado: &str) -> Result<Option<EstadoId>, StorageError>;

    /// Orders with the given status, most recent `fecha_pedido` first.
    async fn list_pedidos_by_estado(&self, id_estado: EstadoId) -> Result<Vec<Pedido>, StorageError>;

    /// Whole status catalog ordered by name.
    async fn list_estados(&self) -> Result<Vec<EstadoPedido>, StorageError>;

    /// Insert every seed whose name is not in the catalog yet. Per-entry
    /// failures are reported as outcomes; `Err` means nothing was processed.
    async fn setup_estados(&self, seeds: &[EstadoSeed]) -> Result<Vec<SetupOutcome>, StorageError>;
}
