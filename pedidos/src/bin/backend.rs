use std::error::Error;
use std::sync::Arc;

use pedidos::executable_utils::{initialize_executable, initialize_tracing, run_backend};
use pedidos::storage::{MySqlPedidoStorage, PedidoStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("Starting backend...");
    let config = initialize_executable()?;
    initialize_tracing(&config.backend.log_level);
    tracing::info!(database = ?config.common.database, "Using database");

    let storage: Arc<dyn PedidoStorage> = Arc::new(MySqlPedidoStorage::new(&config.common.database));
    run_backend(config.backend, storage).await
}
