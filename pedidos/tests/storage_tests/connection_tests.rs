use common::config::DatabaseConfig;
use pedidos::error::StorageError;
use pedidos::model::DEFAULT_ESTADOS;
use pedidos::storage::{MySqlPedidoStorage, PedidoStorage};

// Nothing listens on port 1, so every connect is refused immediately.
fn unreachable_storage() -> MySqlPedidoStorage {
    MySqlPedidoStorage::new(&DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..DatabaseConfig::default()
    })
}

#[tokio::test]
async fn test_resolver_reports_unreachable_store_as_error() {
    let result = unreachable_storage().find_estado_id("Pagados").await;
    assert!(matches!(result, Err(StorageError::Connection(_))));
}

#[tokio::test]
async fn test_listing_reports_unreachable_store_as_error() {
    let storage = unreachable_storage();
    assert!(matches!(storage.list_pedidos_by_estado(1).await, Err(StorageError::Connection(_))));
    assert!(matches!(storage.list_estados().await, Err(StorageError::Connection(_))));
}

#[tokio::test]
async fn test_setup_fails_before_processing_entries() {
    let result = unreachable_storage().setup_estados(&DEFAULT_ESTADOS).await;
    assert!(matches!(result, Err(StorageError::Connection(_))));
}
