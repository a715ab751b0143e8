use axum::http::StatusCode;
use common::test_helpers::{TestResult, test_utils};
use common::test_assert_eq;
use pedidos::model::EstadoPedido;

use super::mocks::{MockPedidoStorage, create_test_app, error_message, query_failure, send};

fn estado(id_estado: i32, nombre: &str, descripcion: Option<&str>) -> EstadoPedido {
    EstadoPedido {
        id_estado,
        nombre_estado: nombre.to_string(),
        descripcion_estado: descripcion.map(str::to_string),
    }
}

#[tokio::test]
async fn test_lists_estados_catalog() -> TestResult {
    let mut storage = MockPedidoStorage::new();
    storage.expect_list_estados().times(1).returning(|| {
        Ok(vec![
            estado(5, "Cancelado", Some("El pedido ha sido cancelado.")),
            estado(3, "Enviado", Some("El pedido ha sido enviado al cliente.")),
            estado(9, "Pagados", None),
        ])
    });
    let app = create_test_app(storage);

    let (status, body) = send(app, "GET", "/estados_pedido").await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(
        body,
        serde_json::json!([
            {"id_estado": 5, "nombre_estado": "Cancelado", "descripcion_estado": "El pedido ha sido cancelado."},
            {"id_estado": 3, "nombre_estado": "Enviado", "descripcion_estado": "El pedido ha sido enviado al cliente."},
            {"id_estado": 9, "nombre_estado": "Pagados", "descripcion_estado": null}
        ])
    );
    Ok(())
}

#[tokio::test]
async fn test_estados_query_failure_is_server_error() -> TestResult {
    let mut storage = MockPedidoStorage::new();
    storage.expect_list_estados().returning(|| Err(query_failure()));
    let app = create_test_app(storage);

    let (status, body) = send(app, "GET", "/estados_pedido").await?;

    test_utils::check_status_code(status, StatusCode::INTERNAL_SERVER_ERROR)?;
    test_assert_eq!(error_message(&body), "Error al obtener los estados de pedido");
    Ok(())
}
