use axum::http::StatusCode;
use common::test_helpers::{TestResult, test_utils};
use common::{test_assert, test_assert_eq};
use pedidos::model::{DEFAULT_ESTADOS, EstadoSeed, SETUP_COMPLETED_MESSAGE, SetupOutcome};

use super::mocks::{
    MockPedidoStorage, connection_failure, create_test_app, error_message, send, send_request,
};

#[tokio::test]
async fn test_setup_reports_each_entry() -> TestResult {
    let mut storage = MockPedidoStorage::new();
    storage
        .expect_setup_estados()
        .withf(|seeds: &[EstadoSeed]| seeds == DEFAULT_ESTADOS.as_slice())
        .times(1)
        .returning(|seeds| {
            Ok(seeds
                .iter()
                .enumerate()
                .map(|(i, seed)| match i {
                    0 => SetupOutcome::AlreadyExists { nombre: seed.nombre.to_string() },
                    _ => SetupOutcome::Inserted {
                        nombre: seed.nombre.to_string(),
                        id: i as u64 + 1,
                    },
                })
                .collect())
        });
    let app = create_test_app(storage);

    let (status, body) = send(app, "POST", "/setup_estados").await?;

    test_utils::check_status_code(status, StatusCode::CREATED)?;
    test_assert_eq!(body["message"], SETUP_COMPLETED_MESSAGE);
    let details = body["details"].as_array().cloned().unwrap_or_default();
    test_assert_eq!(details.len(), 8);
    test_assert_eq!(details[0], "Estado 'Pendiente' ya existe.");
    test_assert_eq!(details[1], "Estado 'En Proceso' insertado con ID: 2");
    test_assert_eq!(details[7], "Estado 'Devuelto' insertado con ID: 8");
    Ok(())
}

#[tokio::test]
async fn test_setup_rerun_marks_everything_existing() -> TestResult {
    let mut storage = MockPedidoStorage::new();
    storage.expect_setup_estados().returning(|seeds| {
        Ok(seeds
            .iter()
            .map(|seed| SetupOutcome::AlreadyExists { nombre: seed.nombre.to_string() })
            .collect())
    });
    let app = create_test_app(storage);

    let (status, body) = send(app, "POST", "/setup_estados").await?;

    test_utils::check_status_code(status, StatusCode::CREATED)?;
    let details = body["details"].as_array().cloned().unwrap_or_default();
    test_assert_eq!(details.len(), DEFAULT_ESTADOS.len());
    test_assert!(details.iter().all(|d| d.as_str().is_some_and(|s| s.ends_with("ya existe."))));
    Ok(())
}

#[tokio::test]
async fn test_setup_partial_failure_still_completes() -> TestResult {
    let mut storage = MockPedidoStorage::new();
    storage.expect_setup_estados().returning(|_| {
        Ok(vec![
            SetupOutcome::Inserted { nombre: "Pendiente".to_string(), id: 1 },
            SetupOutcome::Failed {
                nombre: "En Proceso".to_string(),
                error: "Data too long for column 'nombre_estado'".to_string(),
            },
            SetupOutcome::Inserted { nombre: "Enviado".to_string(), id: 3 },
        ])
    });
    let app = create_test_app(storage);

    let (status, body) = send(app, "POST", "/setup_estados").await?;

    test_utils::check_status_code(status, StatusCode::CREATED)?;
    test_assert_eq!(
        body["details"][1],
        "Error al insertar estado 'En Proceso': Data too long for column 'nombre_estado'"
    );
    test_assert_eq!(body["details"][2], "Estado 'Enviado' insertado con ID: 3");
    Ok(())
}

#[tokio::test]
async fn test_setup_connection_failure_is_server_error() -> TestResult {
    let mut storage = MockPedidoStorage::new();
    storage.expect_setup_estados().returning(|_| Err(connection_failure()));
    let app = create_test_app(storage);

    let (status, body) = send(app, "POST", "/setup_estados").await?;

    test_utils::check_status_code(status, StatusCode::INTERNAL_SERVER_ERROR)?;
    test_assert_eq!(error_message(&body), "No se pudo conectar a la base de datos");
    Ok(())
}

#[tokio::test]
async fn test_setup_requires_post() -> TestResult {
    let mut storage = MockPedidoStorage::new();
    storage.expect_setup_estados().never();
    let app = create_test_app(storage);

    let response = send_request(app, "GET", "/setup_estados").await?;

    test_utils::check_status_code(response.status(), StatusCode::METHOD_NOT_ALLOWED)?;
    Ok(())
}
