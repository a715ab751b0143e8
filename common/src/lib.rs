pub mod config;

/// Common utilities shared across the pedidos workspace
///
/// This crate provides shared functionality that can be used by the service
/// crate and its test suites, including:
///
/// - Configuration loading (YAML file plus environment overrides)
/// - Shared test utilities and database helpers

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{TestError, TestResult, create_test_connection, get_test_database_config};
