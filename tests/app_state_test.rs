use assert_matches::assert_matches;
use uuid::Uuid;

use bodega_core::config::AppConfig;
use bodega_core::entities::sheet::SheetKind;
use bodega_core::errors::AppError;
use bodega_core::AppState;

fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
    // In-memory SQLite: one connection, or each pooled connection gets its
    // own empty database.
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg.auto_migrate = true;
    cfg
}

#[tokio::test]
async fn initialize_migrates_and_wires_services() {
    let (state, _events) = AppState::initialize(test_config())
        .await
        .expect("bootstrap should succeed");

    // The schema exists and the services run against the shared pool.
    let sheet = state
        .services
        .grid
        .get_or_create_sheet(Uuid::new_v4(), SheetKind::Kahon)
        .await
        .unwrap();
    assert_eq!(sheet.columns, state.config.default_sheet_columns);
}

#[tokio::test]
async fn initialize_rejects_invalid_config() {
    let mut cfg = test_config();
    cfg.default_sheet_columns = 1;

    let result = AppState::initialize(cfg).await;
    assert_matches!(result, Err(AppError::ConfigError(_)));
}
