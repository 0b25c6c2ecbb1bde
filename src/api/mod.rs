pub mod handlers;
pub mod response;

use axum::{
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::service::{ClientService, LedgerService, RemovalService, StatementService};

/// 共享状态: 各服务共用同一个连接池
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub removal: Arc<RemovalService>,
    pub clients: Arc<ClientService>,
    pub statements: Arc<StatementService>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            ledger: Arc::new(LedgerService::new(pool.clone())),
            removal: Arc::new(RemovalService::new(pool.clone())),
            clients: Arc::new(ClientService::new(pool.clone())),
            statements: Arc::new(StatementService::new(pool)),
        }
    }
}

/// 构建全部路由
pub fn router(state: AppState) -> Router {
    let shipment_routes = Router::new()
        .route(
            "/api/shipments",
            get(handlers::list_shipments).post(handlers::create_shipment),
        )
        .route(
            "/api/shipments/:id",
            get(handlers::get_shipment)
                .put(handlers::update_shipment)
                .delete(handlers::delete_shipment),
        )
        .with_state(state.clone());

    let client_routes = Router::new()
        .route(
            "/api/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/api/clients/:id",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route("/api/clients/:id/statement", get(handlers::client_statement))
        .route("/api/clients/:id/debits/export", get(handlers::export_client_debits))
        .with_state(state.clone());

    let debit_routes = Router::new()
        .route("/api/debits", get(handlers::list_debits).post(handlers::create_debit))
        .route(
            "/api/debits/:id",
            get(handlers::get_debit).delete(handlers::delete_debit),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(shipment_routes)
        .merge(client_routes)
        .merge(debit_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
