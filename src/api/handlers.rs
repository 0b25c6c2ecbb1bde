use super::response::ApiResponse;
use super::AppState;
use crate::error::LedgerError;
use crate::models::{
    ClientRequest, DebitFilter, NewDebitRequest, NewShipmentRequest, ShipmentUpdateRequest,
};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

type ApiResult = Result<Response, LedgerError>;

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_shipments(State(state): State<AppState>) -> ApiResult {
    let shipments = state.ledger.list_shipments().await?;
    let message = format!("{} shipment(s)", shipments.len());
    Ok(Json(ApiResponse::ok(message, shipments)).into_response())
}

pub async fn get_shipment(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let shipment = state.ledger.get_shipment(id).await?;
    Ok(Json(ApiResponse::ok(format!("Shipment {}", id), shipment)).into_response())
}

/// 新建运输单 (同时生成初始运费账目)
pub async fn create_shipment(
    State(state): State<AppState>,
    payload: Result<Json<NewShipmentRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let shipment = state
        .ledger
        .create_shipment_with_initial_debit(req.validate()?)
        .await?;

    let message = format!("Shipment {} created", shipment.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message, shipment))).into_response())
}

/// 更新运输单并重建账目
pub async fn update_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ShipmentUpdateRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let shipment = state
        .ledger
        .reconcile_shipment_debits(id, req.validate()?)
        .await?;

    Ok(Json(ApiResponse::ok(format!("Shipment {} updated", id), shipment)).into_response())
}

pub async fn delete_shipment(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let removal = state.removal.delete_shipment_cascade(id).await?;
    Ok(Json(ApiResponse::ok(format!("Shipment {} deleted", id), removal)).into_response())
}

pub async fn list_clients(State(state): State<AppState>) -> ApiResult {
    let clients = state.clients.list_clients().await?;
    let message = format!("{} client(s)", clients.len());
    Ok(Json(ApiResponse::ok(message, clients)).into_response())
}

pub async fn get_client(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let client = state.clients.get_client(id).await?;
    Ok(Json(ApiResponse::ok(format!("Client {}", id), client)).into_response())
}

pub async fn create_client(
    State(state): State<AppState>,
    payload: Result<Json<ClientRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let client = state.clients.create_client(req.validate()?).await?;

    let message = format!("Client {} created", client.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message, client))).into_response())
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ClientRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let client = state.clients.update_client(id, req.validate()?).await?;
    Ok(Json(ApiResponse::ok(format!("Client {} updated", id), client)).into_response())
}

/// 删除客户 (仍有运输单/账目引用时返回 409)
pub async fn delete_client(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    state.removal.delete_client_guarded(id).await?;
    Ok(Json(ApiResponse::done(format!("Client {} deleted", id))).into_response())
}

pub async fn client_statement(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let statement = state.statements.client_statement(id).await?;
    Ok(Json(ApiResponse::ok(format!("Statement for client {}", id), statement)).into_response())
}

/// 导出客户账目 CSV
pub async fn export_client_debits(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult {
    let mut buffer = Vec::new();
    state.statements.export_client_debits(id, &mut buffer).await?;

    let disposition = format!("attachment; filename=\"client-{}-debits.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    )
        .into_response())
}

pub async fn list_debits(
    State(state): State<AppState>,
    filter: Result<Query<DebitFilter>, QueryRejection>,
) -> ApiResult {
    let Query(filter) = filter?;
    let debits = state.ledger.list_debits(&filter).await?;
    let message = format!("{} debit(s)", debits.len());
    Ok(Json(ApiResponse::ok(message, debits)).into_response())
}

pub async fn get_debit(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let debit = state.ledger.get_debit(id).await?;
    Ok(Json(ApiResponse::ok(format!("Debit {}", id), debit)).into_response())
}

pub async fn create_debit(
    State(state): State<AppState>,
    payload: Result<Json<NewDebitRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let debit = state.ledger.create_debit(req.validate()?).await?;

    let message = format!("Debit {} created", debit.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message, debit))).into_response())
}

pub async fn delete_debit(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    state.ledger.delete_debit(id).await?;
    Ok(Json(ApiResponse::done(format!("Debit {} deleted", id))).into_response())
}
