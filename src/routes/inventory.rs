use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{InventoryAdjustRequest, LowStockList},
    error::AppResult,
    models::Variant,
    response::ApiResponse,
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/low-stock", get(list_low_stock))
        .route("/variants/{id}", patch(adjust_inventory))
}

#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    responses(
        (status = 200, description = "Variants at or below their minimum stock", body = ApiResponse<LowStockList>)
    ),
    tag = "Inventory"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<LowStockList>>> {
    let resp = inventory_service::list_low_stock(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/inventory/variants/{id}",
    params(
        ("id" = Uuid, Path, description = "Variant ID")
    ),
    request_body = InventoryAdjustRequest,
    responses(
        (status = 200, description = "Adjust variant stock", body = ApiResponse<Variant>),
        (status = 400, description = "Invalid adjustment"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Inventory"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InventoryAdjustRequest>,
) -> AppResult<Json<ApiResponse<Variant>>> {
    let resp = inventory_service::adjust_inventory(&state, id, payload).await?;
    Ok(Json(resp))
}
