use uuid::Uuid;

use crate::{
    domain::stock::low_stock_variants,
    dto::catalog::{InventoryAdjustRequest, LowStockList},
    error::{AppError, AppResult},
    models::Variant,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Variants at or under their own `min_stock`, lowest first.
pub async fn list_low_stock(state: &AppState) -> AppResult<ApiResponse<LowStockList>> {
    let articles = state.catalog.list_articles().await?;
    let items = low_stock_variants(&articles);
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Low stock", LowStockList { items }, Some(meta)))
}

pub async fn adjust_inventory(
    state: &AppState,
    variant_id: Uuid,
    payload: InventoryAdjustRequest,
) -> AppResult<ApiResponse<Variant>> {
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let updated = state.catalog.adjust_stock(variant_id, payload.delta).await?;
    tracing::info!(sku = %updated.sku, delta = payload.delta, stock = updated.stock, "stock adjusted");

    state
        .audit(
            "inventory_adjust",
            "variants",
            serde_json::json!({ "variant_id": updated.id, "delta": payload.delta }),
        )
        .await;

    Ok(ApiResponse::success("Inventory updated", updated, Some(Meta::empty())))
}
