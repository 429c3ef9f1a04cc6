use uuid::Uuid;

use crate::{
    dto::sales::SaleList,
    error::{AppError, AppResult},
    models::Sale,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_sales(state: &AppState, query: Pagination) -> AppResult<ApiResponse<SaleList>> {
    let (page, limit, offset) = query.normalize();
    let (items, total) = state.sales.list_sales(offset as u64, limit as u64).await?;
    let meta = Meta::new(page, limit, i64::try_from(total).unwrap_or(i64::MAX));
    Ok(ApiResponse::success("Ok", SaleList { items }, Some(meta)))
}

pub async fn get_sale(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Sale>> {
    let sale = state
        .sales
        .get_sale(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("sale {id}")))?;
    Ok(ApiResponse::success("Ok", sale, None))
}
