use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{ArticleList, BarcodeMatch, ColorList, CustomerList, SizeList, VariantList},
    error::AppResult,
    models::Article,
    response::ApiResponse,
    routes::params::{ArticleQuery, BarcodeQuery},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles))
        .route("/articles/lookup", get(lookup_barcode))
        .route("/articles/{id}", get(get_article))
        .route("/articles/{id}/variants", get(list_variants))
        .route("/sizes", get(list_sizes))
        .route("/colors", get(list_colors))
        .route("/customers", get(list_customers))
}

#[utoipa::path(
    get,
    path = "/api/articles",
    params(
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("category" = Option<String>, Query, description = "Exact category, case-insensitive"),
        ("min_price" = Option<i64>, Query, description = "Minimum base price"),
        ("max_price" = Option<i64>, Query, description = "Maximum base price"),
        ("active_only" = Option<bool>, Query, description = "Hide inactive articles, default true"),
        ("sort_by" = Option<String>, Query, description = "Sort by: name, price, stock"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List articles", body = ApiResponse<ArticleList>)
    ),
    tag = "Catalog"
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> AppResult<Json<ApiResponse<ArticleList>>> {
    let resp = catalog_service::list_articles(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/articles/lookup",
    params(
        ("barcode" = String, Query, description = "Scanned barcode")
    ),
    responses(
        (status = 200, description = "Article and variant matching the barcode", body = ApiResponse<BarcodeMatch>),
        (status = 404, description = "Unknown barcode")
    ),
    tag = "Catalog"
)]
pub async fn lookup_barcode(
    State(state): State<AppState>,
    Query(query): Query<BarcodeQuery>,
) -> AppResult<Json<ApiResponse<BarcodeMatch>>> {
    let resp = catalog_service::lookup_barcode(&state, &query.barcode).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article with its variants", body = ApiResponse<Article>),
        (status = 404, description = "Not Found")
    ),
    tag = "Catalog"
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Article>>> {
    let resp = catalog_service::get_article(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/articles/{id}/variants",
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Active variants with stock", body = ApiResponse<VariantList>),
        (status = 404, description = "Not Found")
    ),
    tag = "Catalog"
)]
pub async fn list_variants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<VariantList>>> {
    let resp = catalog_service::list_variants(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sizes",
    responses(
        (status = 200, description = "Sizes in display order", body = ApiResponse<SizeList>)
    ),
    tag = "Catalog"
)]
pub async fn list_sizes(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SizeList>>> {
    let resp = catalog_service::list_sizes(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/colors",
    responses(
        (status = 200, description = "Colors", body = ApiResponse<ColorList>)
    ),
    tag = "Catalog"
)]
pub async fn list_colors(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ColorList>>> {
    let resp = catalog_service::list_colors(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "Known customers", body = ApiResponse<CustomerList>)
    ),
    tag = "Catalog"
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = catalog_service::list_customers(&state).await?;
    Ok(Json(resp))
}
