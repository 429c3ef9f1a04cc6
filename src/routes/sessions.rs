use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        cart::{
            AddToCartRequest, CreateSessionRequest, ScanRequest, SelectCustomerRequest, SessionView,
            UpdateQuantityRequest,
        },
        sales::CheckoutRequest,
    },
    error::AppResult,
    models::Sale,
    response::ApiResponse,
    services::{cart_service, checkout_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(close_session))
        .route("/{id}/cart/lines", post(add_to_cart))
        .route("/{id}/cart/scan", post(scan_barcode))
        .route(
            "/{id}/cart/lines/{line_id}",
            patch(update_quantity).delete(remove_line),
        )
        .route("/{id}/cart/customer", put(select_customer))
        .route("/{id}/checkout/open", post(open_checkout))
        .route("/{id}/checkout/cancel", post(cancel_checkout))
        .route("/{id}/checkout", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session opened with an empty cart", body = ApiResponse<SessionView>)
    ),
    tag = "Sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SessionView>>)> {
    let resp = cart_service::create_session(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Cart, totals and checkout state", body = ApiResponse<SessionView>),
        (status = 404, description = "Not Found")
    ),
    tag = "Sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = cart_service::get_session(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session discarded"),
        (status = 404, description = "Not Found")
    ),
    tag = "Sessions"
)]
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::close_session(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/cart/lines",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added or merged", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown session, article or variant"),
        (status = 409, description = "Not enough stock"),
        (status = 422, description = "Variant required, inactive item or zero quantity")
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = cart_service::add_to_cart(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/cart/scan",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scanned item added", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown barcode"),
        (status = 409, description = "Not enough stock")
    ),
    tag = "Cart"
)]
pub async fn scan_barcode(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScanRequest>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = cart_service::scan_barcode(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/sessions/{id}/cart/lines/{line_id}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("line_id" = Uuid, Path, description = "Cart line ID")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity set; zero or less removes the line", body = ApiResponse<SessionView>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Not enough stock")
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = cart_service::update_quantity(&state, id, line_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/cart/lines/{line_id}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("line_id" = Uuid, Path, description = "Cart line ID")
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<SessionView>),
        (status = 404, description = "Not Found")
    ),
    tag = "Cart"
)]
pub async fn remove_line(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = cart_service::remove_line(&state, id, line_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}/cart/customer",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = SelectCustomerRequest,
    responses(
        (status = 200, description = "Customer attached or cleared", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown customer")
    ),
    tag = "Cart"
)]
pub async fn select_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectCustomerRequest>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = cart_service::select_customer(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/checkout/open",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Awaiting payment method", body = ApiResponse<SessionView>),
        (status = 422, description = "Checkout already finalizing")
    ),
    tag = "Checkout"
)]
pub async fn open_checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = checkout_service::open_checkout(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/checkout/cancel",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Back to idle, cart untouched", body = ApiResponse<SessionView>)
    ),
    tag = "Checkout"
)]
pub async fn cancel_checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SessionView>>> {
    let resp = checkout_service::cancel_checkout(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/checkout",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Sale recorded and cart emptied", body = ApiResponse<Sale>),
        (status = 409, description = "Stock changed since the item was added"),
        (status = 422, description = "Empty cart or missing customer information")
    ),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Sale>>)> {
    let resp = checkout_service::checkout(&state, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
