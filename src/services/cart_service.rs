use uuid::Uuid;

use crate::{
    domain::{
        catalog::{find_variant_by_barcode, resolve_variant},
        checkout::CheckoutStep,
    },
    dto::cart::{AddToCartRequest, CreateSessionRequest, ScanRequest, SelectCustomerRequest, SessionView, UpdateQuantityRequest},
    error::{AppError, AppResult},
    models::{Article, Variant},
    response::{ApiResponse, Meta},
    services::catalog_service::fetch_article,
    session::PosSession,
    state::AppState,
};

pub async fn create_session(
    state: &AppState,
    payload: CreateSessionRequest,
) -> AppResult<ApiResponse<SessionView>> {
    let session = state
        .sessions
        .create(payload.channel.unwrap_or_default())
        .await;
    tracing::debug!(session_id = %session.id, channel = session.channel.as_str(), "session opened");
    Ok(ApiResponse::success(
        "Session created",
        SessionView::from(&session),
        Some(Meta::empty()),
    ))
}

pub async fn get_session(state: &AppState, id: Uuid) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(ApiResponse::success("OK", SessionView::from(&*session), None))
}

pub async fn close_session(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    if !state.sessions.remove(id).await {
        return Err(AppError::not_found(format!("session {id}")));
    }
    Ok(ApiResponse::success(
        "Session closed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    id: Uuid,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    let article = fetch_article(state, payload.article_id).await?;
    let variant = pick_variant(&article, &payload)?;
    let quantity = payload.quantity.unwrap_or(1);

    let view = {
        let mut session = handle.lock().await;
        apply_add(&mut session, &article, variant, quantity)?
    };

    state
        .audit(
            "cart_add",
            "cart_lines",
            serde_json::json!({
                "session_id": id,
                "article_id": article.id,
                "variant_id": variant.map(|v| v.id),
                "quantity": quantity,
            }),
        )
        .await;

    Ok(ApiResponse::success("Added to cart", view, None))
}

pub async fn scan_barcode(
    state: &AppState,
    id: Uuid,
    payload: ScanRequest,
) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    let articles = state.catalog.list_articles().await?;
    let (article, variant) = find_variant_by_barcode(&articles, &payload.barcode).inspect_err(|_| {
        tracing::info!(session_id = %id, barcode = %payload.barcode, "barcode not recognized");
    })?;
    let quantity = payload.quantity.unwrap_or(1);

    let view = {
        let mut session = handle.lock().await;
        apply_add(&mut session, article, variant, quantity)?
    };

    state
        .audit(
            "cart_scan",
            "cart_lines",
            serde_json::json!({
                "session_id": id,
                "barcode": payload.barcode,
                "quantity": quantity,
            }),
        )
        .await;

    Ok(ApiResponse::success("Added to cart", view, None))
}

pub async fn update_quantity(
    state: &AppState,
    id: Uuid,
    line_id: Uuid,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let line = session
        .cart
        .line(line_id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("cart line {line_id}")))?;

    // Only growth needs the live article; shrinking always fits.
    if payload.quantity > i64::from(line.quantity) {
        let requested = u32::try_from(payload.quantity)
            .map_err(|_| AppError::BadRequest("quantity is too large".into()))?;
        let article = fetch_article(state, line.article_id).await?;
        session
            .cart
            .grow(line_id, &article, requested)
            .inspect_err(|err| {
                tracing::warn!(session_id = %id, %line_id, error = %err, "quantity change rejected");
            })?;
    } else {
        session.cart.update_quantity(line_id, payload.quantity)?;
    }
    reset_completed(&mut session);
    let view = SessionView::from(&*session);
    drop(session);

    state
        .audit(
            "cart_update",
            "cart_lines",
            serde_json::json!({ "session_id": id, "line_id": line_id, "quantity": payload.quantity }),
        )
        .await;

    Ok(ApiResponse::success("OK", view, None))
}

pub async fn remove_line(
    state: &AppState,
    id: Uuid,
    line_id: Uuid,
) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    let view = {
        let mut session = handle.lock().await;
        if !session.cart.remove_line(line_id) {
            return Err(AppError::not_found(format!("cart line {line_id}")));
        }
        SessionView::from(&*session)
    };

    state
        .audit(
            "cart_remove",
            "cart_lines",
            serde_json::json!({ "session_id": id, "line_id": line_id }),
        )
        .await;

    Ok(ApiResponse::success("Removed from cart", view, None))
}

pub async fn select_customer(
    state: &AppState,
    id: Uuid,
    payload: SelectCustomerRequest,
) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    if let Some(customer_id) = payload.customer_id {
        state
            .references
            .get_customer(customer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("customer {customer_id}")))?;
    }

    let mut session = handle.lock().await;
    session.cart.select_customer(payload.customer_id);
    Ok(ApiResponse::success("Customer selected", SessionView::from(&*session), None))
}

fn pick_variant<'a>(article: &'a Article, payload: &AddToCartRequest) -> AppResult<Option<&'a Variant>> {
    match (payload.variant_id, payload.size_id, payload.color_id) {
        (Some(variant_id), _, _) => article
            .variant(variant_id)
            .map(Some)
            .ok_or_else(|| AppError::not_found(format!("variant {variant_id}"))),
        (None, None, None) => Ok(None),
        (None, size_id, color_id) => resolve_variant(article, size_id, color_id).map(Some),
    }
}

fn apply_add(
    session: &mut PosSession,
    article: &Article,
    variant: Option<&Variant>,
    quantity: u32,
) -> AppResult<SessionView> {
    match session.cart.add(article, variant, quantity) {
        Ok(line) => {
            tracing::debug!(
                session_id = %session.id,
                line_id = %line.id,
                quantity = line.quantity,
                "cart line updated"
            );
        }
        Err(err) => {
            tracing::warn!(session_id = %session.id, article = %article.name, error = %err, "add to cart rejected");
            return Err(err);
        }
    }
    reset_completed(session);
    Ok(SessionView::from(&*session))
}

/// Editing the cart after a receipt starts a new sale.
fn reset_completed(session: &mut PosSession) {
    if session.checkout == CheckoutStep::Completed {
        session.checkout = CheckoutStep::Idle;
    }
}
