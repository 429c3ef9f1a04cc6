use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::checkout::{
        CheckoutStep, SaleDraft, invoice_number, invoice_prefix, prepare_sale, recheck_stock, validate,
    },
    dto::{cart::SessionView, sales::CheckoutRequest},
    error::AppResult,
    models::Sale,
    response::{ApiResponse, Meta},
    session::PosSession,
    state::AppState,
};

pub async fn open_checkout(state: &AppState, id: Uuid) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.checkout.open()?;
    Ok(ApiResponse::success(
        "Awaiting payment method",
        SessionView::from(&*session),
        None,
    ))
}

pub async fn cancel_checkout(state: &AppState, id: Uuid) -> AppResult<ApiResponse<SessionView>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.checkout.cancel()?;
    Ok(ApiResponse::success(
        "Checkout cancelled",
        SessionView::from(&*session),
        None,
    ))
}

/// Confirm the payment method and turn the cart into a recorded sale.
///
/// The session lock is held for the whole attempt so no cart edit can slip
/// in between the stock recheck and the write. On success the cart is
/// emptied; on any failure it is left exactly as it was.
pub async fn checkout(
    state: &AppState,
    id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Sale>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    // The finalizing step only lives in this frame. The stored step stays at
    // AwaitingPaymentMethod until the sale is written, so an attempt dropped
    // mid-await leaves a session that can still be retried or cancelled.
    let mut step = session.checkout;
    if step != CheckoutStep::AwaitingPaymentMethod {
        step.open()?;
    }
    step.begin_finalizing()?;
    session.checkout = CheckoutStep::AwaitingPaymentMethod;

    let draft = SaleDraft {
        channel: session.channel,
        payment_method: payload.payment_method,
        contact: payload.contact,
        discount: payload.discount,
    };

    match finalize(state, &session, &draft).await {
        Ok(sale) => {
            session.cart.clear();
            session.checkout.complete();
            session.last_sale = Some(sale.clone());
            drop(session);

            tracing::info!(
                session_id = %id,
                invoice = %sale.invoice_number,
                total = sale.total,
                payment_method = sale.payment_method.as_str(),
                "sale recorded"
            );
            state
                .audit(
                    "checkout",
                    "sales",
                    serde_json::json!({
                        "sale_id": sale.id,
                        "invoice_number": sale.invoice_number,
                        "total": sale.total,
                    }),
                )
                .await;

            Ok(ApiResponse::success("Sale recorded", sale, Some(Meta::empty())))
        }
        Err(err) => {
            session.checkout.fail();
            tracing::warn!(session_id = %id, error = %err, "checkout rejected");
            Err(err)
        }
    }
}

async fn finalize(state: &AppState, session: &PosSession, draft: &SaleDraft) -> AppResult<Sale> {
    validate(&session.cart, draft)?;

    let articles = state.catalog.list_articles().await?;
    recheck_stock(&session.cart.lines, &articles)?;

    let now = Utc::now();
    let prefix = invoice_prefix(draft.channel, now);
    let sequence = state.sales.next_invoice_sequence(&prefix).await?;
    let sale = prepare_sale(
        &session.cart,
        draft,
        invoice_number(draft.channel, &prefix, sequence),
        now,
    )?;

    state.sales.save_sale(sale).await
}
