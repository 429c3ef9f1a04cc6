use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        checkout::CheckoutStep,
        pricing::{NoDiscount, Totals},
    },
    models::{CartLine, Sale, SalesChannel},
    session::PosSession,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub channel: Option<SalesChannel>,
}

/// Either an explicit `variant_id` or a size/color pair to resolve.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub article_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub size_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    pub barcode: String,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// Zero or negative removes the line.
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectCustomerRequest {
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub channel: SalesChannel,
    pub checkout: CheckoutStep,
    pub lines: Vec<CartLine>,
    pub customer_id: Option<Uuid>,
    pub totals: Totals,
    pub last_sale: Option<Sale>,
}

impl From<&PosSession> for SessionView {
    fn from(session: &PosSession) -> Self {
        Self {
            id: session.id,
            channel: session.channel,
            checkout: session.checkout,
            lines: session.cart.lines.clone(),
            customer_id: session.cart.customer_id,
            totals: session.cart.totals(&NoDiscount),
            last_sale: session.last_sale.clone(),
        }
    }
}
