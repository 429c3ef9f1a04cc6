use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::pricing::GlobalDiscount,
    models::{ContactInfo, PaymentMethod, Sale},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    /// Required for storefront sessions.
    pub contact: Option<ContactInfo>,
    pub discount: Option<GlobalDiscount>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleList {
    pub items: Vec<Sale>,
}
