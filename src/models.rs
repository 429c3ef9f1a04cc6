use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A sellable product definition. Prices are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Article {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_price: i64,
    pub category: String,
    pub active: bool,
    pub image: Option<String>,
    pub barcode: Option<String>,
    /// Only meaningful when the article has no variants.
    pub stock: u32,
    pub variants: Vec<Variant>,
}

impl Article {
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn variant(&self, variant_id: Uuid) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}

/// A size/colour instance of an article ("déclinaison").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: Uuid,
    pub article_id: Uuid,
    pub size_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub sku: String,
    /// Overrides the article base price when set.
    pub price: Option<i64>,
    pub stock: u32,
    pub min_stock: u32,
    pub barcode: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Size {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Color {
    pub id: Uuid,
    pub name: String,
    pub hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Contact details typed in at the storefront checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}

/// One entry of a cart. The unit price is frozen when the line is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub article_id: Uuid,
    pub article_name: String,
    pub variant_id: Option<Uuid>,
    pub sku: Option<String>,
    pub quantity: u32,
    pub unit_price: i64,
    pub line_total: i64,
}

impl CartLine {
    pub fn total_for(quantity: u32, unit_price: i64) -> AppResult<i64> {
        i64::from(quantity)
            .checked_mul(unit_price)
            .ok_or_else(|| AppError::BadRequest("line total is too large".into()))
    }

    /// Leaves the line untouched when the new total overflows.
    pub(crate) fn set_quantity(&mut self, quantity: u32) -> AppResult<()> {
        self.line_total = Self::total_for(quantity, self.unit_price)?;
        self.quantity = quantity;
        Ok(())
    }

    pub fn matches(&self, article_id: Uuid, variant_id: Option<Uuid>) -> bool {
        self.article_id == article_id && self.variant_id == variant_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Especes,
    Carte,
    MobileMoney,
    Virement,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Especes => "especes",
            PaymentMethod::Carte => "carte",
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::Virement => "virement",
            PaymentMethod::Cheque => "cheque",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "especes" => Ok(PaymentMethod::Especes),
            "carte" => Ok(PaymentMethod::Carte),
            "mobile_money" => Ok(PaymentMethod::MobileMoney),
            "virement" => Ok(PaymentMethod::Virement),
            "cheque" => Ok(PaymentMethod::Cheque),
            other => Err(format!("unknown payment method {other}")),
        }
    }
}

/// Where a sale is rung up. Decides the invoice format and which customer
/// fields are mandatory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannel {
    #[default]
    Counter,
    Storefront,
}

impl SalesChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesChannel::Counter => "counter",
            SalesChannel::Storefront => "storefront",
        }
    }
}

impl FromStr for SalesChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counter" => Ok(SalesChannel::Counter),
            "storefront" => Ok(SalesChannel::Storefront),
            other => Err(format!("unknown sales channel {other}")),
        }
    }
}

/// Immutable record of a completed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    pub id: Uuid,
    pub invoice_number: String,
    pub channel: SalesChannel,
    pub lines: Vec<CartLine>,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub customer_id: Option<Uuid>,
    pub contact: Option<ContactInfo>,
    pub created_at: DateTime<Utc>,
}
