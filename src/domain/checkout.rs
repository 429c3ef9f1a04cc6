use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{cart::Cart, pricing::GlobalDiscount, stock::ensure_stock},
    error::{AppError, AppResult, ValidationError},
    models::{Article, CartLine, ContactInfo, PaymentMethod, Sale, SalesChannel},
};

/// Progress of one checkout attempt within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Idle,
    AwaitingPaymentMethod,
    Finalizing,
    Completed,
}

impl CheckoutStep {
    /// Payment dialog opened.
    pub fn open(&mut self) -> AppResult<()> {
        match *self {
            CheckoutStep::Finalizing => Err(ValidationError::CheckoutInProgress.into()),
            _ => {
                *self = CheckoutStep::AwaitingPaymentMethod;
                Ok(())
            }
        }
    }

    /// Dialog closed without confirming. Nothing has been committed.
    pub fn cancel(&mut self) -> AppResult<()> {
        match *self {
            CheckoutStep::Finalizing => Err(ValidationError::CheckoutInProgress.into()),
            _ => {
                *self = CheckoutStep::Idle;
                Ok(())
            }
        }
    }

    /// Payment method picked; preconditions are about to be checked.
    pub fn begin_finalizing(&mut self) -> AppResult<()> {
        match *self {
            CheckoutStep::AwaitingPaymentMethod => {
                *self = CheckoutStep::Finalizing;
                Ok(())
            }
            CheckoutStep::Finalizing => Err(ValidationError::CheckoutInProgress.into()),
            _ => Err(ValidationError::CheckoutNotOpen.into()),
        }
    }

    /// Back to the payment dialog after a rejected attempt.
    pub fn fail(&mut self) {
        *self = CheckoutStep::AwaitingPaymentMethod;
    }

    pub fn complete(&mut self) {
        *self = CheckoutStep::Completed;
    }
}

/// Everything the cashier or shopper supplies when confirming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub channel: SalesChannel,
    pub payment_method: PaymentMethod,
    pub contact: Option<ContactInfo>,
    pub discount: Option<GlobalDiscount>,
}

/// Preconditions checked in order: non-empty cart, then storefront contact.
pub fn validate(cart: &Cart, draft: &SaleDraft) -> Result<(), ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    if draft.channel == SalesChannel::Storefront {
        let contact = draft
            .contact
            .as_ref()
            .ok_or(ValidationError::MissingCustomerInfo("name"))?;
        for (field, value) in [
            ("name", &contact.name),
            ("email", &contact.email),
            ("phone", &contact.phone),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingCustomerInfo(field));
            }
        }
    }
    Ok(())
}

/// Re-run the stock gate for every line against a fresh catalogue snapshot.
pub fn recheck_stock(lines: &[CartLine], articles: &[Article]) -> AppResult<()> {
    for line in lines {
        let article = articles
            .iter()
            .find(|a| a.id == line.article_id)
            .ok_or_else(|| AppError::not_found(format!("article {}", line.article_name)))?;
        let variant = match line.variant_id {
            Some(id) => Some(article.variant(id).ok_or_else(|| {
                AppError::not_found(format!("variant {}", line.sku.as_deref().unwrap_or("-")))
            })?),
            None => None,
        };
        ensure_stock(article, variant, line.quantity)?;
    }
    Ok(())
}

/// Sequence scope for invoice numbers: `FAC-2026` or `CMD261016`.
pub fn invoice_prefix(channel: SalesChannel, now: DateTime<Utc>) -> String {
    match channel {
        SalesChannel::Counter => format!("FAC-{}", now.format("%Y")),
        SalesChannel::Storefront => format!("CMD{}", now.format("%y%m%d")),
    }
}

pub fn invoice_number(channel: SalesChannel, prefix: &str, sequence: u32) -> String {
    match channel {
        SalesChannel::Counter => format!("{prefix}-{sequence:04}"),
        SalesChannel::Storefront => format!("{prefix}{sequence:04}"),
    }
}

/// Snapshot the cart into a sale. The cart itself is left untouched; the
/// caller clears it once the sale has been persisted.
pub fn prepare_sale(
    cart: &Cart,
    draft: &SaleDraft,
    invoice_number: String,
    now: DateTime<Utc>,
) -> AppResult<Sale> {
    validate(cart, draft)?;
    if let Some(discount) = &draft.discount {
        discount.validate()?;
    }
    let totals = cart.totals(&draft.discount);

    Ok(Sale {
        id: Uuid::new_v4(),
        invoice_number,
        channel: draft.channel,
        lines: cart.lines.clone(),
        subtotal: totals.subtotal,
        discount: totals.discount,
        total: totals.total,
        payment_method: draft.payment_method,
        customer_id: cart.customer_id,
        contact: draft.contact.clone(),
        created_at: now,
    })
}
