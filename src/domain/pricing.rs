use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::CartLine,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Totals {
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

/// Hook deciding how much to take off a cart.
pub trait DiscountPolicy {
    fn discount(&self, lines: &[CartLine], subtotal: i64) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscount;

impl DiscountPolicy for NoDiscount {
    fn discount(&self, _lines: &[CartLine], _subtotal: i64) -> i64 {
        0
    }
}

/// Whole-ticket discount: a fixed amount (`remise_globale`) or a percentage
/// (`remise_pourcentage`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GlobalDiscount {
    Amount(i64),
    Percentage(u8),
}

impl GlobalDiscount {
    pub fn validate(&self) -> AppResult<()> {
        match *self {
            GlobalDiscount::Amount(amount) if amount < 0 => Err(AppError::BadRequest(
                "discount amount must not be negative".into(),
            )),
            GlobalDiscount::Percentage(pct) if pct > 100 => Err(AppError::BadRequest(
                "discount percentage must be between 0 and 100".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl DiscountPolicy for GlobalDiscount {
    fn discount(&self, _lines: &[CartLine], subtotal: i64) -> i64 {
        let raw = match *self {
            GlobalDiscount::Amount(amount) => amount,
            // Widened so large subtotals cannot overflow; the quotient never
            // exceeds `subtotal` for pct <= 100.
            GlobalDiscount::Percentage(pct) => {
                let share = i128::from(subtotal) * i128::from(pct) / 100;
                i64::try_from(share).unwrap_or(i64::MAX)
            }
        };
        raw.clamp(0, subtotal.max(0))
    }
}

impl DiscountPolicy for Option<GlobalDiscount> {
    fn discount(&self, lines: &[CartLine], subtotal: i64) -> i64 {
        match self {
            Some(d) => d.discount(lines, subtotal),
            None => NoDiscount.discount(lines, subtotal),
        }
    }
}

pub fn subtotal(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .fold(0i64, |acc, l| acc.saturating_add(l.line_total))
}

pub fn compute_totals(lines: &[CartLine], policy: &impl DiscountPolicy) -> Totals {
    let subtotal = subtotal(lines);
    let discount = policy.discount(lines, subtotal);
    Totals {
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn line(quantity: u32, unit_price: i64) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            article_id: Uuid::new_v4(),
            article_name: "Pagne".into(),
            variant_id: None,
            sku: None,
            quantity,
            unit_price,
            line_total: i64::from(quantity) * unit_price,
        }
    }

    #[test]
    fn no_discount_keeps_total_equal_to_subtotal() {
        let lines = vec![line(2, 35_000), line(1, 5_000)];
        let totals = compute_totals(&lines, &NoDiscount);
        assert_eq!(totals.subtotal, 75_000);
        assert_eq!(totals.discount, 0);
        assert_eq!(totals.total, 75_000);
    }

    #[test]
    fn global_discounts_are_clamped() {
        let lines = vec![line(1, 10_000)];
        assert_eq!(compute_totals(&lines, &GlobalDiscount::Percentage(15)).total, 8_500);
        assert_eq!(compute_totals(&lines, &GlobalDiscount::Amount(2_500)).total, 7_500);
        assert_eq!(compute_totals(&lines, &GlobalDiscount::Amount(50_000)).total, 0);
        assert_eq!(compute_totals(&lines, &None::<GlobalDiscount>).total, 10_000);
    }

    #[test]
    fn percentage_of_a_huge_subtotal_does_not_overflow() {
        let lines = vec![line(1, i64::MAX / 2)];
        let totals = compute_totals(&lines, &GlobalDiscount::Percentage(50));
        assert_eq!(totals.discount, i64::MAX / 4);
        assert_eq!(totals.total, totals.subtotal - totals.discount);
    }

    #[test]
    fn out_of_range_discounts_are_rejected() {
        assert!(GlobalDiscount::Amount(-1).validate().is_err());
        assert!(GlobalDiscount::Percentage(101).validate().is_err());
        assert!(GlobalDiscount::Percentage(100).validate().is_ok());
    }
}
