use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        catalog::effective_price,
        pricing::{DiscountPolicy, Totals, compute_totals},
        stock::ensure_stock,
    },
    error::{AppError, AppResult, ValidationError},
    models::{Article, CartLine, Variant},
};

/// Working set of prospective purchases for one session.
///
/// Every mutating method validates before touching `lines`, so a rejected
/// call leaves the cart exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub customer_id: Option<Uuid>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, line_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Quantity already held for an article/variant pair.
    pub fn quantity_of(&self, article_id: Uuid, variant_id: Option<Uuid>) -> u32 {
        self.lines
            .iter()
            .find(|l| l.matches(article_id, variant_id))
            .map_or(0, |l| l.quantity)
    }

    /// Add `quantity` units, merging into an existing line for the same
    /// article/variant. New lines freeze the current effective price.
    pub fn add(
        &mut self,
        article: &Article,
        variant: Option<&Variant>,
        quantity: u32,
    ) -> AppResult<&CartLine> {
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity.into());
        }
        ensure_sellable(article, variant)?;

        let variant_id = variant.map(|v| v.id);
        let combined = self
            .quantity_of(article.id, variant_id)
            .checked_add(quantity)
            .ok_or(ValidationError::InvalidQuantity)?;
        ensure_stock(article, variant, combined)?;

        let idx = match self
            .lines
            .iter()
            .position(|l| l.matches(article.id, variant_id))
        {
            Some(idx) => {
                self.lines[idx].set_quantity(combined)?;
                idx
            }
            None => {
                let unit_price = effective_price(article, variant);
                let line_total = CartLine::total_for(quantity, unit_price)?;
                self.lines.push(CartLine {
                    id: Uuid::new_v4(),
                    article_id: article.id,
                    article_name: article.name.clone(),
                    variant_id,
                    sku: variant.map(|v| v.sku.clone()),
                    quantity,
                    unit_price,
                    line_total,
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[idx])
    }

    /// Set a line's quantity. Zero or less drops the line and returns `None`.
    pub fn update_quantity(&mut self, line_id: Uuid, quantity: i64) -> AppResult<Option<&CartLine>> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| AppError::not_found(format!("cart line {line_id}")))?;

        if quantity <= 0 {
            self.lines.remove(idx);
            return Ok(None);
        }

        let quantity = u32::try_from(quantity).map_err(|_| ValidationError::InvalidQuantity)?;
        self.lines[idx].set_quantity(quantity)?;
        Ok(Some(&self.lines[idx]))
    }

    /// Raise a line to `quantity` after re-checking it against the live
    /// article: both must still be sellable and the stock must cover the
    /// new quantity.
    pub fn grow(&mut self, line_id: Uuid, article: &Article, quantity: u32) -> AppResult<&CartLine> {
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity.into());
        }
        let idx = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| AppError::not_found(format!("cart line {line_id}")))?;
        let line = &self.lines[idx];
        if line.article_id != article.id {
            return Err(AppError::not_found(format!("article {}", line.article_id)));
        }
        let variant = match line.variant_id {
            Some(variant_id) => Some(article.variant(variant_id).ok_or_else(|| {
                AppError::not_found(format!(
                    "variant {} of {}",
                    line.sku.as_deref().unwrap_or("-"),
                    article.name
                ))
            })?),
            None => None,
        };
        ensure_sellable(article, variant)?;
        ensure_stock(article, variant, quantity)?;

        self.lines[idx].set_quantity(quantity)?;
        Ok(&self.lines[idx])
    }

    /// Returns whether a line was removed.
    pub fn remove_line(&mut self, line_id: Uuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != line_id);
        self.lines.len() != before
    }

    pub fn select_customer(&mut self, customer_id: Option<Uuid>) {
        self.customer_id = customer_id;
    }

    pub fn totals(&self, policy: &impl DiscountPolicy) -> Totals {
        compute_totals(&self.lines, policy)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer_id = None;
    }
}

/// The article must be active and, when it has declinations, `variant`
/// must be one of its own active variants.
fn ensure_sellable(article: &Article, variant: Option<&Variant>) -> AppResult<()> {
    if !article.active {
        return Err(ValidationError::Inactive(article.name.clone()).into());
    }
    match variant {
        None if article.has_variants() => {
            Err(ValidationError::VariantRequired(article.name.clone()).into())
        }
        Some(v) if v.article_id != article.id || article.variant(v.id).is_none() => Err(
            AppError::not_found(format!("variant {} of {}", v.sku, article.name)),
        ),
        Some(v) if !v.active => Err(ValidationError::Inactive(v.sku.clone()).into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        pricing::NoDiscount,
        testing::{article, kaftan, variant},
    };

    #[test]
    fn adding_the_same_variant_merges_lines() {
        let kaftan = kaftan();
        let m_red = &kaftan.variants[0];
        let mut cart = Cart::new();

        let line = cart.add(&kaftan, Some(m_red), 2).unwrap();
        assert_eq!((line.quantity, line.line_total), (2, 70_000));

        let line = cart.add(&kaftan, Some(m_red), 1).unwrap();
        assert_eq!((line.quantity, line.line_total), (3, 105_000));
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn unit_price_is_frozen_at_first_insertion() {
        let mut kaftan = kaftan();
        let mut cart = Cart::new();
        let m_red = kaftan.variants[0].clone();
        cart.add(&kaftan, Some(&m_red), 1).unwrap();

        kaftan.variants[0].price = Some(50_000);
        let repriced = kaftan.variants[0].clone();
        let line = cart.add(&kaftan, Some(&repriced), 1).unwrap();
        assert_eq!(line.unit_price, 35_000);
        assert_eq!(line.line_total, 70_000);
    }

    #[test]
    fn variant_is_required_for_articles_with_declinations() {
        let kaftan = kaftan();
        let mut cart = Cart::new();
        let err = cart.add(&kaftan, None, 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::VariantRequired(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn foreign_variant_is_rejected() {
        let kaftan = kaftan();
        let boubou = article("Boubou", 45_000);
        let stray = variant(&boubou, "BOU-L-BLE", 3);
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&kaftan, Some(&stray), 1),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn stock_is_checked_against_the_combined_quantity() {
        let kaftan = kaftan();
        let m_red = &kaftan.variants[0];
        let mut cart = Cart::new();
        cart.add(&kaftan, Some(m_red), 6).unwrap();

        let err = cart.add(&kaftan, Some(m_red), 3).unwrap_err();
        assert!(matches!(err, AppError::StockUnavailable { requested: 9, .. }));
        assert_eq!(cart.lines[0].quantity, 6);

        cart.add(&kaftan, Some(m_red), 2).unwrap();
        assert_eq!(cart.lines[0].quantity, 8);
    }

    #[test]
    fn zero_quantity_and_inactive_items_are_rejected() {
        let mut belt = article("Ceinture", 5_000);
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&belt, None, 0),
            Err(AppError::Validation(ValidationError::InvalidQuantity))
        ));

        belt.active = false;
        assert!(matches!(
            cart.add(&belt, None, 1),
            Err(AppError::Validation(ValidationError::Inactive(_)))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_recomputes_or_removes() {
        let kaftan = kaftan();
        let mut cart = Cart::new();
        let line_id = cart.add(&kaftan, kaftan.variants.first(), 2).unwrap().id;

        let line = cart.update_quantity(line_id, 5).unwrap().unwrap();
        assert_eq!(line.line_total, 5 * line.unit_price);

        assert!(cart.update_quantity(line_id, -1).unwrap().is_none());
        assert!(cart.is_empty());
        assert!(matches!(
            cart.update_quantity(line_id, 1),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn totals_add_up_line_totals() {
        let kaftan = kaftan();
        let belt = article("Ceinture", 5_000);
        let mut cart = Cart::new();
        cart.add(&kaftan, kaftan.variants.first(), 2).unwrap();
        cart.add(&belt, None, 3).unwrap();

        let totals = cart.totals(&NoDiscount);
        assert_eq!(totals.subtotal, 85_000);
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn clear_drops_lines_and_customer() {
        let belt = article("Ceinture", 5_000);
        let mut cart = Cart::new();
        cart.add(&belt, None, 1).unwrap();
        cart.select_customer(Some(Uuid::new_v4()));

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.customer_id.is_none());
    }

    #[test]
    fn remove_line_reports_whether_anything_changed() {
        let belt = article("Ceinture", 5_000);
        let mut cart = Cart::new();
        let id = cart.add(&belt, None, 1).unwrap().id;
        assert!(cart.remove_line(id));
        assert!(!cart.remove_line(id));
    }

    #[test]
    fn line_total_overflow_is_rejected_without_touching_the_cart() {
        let mut gown = article("Robe de gala", i64::MAX / 2);
        gown.stock = 10;
        let mut cart = Cart::new();
        assert!(matches!(cart.add(&gown, None, 3), Err(AppError::BadRequest(_))));
        assert!(cart.is_empty());

        let line_id = cart.add(&gown, None, 1).unwrap().id;
        assert!(matches!(
            cart.update_quantity(line_id, 4),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(cart.grow(line_id, &gown, 4), Err(AppError::BadRequest(_))));
        let line = cart.line(line_id).unwrap();
        assert_eq!((line.quantity, line.line_total), (1, i64::MAX / 2));
    }

    #[test]
    fn grow_rechecks_the_live_article() {
        let mut kaftan = kaftan();
        let mut cart = Cart::new();
        let line_id = cart.add(&kaftan, kaftan.variants.first(), 2).unwrap().id;

        kaftan.variants[0].active = false;
        assert!(matches!(
            cart.grow(line_id, &kaftan, 3),
            Err(AppError::Validation(ValidationError::Inactive(_)))
        ));

        kaftan.variants.remove(0);
        assert!(matches!(cart.grow(line_id, &kaftan, 3), Err(AppError::NotFound(_))));
        assert_eq!(cart.line(line_id).unwrap().quantity, 2);
    }

    #[test]
    fn grow_is_bounded_by_stock() {
        let kaftan = kaftan();
        let mut cart = Cart::new();
        let line_id = cart.add(&kaftan, kaftan.variants.first(), 2).unwrap().id;

        assert!(matches!(
            cart.grow(line_id, &kaftan, 9),
            Err(AppError::StockUnavailable { requested: 9, .. })
        ));
        let line = cart.grow(line_id, &kaftan, 8).unwrap();
        assert_eq!(line.line_total, 8 * 35_000);
    }
}
