use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Article, Variant},
};

/// Units on hand for an article: the sum over its variants, or the flat
/// counter when it has none.
pub fn aggregate_stock(article: &Article) -> u32 {
    if article.has_variants() {
        article.variants.iter().map(|v| v.stock).sum()
    } else {
        article.stock
    }
}

/// Advisory gate consulted before adding to a cart and before checkout.
pub fn has_stock(article: &Article, variant: Option<&Variant>, requested: u32) -> bool {
    available(article, variant) >= requested
}

pub fn available(article: &Article, variant: Option<&Variant>) -> u32 {
    match variant {
        Some(v) => v.stock,
        None => aggregate_stock(article),
    }
}

/// Reject with `StockUnavailable` when `requested` cannot be served.
pub fn ensure_stock(article: &Article, variant: Option<&Variant>, requested: u32) -> AppResult<()> {
    if has_stock(article, variant, requested) {
        return Ok(());
    }
    Err(AppError::StockUnavailable {
        item: variant.map_or_else(|| article.name.clone(), |v| v.sku.clone()),
        requested,
        available: available(article, variant),
    })
}

pub fn is_low_stock(variant: &Variant) -> bool {
    variant.stock <= variant.min_stock
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LowStockItem {
    pub article_id: Uuid,
    pub article_name: String,
    pub variant_id: Uuid,
    pub sku: String,
    pub stock: u32,
    pub min_stock: u32,
}

/// Active variants at or below their reorder threshold, emptiest first.
pub fn low_stock_variants(articles: &[Article]) -> Vec<LowStockItem> {
    let mut items: Vec<LowStockItem> = articles
        .iter()
        .flat_map(|a| a.variants.iter().map(move |v| (a, v)))
        .filter(|(_, v)| v.active && is_low_stock(v))
        .map(|(a, v)| LowStockItem {
            article_id: a.id,
            article_name: a.name.clone(),
            variant_id: v.id,
            sku: v.sku.clone(),
            stock: v.stock,
            min_stock: v.min_stock,
        })
        .collect();
    items.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.sku.cmp(&b.sku)));
    items
}

/// New stock level after a manual adjustment.
pub fn apply_delta(current: u32, delta: i32) -> AppResult<u32> {
    if delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }
    let next = i64::from(current) + i64::from(delta);
    u32::try_from(next).map_err(|_| AppError::BadRequest("stock cannot be negative".into()))
}
