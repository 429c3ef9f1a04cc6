use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Article, Variant},
};

/// Sale price of an article, honouring a variant-level override.
pub fn effective_price(article: &Article, variant: Option<&Variant>) -> i64 {
    variant
        .and_then(|v| v.price)
        .unwrap_or(article.base_price)
}

/// Resolve a scanned code to the article and, when the code is carried by a
/// variant, that variant. Variant barcodes are checked before the article's
/// own barcode; the first match in catalogue order wins.
pub fn find_variant_by_barcode<'a>(
    articles: &'a [Article],
    code: &str,
) -> AppResult<(&'a Article, Option<&'a Variant>)> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::not_found("barcode"));
    }

    for article in articles {
        if let Some(variant) = article
            .variants
            .iter()
            .find(|v| v.barcode.as_deref() == Some(code))
        {
            return Ok((article, Some(variant)));
        }
        if article.barcode.as_deref() == Some(code) {
            return Ok((article, None));
        }
    }

    Err(AppError::not_found(format!("barcode {code}")))
}

/// Variants a customer can actually walk away with.
pub fn list_available_variants(article: &Article) -> Vec<Variant> {
    article
        .variants
        .iter()
        .filter(|v| v.active && v.stock > 0)
        .cloned()
        .collect()
}

/// Pick the active variant matching an explicit size/colour selection.
pub fn resolve_variant(
    article: &Article,
    size_id: Option<Uuid>,
    color_id: Option<Uuid>,
) -> AppResult<&Variant> {
    article
        .variants
        .iter()
        .find(|v| v.active && v.size_id == size_id && v.color_id == color_id)
        .ok_or_else(|| AppError::not_found(format!("variant of {}", article.name)))
}

/// Build a stock keeping unit such as `KAF-M-ROU-001`.
pub fn generate_sku(
    article_name: &str,
    size_code: Option<&str>,
    color_name: Option<&str>,
    sequence: u32,
) -> String {
    let mut parts = vec![stem(article_name)];
    if let Some(code) = size_code.map(str::trim).filter(|c| !c.is_empty()) {
        parts.push(code.to_uppercase());
    }
    if let Some(color) = color_name.map(stem).filter(|c| !c.is_empty()) {
        parts.push(color);
    }
    parts.push(format!("{sequence:03}"));
    parts.retain(|p| !p.is_empty());
    parts.join("-")
}

fn stem(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .flat_map(char::to_uppercase)
        .collect()
}
