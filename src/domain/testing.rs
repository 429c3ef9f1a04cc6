use uuid::Uuid;

use crate::models::{Article, Variant};

pub(crate) fn article(name: &str, base_price: i64) -> Article {
    Article {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        base_price,
        category: "accessoire".to_string(),
        active: true,
        image: None,
        barcode: None,
        stock: 10,
        variants: Vec::new(),
    }
}

pub(crate) fn variant(article: &Article, sku: &str, stock: u32) -> Variant {
    Variant {
        id: Uuid::new_v4(),
        article_id: article.id,
        size_id: Some(Uuid::new_v4()),
        color_id: Some(Uuid::new_v4()),
        sku: sku.to_string(),
        price: None,
        stock,
        min_stock: 2,
        barcode: Some(sku.to_string()),
        active: true,
    }
}

/// Kaftan with a single M/Red variant: stock 8, priced 35000.
pub(crate) fn kaftan() -> Article {
    let mut kaftan = article("Kaftan", 30_000);
    kaftan.category = "vetement".to_string();
    kaftan.stock = 0;
    let mut m_red = variant(&kaftan, "KAF-M-RED", 8);
    m_red.price = Some(35_000);
    kaftan.variants.push(m_red);
    kaftan
}
