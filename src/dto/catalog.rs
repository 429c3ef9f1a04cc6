use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::stock::LowStockItem,
    models::{Article, Color, Customer, Size, Variant},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleList {
    pub items: Vec<Article>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariantList {
    pub items: Vec<Variant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BarcodeMatch {
    pub article: Article,
    pub variant: Option<Variant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SizeList {
    pub items: Vec<Size>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ColorList {
    pub items: Vec<Color>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<Customer>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LowStockList {
    pub items: Vec<LowStockItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InventoryAdjustRequest {
    pub delta: i32,
}
