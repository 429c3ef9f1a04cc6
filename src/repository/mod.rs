//! Storage seams. Services only ever see these traits; `MemoryStore` backs
//! tests and database-less runs, `PgStore` backs production.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Article, Color, Customer, Sale, Size, Variant},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Every article with its current variants and live stock counts.
    async fn list_articles(&self) -> AppResult<Vec<Article>>;

    async fn get_article(&self, id: Uuid) -> AppResult<Option<Article>>;

    /// Apply a manual stock correction, returning the updated variant.
    async fn adjust_stock(&self, variant_id: Uuid, delta: i32) -> AppResult<Variant>;
}

#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;

    async fn get_customer(&self, id: Uuid) -> AppResult<Option<Customer>>;

    async fn list_sizes(&self) -> AppResult<Vec<Size>>;

    async fn list_colors(&self) -> AppResult<Vec<Color>>;
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Persist a sale and take its lines out of stock in one atomic step.
    /// Fails with `StockUnavailable` if any line no longer fits, in which
    /// case nothing is written.
    async fn save_sale(&self, sale: Sale) -> AppResult<Sale>;

    /// Existing sales sharing `prefix`, plus one.
    async fn next_invoice_sequence(&self, prefix: &str) -> AppResult<u32>;

    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>>;

    /// Newest first, with the overall count.
    async fn list_sales(&self, offset: u64, limit: u64) -> AppResult<(Vec<Sale>, u64)>;
}
