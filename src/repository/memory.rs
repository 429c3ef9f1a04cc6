use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::stock::{apply_delta, ensure_stock},
    error::{AppError, AppResult},
    fixtures::DemoCatalog,
    models::{Article, Color, Customer, Sale, Size, Variant},
    repository::{CatalogRepository, ReferenceRepository, SaleRepository},
};

#[derive(Debug, Default)]
struct Inner {
    articles: Vec<Article>,
    sizes: Vec<Size>,
    colors: Vec<Color>,
    customers: Vec<Customer>,
    sales: Vec<Sale>,
}

/// Process-local store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: DemoCatalog) -> Self {
        let inner = Inner {
            articles: catalog.articles,
            sizes: catalog.sizes,
            colors: catalog.colors,
            customers: catalog.customers,
            sales: Vec::new(),
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub async fn insert_article(&self, article: Article) {
        self.inner.write().await.articles.push(article);
    }

    /// Swap in an edited article, as a back-office catalogue change would.
    pub async fn replace_article(&self, article: Article) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .articles
            .iter_mut()
            .find(|a| a.id == article.id)
            .ok_or_else(|| AppError::not_found(format!("article {}", article.id)))?;
        *slot = article;
        Ok(())
    }

    /// Overwrite a variant's stock, as another terminal selling would.
    pub async fn set_stock(&self, variant_id: Uuid, stock: u32) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let variant = find_variant_mut(&mut inner.articles, variant_id)?;
        variant.stock = stock;
        Ok(())
    }
}

fn find_variant_mut(articles: &mut [Article], variant_id: Uuid) -> AppResult<&mut Variant> {
    articles
        .iter_mut()
        .flat_map(|a| a.variants.iter_mut())
        .find(|v| v.id == variant_id)
        .ok_or_else(|| AppError::not_found(format!("variant {variant_id}")))
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list_articles(&self) -> AppResult<Vec<Article>> {
        Ok(self.inner.read().await.articles.clone())
    }

    async fn get_article(&self, id: Uuid) -> AppResult<Option<Article>> {
        let inner = self.inner.read().await;
        Ok(inner.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn adjust_stock(&self, variant_id: Uuid, delta: i32) -> AppResult<Variant> {
        let mut inner = self.inner.write().await;
        let variant = find_variant_mut(&mut inner.articles, variant_id)?;
        variant.stock = apply_delta(variant.stock, delta)?;
        Ok(variant.clone())
    }
}

#[async_trait]
impl ReferenceRepository for MemoryStore {
    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(self.inner.read().await.customers.clone())
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let inner = self.inner.read().await;
        Ok(inner.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn list_sizes(&self) -> AppResult<Vec<Size>> {
        let mut sizes = self.inner.read().await.sizes.clone();
        sizes.sort_by_key(|s| s.display_order);
        Ok(sizes)
    }

    async fn list_colors(&self) -> AppResult<Vec<Color>> {
        Ok(self.inner.read().await.colors.clone())
    }
}

#[async_trait]
impl SaleRepository for MemoryStore {
    async fn save_sale(&self, sale: Sale) -> AppResult<Sale> {
        let mut inner = self.inner.write().await;

        if inner
            .sales
            .iter()
            .any(|s| s.invoice_number == sale.invoice_number)
        {
            return Err(AppError::BadRequest(format!(
                "invoice number {} already used",
                sale.invoice_number
            )));
        }

        // Check every line before touching any stock.
        for line in &sale.lines {
            let article = inner
                .articles
                .iter()
                .find(|a| a.id == line.article_id)
                .ok_or_else(|| AppError::not_found(format!("article {}", line.article_id)))?;
            let variant = match line.variant_id {
                Some(id) => Some(
                    article
                        .variant(id)
                        .ok_or_else(|| AppError::not_found(format!("variant {id}")))?,
                ),
                None => None,
            };
            ensure_stock(article, variant, line.quantity)?;
        }

        for line in &sale.lines {
            if let Some(article) = inner.articles.iter_mut().find(|a| a.id == line.article_id) {
                match line.variant_id {
                    Some(id) => {
                        if let Some(v) = article.variants.iter_mut().find(|v| v.id == id) {
                            v.stock = v.stock.saturating_sub(line.quantity);
                        }
                    }
                    None => article.stock = article.stock.saturating_sub(line.quantity),
                }
            }
        }

        inner.sales.push(sale.clone());
        Ok(sale)
    }

    async fn next_invoice_sequence(&self, prefix: &str) -> AppResult<u32> {
        let inner = self.inner.read().await;
        let existing = inner
            .sales
            .iter()
            .filter(|s| s.invoice_number.starts_with(prefix))
            .count();
        u32::try_from(existing + 1).map_err(|e| AppError::Internal(e.into()))
    }

    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>> {
        let inner = self.inner.read().await;
        Ok(inner.sales.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sales(&self, offset: u64, limit: u64) -> AppResult<(Vec<Sale>, u64)> {
        let inner = self.inner.read().await;
        let total = inner.sales.len() as u64;
        let page = inner
            .sales
            .iter()
            .rev()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((page, total))
    }
}
