use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::stock::apply_delta,
    entity::{
        articles::{ActiveModel as ArticleActive, Column as ArticleCol, Entity as Articles, Model as ArticleModel},
        colors::{ActiveModel as ColorActive, Column as ColorCol, Entity as Colors, Model as ColorModel},
        customers::{ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers, Model as CustomerModel},
        sale_lines::{ActiveModel as SaleLineActive, Column as SaleLineCol, Entity as SaleLines, Model as SaleLineModel},
        sales::{ActiveModel as SaleActive, Column as SaleCol, Entity as Sales, Model as SaleModel},
        sizes::{ActiveModel as SizeActive, Column as SizeCol, Entity as Sizes, Model as SizeModel},
        variants::{ActiveModel as VariantActive, Column as VariantCol, Entity as Variants, Model as VariantModel},
    },
    error::{AppError, AppResult},
    fixtures::DemoCatalog,
    models::{Article, CartLine, Color, ContactInfo, Customer, Sale, Size, Variant},
    repository::{CatalogRepository, ReferenceRepository, SaleRepository},
};

/// PostgreSQL-backed store on top of SeaORM.
#[derive(Clone)]
pub struct PgStore {
    orm: DatabaseConnection,
}

impl PgStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    /// Load a catalogue into empty tables. Returns false when articles
    /// already exist and nothing was written.
    pub async fn import_catalog(&self, catalog: &DemoCatalog) -> AppResult<bool> {
        if Articles::find().count(&self.orm).await? > 0 {
            return Ok(false);
        }

        let txn = self.orm.begin().await?;
        for size in &catalog.sizes {
            SizeActive {
                id: Set(size.id),
                name: Set(size.name.clone()),
                code: Set(size.code.clone()),
                display_order: Set(size.display_order),
            }
            .insert(&txn)
            .await?;
        }
        for color in &catalog.colors {
            ColorActive {
                id: Set(color.id),
                name: Set(color.name.clone()),
                hex: Set(color.hex.clone()),
            }
            .insert(&txn)
            .await?;
        }
        for article in &catalog.articles {
            ArticleActive {
                id: Set(article.id),
                name: Set(article.name.clone()),
                description: Set(article.description.clone()),
                base_price: Set(article.base_price),
                category: Set(article.category.clone()),
                active: Set(article.active),
                image: Set(article.image.clone()),
                barcode: Set(article.barcode.clone()),
                stock: Set(to_db_count(article.stock)?),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
            for variant in &article.variants {
                VariantActive {
                    id: Set(variant.id),
                    article_id: Set(article.id),
                    size_id: Set(variant.size_id),
                    color_id: Set(variant.color_id),
                    sku: Set(variant.sku.clone()),
                    price: Set(variant.price),
                    stock: Set(to_db_count(variant.stock)?),
                    min_stock: Set(to_db_count(variant.min_stock)?),
                    barcode: Set(variant.barcode.clone()),
                    active: Set(variant.active),
                }
                .insert(&txn)
                .await?;
            }
        }
        for customer in &catalog.customers {
            CustomerActive {
                id: Set(customer.id),
                name: Set(customer.name.clone()),
                phone: Set(customer.phone.clone()),
                email: Set(customer.email.clone()),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        Ok(true)
    }

    async fn load_lines(&self, sale_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, Vec<SaleLineModel>>> {
        let mut grouped: HashMap<Uuid, Vec<SaleLineModel>> = HashMap::new();
        if sale_ids.is_empty() {
            return Ok(grouped);
        }
        let lines = SaleLines::find()
            .filter(SaleLineCol::SaleId.is_in(sale_ids))
            .order_by_asc(SaleLineCol::LineNo)
            .all(&self.orm)
            .await?;
        for line in lines {
            grouped.entry(line.sale_id).or_default().push(line);
        }
        Ok(grouped)
    }

    async fn current_stock(&self, line: &CartLine) -> AppResult<u32> {
        let stock = match line.variant_id {
            Some(id) => Variants::find_by_id(id)
                .one(&self.orm)
                .await?
                .map(|v| v.stock),
            None => Articles::find_by_id(line.article_id)
                .one(&self.orm)
                .await?
                .map(|a| a.stock),
        };
        Ok(stock.map_or(0, |s| u32::try_from(s).unwrap_or(0)))
    }
}

#[async_trait]
impl CatalogRepository for PgStore {
    async fn list_articles(&self) -> AppResult<Vec<Article>> {
        Articles::find()
            .order_by_asc(ArticleCol::Name)
            .find_with_related(Variants)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|(article, variants)| article_from_entity(article, variants))
            .collect()
    }

    async fn get_article(&self, id: Uuid) -> AppResult<Option<Article>> {
        let Some(article) = Articles::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };
        let variants = Variants::find()
            .filter(VariantCol::ArticleId.eq(id))
            .all(&self.orm)
            .await?;
        article_from_entity(article, variants).map(Some)
    }

    async fn adjust_stock(&self, variant_id: Uuid, delta: i32) -> AppResult<Variant> {
        let txn = self.orm.begin().await?;
        let variant = Variants::find_by_id(variant_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let variant = match variant {
            Some(v) => v,
            None => return Err(AppError::not_found(format!("variant {variant_id}"))),
        };

        let new_stock = apply_delta(from_db_count(variant.stock)?, delta)?;
        let mut active: VariantActive = variant.into();
        active.stock = Set(to_db_count(new_stock)?);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        variant_from_entity(updated)
    }
}

#[async_trait]
impl ReferenceRepository for PgStore {
    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let customers = Customers::find()
            .order_by_asc(CustomerCol::Name)
            .all(&self.orm)
            .await?;
        Ok(customers.into_iter().map(customer_from_entity).collect())
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Option<Customer>> {
        Ok(Customers::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(customer_from_entity))
    }

    async fn list_sizes(&self) -> AppResult<Vec<Size>> {
        let sizes = Sizes::find()
            .order_by_asc(SizeCol::DisplayOrder)
            .all(&self.orm)
            .await?;
        Ok(sizes.into_iter().map(size_from_entity).collect())
    }

    async fn list_colors(&self) -> AppResult<Vec<Color>> {
        let colors = Colors::find()
            .order_by_asc(ColorCol::Name)
            .all(&self.orm)
            .await?;
        Ok(colors.into_iter().map(color_from_entity).collect())
    }
}

#[async_trait]
impl SaleRepository for PgStore {
    async fn save_sale(&self, sale: Sale) -> AppResult<Sale> {
        let txn = self.orm.begin().await?;

        // Conditional decrement: a row is only touched while enough stock
        // remains, so a concurrent sale of the last unit is rejected here.
        for line in &sale.lines {
            let qty = to_db_count(line.quantity)?;
            let result = match line.variant_id {
                Some(variant_id) => {
                    Variants::update_many()
                        .col_expr(VariantCol::Stock, Expr::col(VariantCol::Stock).sub(qty))
                        .filter(VariantCol::Id.eq(variant_id))
                        .filter(VariantCol::Stock.gte(qty))
                        .exec(&txn)
                        .await?
                }
                None => {
                    Articles::update_many()
                        .col_expr(ArticleCol::Stock, Expr::col(ArticleCol::Stock).sub(qty))
                        .filter(ArticleCol::Id.eq(line.article_id))
                        .filter(ArticleCol::Stock.gte(qty))
                        .exec(&txn)
                        .await?
                }
            };
            if result.rows_affected == 0 {
                txn.rollback().await?;
                return Err(AppError::StockUnavailable {
                    item: line.sku.clone().unwrap_or_else(|| line.article_name.clone()),
                    requested: line.quantity,
                    available: self.current_stock(line).await?,
                });
            }
        }

        let contact = sale.contact.clone().unwrap_or_default();
        let has_contact = sale.contact.is_some();
        SaleActive {
            id: Set(sale.id),
            invoice_number: Set(sale.invoice_number.clone()),
            invoice_prefix: Set(invoice_prefix_of(&sale)),
            channel: Set(sale.channel.as_str().to_string()),
            subtotal: Set(sale.subtotal),
            discount: Set(sale.discount),
            total: Set(sale.total),
            payment_method: Set(sale.payment_method.as_str().to_string()),
            customer_id: Set(sale.customer_id),
            contact_name: Set(has_contact.then(|| contact.name.clone())),
            contact_email: Set(has_contact.then(|| contact.email.clone())),
            contact_phone: Set(has_contact.then(|| contact.phone.clone())),
            contact_address: Set(contact.address.clone()),
            created_at: Set(sale.created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(|err| duplicate_invoice(err, &sale.invoice_number))?;

        let mut lines = Vec::with_capacity(sale.lines.len());
        for (line_no, line) in (1..).zip(&sale.lines) {
            lines.push(SaleLineActive {
                id: Set(line.id),
                sale_id: Set(sale.id),
                line_no: Set(line_no),
                article_id: Set(line.article_id),
                article_name: Set(line.article_name.clone()),
                variant_id: Set(line.variant_id),
                sku: Set(line.sku.clone()),
                quantity: Set(to_db_count(line.quantity)?),
                unit_price: Set(line.unit_price),
                line_total: Set(line.line_total),
            });
        }
        SaleLines::insert_many(lines).exec(&txn).await?;

        txn.commit().await?;
        Ok(sale)
    }

    async fn next_invoice_sequence(&self, prefix: &str) -> AppResult<u32> {
        let existing = Sales::find()
            .filter(SaleCol::InvoicePrefix.eq(prefix))
            .count(&self.orm)
            .await?;
        u32::try_from(existing + 1).map_err(|e| AppError::Internal(e.into()))
    }

    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>> {
        let Some(sale) = Sales::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };
        let mut lines = self.load_lines(vec![id]).await?;
        let lines = lines.remove(&id).unwrap_or_default();
        sale_from_entity(sale, lines).map(Some)
    }

    async fn list_sales(&self, offset: u64, limit: u64) -> AppResult<(Vec<Sale>, u64)> {
        let finder = Sales::find().order_by_desc(SaleCol::CreatedAt);
        let total = finder.clone().count(&self.orm).await?;

        let sales = finder.limit(limit).offset(offset).all(&self.orm).await?;
        let mut lines = self
            .load_lines(sales.iter().map(|s| s.id).collect())
            .await?;

        let items = sales
            .into_iter()
            .map(|sale| {
                let sale_lines = lines.remove(&sale.id).unwrap_or_default();
                sale_from_entity(sale, sale_lines)
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok((items, total))
    }
}

fn invoice_prefix_of(sale: &Sale) -> String {
    crate::domain::checkout::invoice_prefix(sale.channel, sale.created_at)
}

fn duplicate_invoice(err: DbErr, invoice_number: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::BadRequest(format!("invoice number {invoice_number} already used"))
        }
        _ => AppError::OrmError(err),
    }
}

fn to_db_count(value: u32) -> AppResult<i32> {
    i32::try_from(value).map_err(|_| AppError::BadRequest(format!("count {value} is too large")))
}

fn from_db_count(value: i32) -> AppResult<u32> {
    u32::try_from(value).map_err(|_| AppError::Internal(anyhow!("negative count {value} in database")))
}

fn article_from_entity(model: ArticleModel, variants: Vec<VariantModel>) -> AppResult<Article> {
    let mut variants = variants
        .into_iter()
        .map(variant_from_entity)
        .collect::<AppResult<Vec<_>>>()?;
    variants.sort_by(|a, b| a.sku.cmp(&b.sku));
    Ok(Article {
        id: model.id,
        name: model.name,
        description: model.description,
        base_price: model.base_price,
        category: model.category,
        active: model.active,
        image: model.image,
        barcode: model.barcode,
        stock: from_db_count(model.stock)?,
        variants,
    })
}

fn variant_from_entity(model: VariantModel) -> AppResult<Variant> {
    Ok(Variant {
        id: model.id,
        article_id: model.article_id,
        size_id: model.size_id,
        color_id: model.color_id,
        sku: model.sku,
        price: model.price,
        stock: from_db_count(model.stock)?,
        min_stock: from_db_count(model.min_stock)?,
        barcode: model.barcode,
        active: model.active,
    })
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        phone: model.phone,
        email: model.email,
    }
}

fn size_from_entity(model: SizeModel) -> Size {
    Size {
        id: model.id,
        name: model.name,
        code: model.code,
        display_order: model.display_order,
    }
}

fn color_from_entity(model: ColorModel) -> Color {
    Color {
        id: model.id,
        name: model.name,
        hex: model.hex,
    }
}

fn sale_from_entity(model: SaleModel, lines: Vec<SaleLineModel>) -> AppResult<Sale> {
    let contact = match (model.contact_name, model.contact_email, model.contact_phone) {
        (Some(name), Some(email), Some(phone)) => Some(ContactInfo {
            name,
            email,
            phone,
            address: model.contact_address,
        }),
        _ => None,
    };
    let lines = lines
        .into_iter()
        .map(|line| {
            Ok(CartLine {
                id: line.id,
                article_id: line.article_id,
                article_name: line.article_name,
                variant_id: line.variant_id,
                sku: line.sku,
                quantity: from_db_count(line.quantity)?,
                unit_price: line.unit_price,
                line_total: line.line_total,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Sale {
        id: model.id,
        invoice_number: model.invoice_number,
        channel: model.channel.parse().map_err(|e: String| AppError::Internal(anyhow!(e)))?,
        lines,
        subtotal: model.subtotal,
        discount: model.discount,
        total: model.total,
        payment_method: model
            .payment_method
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow!(e)))?,
        customer_id: model.customer_id,
        contact,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
