use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use couture_pos::{
    domain::{checkout::CheckoutStep, pricing::GlobalDiscount},
    dto::{
        cart::{AddToCartRequest, CreateSessionRequest, ScanRequest, SelectCustomerRequest, UpdateQuantityRequest},
        catalog::InventoryAdjustRequest,
        sales::CheckoutRequest,
    },
    error::{AppError, AppResult, ValidationError},
    fixtures::{DemoCatalog, demo_catalog},
    models::{Article, ContactInfo, PaymentMethod, SalesChannel, Variant},
    repository::{CatalogRepository, MemoryStore},
    routes::params::Pagination,
    services::{cart_service, checkout_service, inventory_service, sales_service},
    state::AppState,
};
use uuid::Uuid;

struct Till {
    state: AppState,
    store: MemoryStore,
    catalog: DemoCatalog,
}

fn till() -> Till {
    let catalog = demo_catalog();
    let store = MemoryStore::from_catalog(catalog.clone());
    Till {
        state: AppState::in_memory(store.clone()),
        store,
        catalog,
    }
}

impl Till {
    fn article(&self, name: &str) -> &Article {
        self.catalog
            .articles
            .iter()
            .find(|a| a.name == name)
            .expect("demo article")
    }

    /// Kaftan M / Rouge: stock 8, priced 35 000.
    fn kaftan_m_red(&self) -> (Uuid, Uuid) {
        let kaftan = self.article("Kaftan");
        let variant = kaftan
            .variants
            .iter()
            .find(|v| v.price == Some(35_000))
            .expect("M/Rouge variant");
        (kaftan.id, variant.id)
    }

    async fn open(&self, channel: SalesChannel) -> Uuid {
        let resp = cart_service::create_session(
            &self.state,
            CreateSessionRequest {
                channel: Some(channel),
            },
        )
        .await
        .expect("session");
        resp.data.expect("session view").id
    }

    async fn add(&self, session: Uuid, article_id: Uuid, variant_id: Option<Uuid>, quantity: u32) -> Result<(), AppError> {
        cart_service::add_to_cart(
            &self.state,
            session,
            AddToCartRequest {
                article_id,
                variant_id,
                size_id: None,
                color_id: None,
                quantity: Some(quantity),
            },
        )
        .await
        .map(|_| ())
    }
}

fn cash() -> CheckoutRequest {
    CheckoutRequest {
        payment_method: PaymentMethod::Especes,
        contact: None,
        discount: None,
    }
}

#[tokio::test]
async fn kaftan_sale_from_cart_to_receipt() -> anyhow::Result<()> {
    let till = till();
    let (kaftan, m_red) = till.kaftan_m_red();
    let session = till.open(SalesChannel::Counter).await;

    till.add(session, kaftan, Some(m_red), 2).await?;
    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 2);
    assert_eq!(view.totals.total, 70_000);

    till.add(session, kaftan, Some(m_red), 1).await?;
    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 3);
    assert_eq!(view.totals.total, 105_000);

    let line_id = view.lines[0].id;
    let view = cart_service::update_quantity(
        &till.state,
        session,
        line_id,
        UpdateQuantityRequest { quantity: 0 },
    )
    .await?
    .data
    .unwrap();
    assert!(view.lines.is_empty());

    till.add(session, kaftan, Some(m_red), 3).await?;
    let sale = checkout_service::checkout(&till.state, session, cash())
        .await?
        .data
        .unwrap();
    assert_eq!(sale.total, 105_000);
    assert!(!sale.invoice_number.is_empty());
    assert_eq!(sale.lines.len(), 1);

    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert!(view.lines.is_empty());
    assert_eq!(view.checkout, CheckoutStep::Completed);
    assert_eq!(view.last_sale.map(|s| s.id), Some(sale.id));

    // Stock was taken out of the variant.
    let articles = till.store.list_articles().await?;
    let variant = articles
        .iter()
        .flat_map(|a| a.variants.iter())
        .find(|v| v.id == m_red)
        .unwrap();
    assert_eq!(variant.stock, 5);
    Ok(())
}

#[tokio::test]
async fn empty_cart_cannot_be_checked_out() -> anyhow::Result<()> {
    let till = till();
    let session = till.open(SalesChannel::Counter).await;

    let err = checkout_service::checkout(&till.state, session, cash())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::EmptyCart)));

    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert!(view.lines.is_empty());
    assert_eq!(view.checkout, CheckoutStep::AwaitingPaymentMethod);

    let (sales, total) = sales_list(&till).await?;
    assert!(sales.is_empty());
    assert_eq!(total, Some(0));
    Ok(())
}

#[tokio::test]
async fn storefront_order_needs_contact_details() -> anyhow::Result<()> {
    let till = till();
    let pagne = till.article("Pagne wax 6 yards").id;
    let session = till.open(SalesChannel::Storefront).await;
    till.add(session, pagne, None, 2).await?;

    let err = checkout_service::checkout(
        &till.state,
        session,
        CheckoutRequest {
            payment_method: PaymentMethod::MobileMoney,
            contact: Some(ContactInfo {
                name: "Fatou Sarr".into(),
                email: String::new(),
                phone: "+221 70 000 00 00".into(),
                address: None,
            }),
            discount: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::MissingCustomerInfo("email"))
    ));

    let sale = checkout_service::checkout(
        &till.state,
        session,
        CheckoutRequest {
            payment_method: PaymentMethod::MobileMoney,
            contact: Some(ContactInfo {
                name: "Fatou Sarr".into(),
                email: "fatou@example.com".into(),
                phone: "+221 70 000 00 00".into(),
                address: Some("Dakar".into()),
            }),
            discount: None,
        },
    )
    .await?
    .data
    .unwrap();

    let expected = format!("CMD{}0001", Utc::now().format("%y%m%d"));
    assert_eq!(sale.invoice_number, expected);
    assert_eq!(sale.total, 24_000);
    assert_eq!(sale.contact.map(|c| c.email), Some("fatou@example.com".into()));
    Ok(())
}

#[tokio::test]
async fn stock_taken_elsewhere_rejects_checkout_and_keeps_cart() -> anyhow::Result<()> {
    let till = till();
    let (kaftan, m_red) = till.kaftan_m_red();
    let session = till.open(SalesChannel::Counter).await;
    till.add(session, kaftan, Some(m_red), 3).await?;

    // Another till sold most of the variant in the meantime.
    till.store.set_stock(m_red, 1).await?;

    let err = checkout_service::checkout(&till.state, session, cash())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::StockUnavailable {
            requested: 3,
            available: 1,
            ..
        }
    ));

    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 3);
    assert_eq!(view.checkout, CheckoutStep::AwaitingPaymentMethod);

    let (sales, _) = sales_list(&till).await?;
    assert!(sales.is_empty());
    Ok(())
}

#[tokio::test]
async fn counter_invoices_follow_the_yearly_sequence() -> anyhow::Result<()> {
    let till = till();
    let belt = till.article("Ceinture cuir").id;
    let year = Utc::now().format("%Y").to_string();

    let mut numbers = Vec::new();
    for _ in 0..2 {
        let session = till.open(SalesChannel::Counter).await;
        till.add(session, belt, None, 1).await?;
        let sale = checkout_service::checkout(&till.state, session, cash())
            .await?
            .data
            .unwrap();
        numbers.push(sale.invoice_number);
    }

    assert_eq!(numbers, vec![format!("FAC-{year}-0001"), format!("FAC-{year}-0002")]);

    let (sales, total) = sales_list(&till).await?;
    assert_eq!(total, Some(2));
    assert_eq!(sales[0].invoice_number, format!("FAC-{year}-0002"));
    Ok(())
}

#[tokio::test]
async fn same_session_starts_a_new_sale_after_completion() -> anyhow::Result<()> {
    let till = till();
    let belt = till.article("Ceinture cuir").id;
    let session = till.open(SalesChannel::Counter).await;

    till.add(session, belt, None, 1).await?;
    checkout_service::checkout(&till.state, session, cash()).await?;

    till.add(session, belt, None, 2).await?;
    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert_eq!(view.checkout, CheckoutStep::Idle);

    let sale = checkout_service::checkout(
        &till.state,
        session,
        CheckoutRequest {
            payment_method: PaymentMethod::Carte,
            contact: None,
            discount: Some(GlobalDiscount::Percentage(10)),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(sale.subtotal, 10_000);
    assert_eq!(sale.discount, 1_000);
    assert_eq!(sale.total, 9_000);
    Ok(())
}

#[tokio::test]
async fn cancel_leaves_the_cart_alone() -> anyhow::Result<()> {
    let till = till();
    let belt = till.article("Ceinture cuir").id;
    let session = till.open(SalesChannel::Counter).await;
    till.add(session, belt, None, 1).await?;

    checkout_service::open_checkout(&till.state, session).await?;
    let view = checkout_service::cancel_checkout(&till.state, session)
        .await?
        .data
        .unwrap();
    assert_eq!(view.checkout, CheckoutStep::Idle);
    assert_eq!(view.lines.len(), 1);
    Ok(())
}

#[tokio::test]
async fn scanning_a_variant_barcode_adds_that_variant() -> anyhow::Result<()> {
    let till = till();
    let (_, m_red) = till.kaftan_m_red();
    let session = till.open(SalesChannel::Counter).await;

    let view = cart_service::scan_barcode(
        &till.state,
        session,
        ScanRequest {
            barcode: " 3760001000011 ".into(),
            quantity: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].variant_id, Some(m_red));
    assert_eq!(view.lines[0].unit_price, 35_000);

    let err = cart_service::scan_barcode(
        &till.state,
        session,
        ScanRequest {
            barcode: "0000000000000".into(),
            quantity: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn variant_article_without_variant_is_refused() -> anyhow::Result<()> {
    let till = till();
    let (kaftan, _) = till.kaftan_m_red();
    let session = till.open(SalesChannel::Counter).await;

    let err = till.add(session, kaftan, None, 1).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::VariantRequired(_))
    ));
    Ok(())
}

#[tokio::test]
async fn quantity_increase_is_checked_against_stock() -> anyhow::Result<()> {
    let till = till();
    let (kaftan, m_red) = till.kaftan_m_red();
    let session = till.open(SalesChannel::Counter).await;
    till.add(session, kaftan, Some(m_red), 1).await?;
    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    let line_id = view.lines[0].id;

    let err = cart_service::update_quantity(
        &till.state,
        session,
        line_id,
        UpdateQuantityRequest { quantity: 9 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::StockUnavailable { available: 8, .. }));

    let view = cart_service::update_quantity(
        &till.state,
        session,
        line_id,
        UpdateQuantityRequest { quantity: 8 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(view.lines[0].quantity, 8);
    Ok(())
}

#[tokio::test]
async fn quantity_increase_rechecks_the_live_variant() -> anyhow::Result<()> {
    let till = till();
    let (kaftan_id, m_red) = till.kaftan_m_red();
    let session = till.open(SalesChannel::Counter).await;
    till.add(session, kaftan_id, Some(m_red), 1).await?;
    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    let line_id = view.lines[0].id;

    let mut kaftan = till.article("Kaftan").clone();
    if let Some(variant) = kaftan.variants.iter_mut().find(|v| v.id == m_red) {
        variant.active = false;
    }
    till.store.replace_article(kaftan.clone()).await?;
    let err = cart_service::update_quantity(
        &till.state,
        session,
        line_id,
        UpdateQuantityRequest { quantity: 5 },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::Inactive(_))
    ));

    kaftan.variants.retain(|v| v.id != m_red);
    till.store.replace_article(kaftan).await?;
    let err = cart_service::update_quantity(
        &till.state,
        session,
        line_id,
        UpdateQuantityRequest { quantity: 7 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Rejected changes leave the line as it was.
    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert_eq!(view.lines[0].quantity, 1);
    Ok(())
}

#[tokio::test]
async fn quantity_increase_is_refused_once_the_article_is_withdrawn() -> anyhow::Result<()> {
    let till = till();
    let belt = till.article("Ceinture cuir").clone();
    let session = till.open(SalesChannel::Counter).await;
    till.add(session, belt.id, None, 1).await?;
    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    let line_id = view.lines[0].id;

    till.store
        .replace_article(Article {
            active: false,
            ..belt
        })
        .await?;
    let err = cart_service::update_quantity(
        &till.state,
        session,
        line_id,
        UpdateQuantityRequest { quantity: 2 },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::Inactive(_))
    ));
    Ok(())
}

#[tokio::test]
async fn customer_selection_requires_a_known_customer() -> anyhow::Result<()> {
    let till = till();
    let session = till.open(SalesChannel::Counter).await;

    let err = cart_service::select_customer(
        &till.state,
        session,
        SelectCustomerRequest {
            customer_id: Some(Uuid::new_v4()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let awa = till.catalog.customers[0].id;
    let view = cart_service::select_customer(
        &till.state,
        session,
        SelectCustomerRequest {
            customer_id: Some(awa),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(view.customer_id, Some(awa));
    Ok(())
}

#[tokio::test]
async fn low_stock_and_manual_adjustment() -> anyhow::Result<()> {
    let till = till();
    let low = inventory_service::list_low_stock(&till.state)
        .await?
        .data
        .unwrap()
        .items;
    // Kaftan M/Bleu (2 <= 3) and Boubou XL/Blanc (1 <= 1).
    assert_eq!(low.len(), 2);
    assert_eq!(low[0].stock, 1);

    let variant_id = low[0].variant_id;
    let updated = inventory_service::adjust_inventory(
        &till.state,
        variant_id,
        InventoryAdjustRequest { delta: 4 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.stock, 5);

    let err = inventory_service::adjust_inventory(
        &till.state,
        variant_id,
        InventoryAdjustRequest { delta: -6 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let low = inventory_service::list_low_stock(&till.state)
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(low.len(), 1);
    Ok(())
}

async fn sales_list(till: &Till) -> anyhow::Result<(Vec<couture_pos::models::Sale>, Option<i64>)> {
    let resp = sales_service::list_sales(
        &till.state,
        Pagination {
            page: Some(1),
            per_page: Some(20),
        },
    )
    .await?;
    let total = resp.meta.and_then(|m| m.total);
    Ok((resp.data.unwrap().items, total))
}

/// Catalogue whose full listing never answers, standing in for a database
/// call that outlives the client.
struct StalledCatalog(MemoryStore);

#[async_trait]
impl CatalogRepository for StalledCatalog {
    async fn list_articles(&self) -> AppResult<Vec<Article>> {
        std::future::pending().await
    }

    async fn get_article(&self, id: Uuid) -> AppResult<Option<Article>> {
        self.0.get_article(id).await
    }

    async fn adjust_stock(&self, variant_id: Uuid, delta: i32) -> AppResult<Variant> {
        self.0.adjust_stock(variant_id, delta).await
    }
}

#[tokio::test]
async fn abandoned_checkout_leaves_the_session_usable() -> anyhow::Result<()> {
    let till = till();
    let stalled = AppState {
        catalog: Arc::new(StalledCatalog(till.store.clone())),
        ..till.state.clone()
    };
    let belt = till.article("Ceinture cuir").id;
    let session = till.open(SalesChannel::Counter).await;
    till.add(session, belt, None, 2).await?;

    let attempt = tokio::time::timeout(
        Duration::from_millis(50),
        checkout_service::checkout(&stalled, session, cash()),
    )
    .await;
    assert!(attempt.is_err(), "checkout should still be waiting");

    let view = cart_service::get_session(&till.state, session).await?.data.unwrap();
    assert_eq!(view.checkout, CheckoutStep::AwaitingPaymentMethod);
    assert_eq!(view.lines.len(), 1);

    let view = checkout_service::cancel_checkout(&till.state, session)
        .await?
        .data
        .unwrap();
    assert_eq!(view.checkout, CheckoutStep::Idle);
    checkout_service::open_checkout(&till.state, session).await?;

    let sale = checkout_service::checkout(&till.state, session, cash())
        .await?
        .data
        .unwrap();
    assert_eq!(sale.lines[0].quantity, 2);
    Ok(())
}
