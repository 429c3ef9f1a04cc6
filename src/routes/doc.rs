use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{
        checkout::CheckoutStep,
        pricing::{GlobalDiscount, Totals},
        stock::LowStockItem,
    },
    dto::{
        cart::{
            AddToCartRequest, CreateSessionRequest, ScanRequest, SelectCustomerRequest, SessionView,
            UpdateQuantityRequest,
        },
        catalog::{
            ArticleList, BarcodeMatch, ColorList, CustomerList, InventoryAdjustRequest, LowStockList,
            SizeList, VariantList,
        },
        sales::{CheckoutRequest, SaleList},
    },
    models::{
        Article, CartLine, Color, ContactInfo, Customer, PaymentMethod, Sale, SalesChannel, Size,
        Variant,
    },
    response::{ApiResponse, Meta},
    routes::{catalog, health, inventory, params, sales, sessions},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::list_articles,
        catalog::lookup_barcode,
        catalog::get_article,
        catalog::list_variants,
        catalog::list_sizes,
        catalog::list_colors,
        catalog::list_customers,
        sessions::create_session,
        sessions::get_session,
        sessions::close_session,
        sessions::add_to_cart,
        sessions::scan_barcode,
        sessions::update_quantity,
        sessions::remove_line,
        sessions::select_customer,
        sessions::open_checkout,
        sessions::cancel_checkout,
        sessions::checkout,
        sales::list_sales,
        sales::get_sale,
        inventory::list_low_stock,
        inventory::adjust_inventory
    ),
    components(
        schemas(
            Article,
            Variant,
            Size,
            Color,
            Customer,
            CartLine,
            ContactInfo,
            PaymentMethod,
            SalesChannel,
            Sale,
            CheckoutStep,
            GlobalDiscount,
            Totals,
            LowStockItem,
            ArticleList,
            VariantList,
            BarcodeMatch,
            SizeList,
            ColorList,
            CustomerList,
            LowStockList,
            InventoryAdjustRequest,
            CreateSessionRequest,
            AddToCartRequest,
            ScanRequest,
            UpdateQuantityRequest,
            SelectCustomerRequest,
            SessionView,
            CheckoutRequest,
            SaleList,
            params::Pagination,
            params::ArticleQuery,
            Meta,
            ApiResponse<Article>,
            ApiResponse<ArticleList>,
            ApiResponse<SessionView>,
            ApiResponse<Sale>,
            ApiResponse<SaleList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Articles, variants and reference data"),
        (name = "Sessions", description = "Till and storefront sessions"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Checkout", description = "Payment and sale creation"),
        (name = "Sales", description = "Recorded sales"),
        (name = "Inventory", description = "Stock monitoring and corrections"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
