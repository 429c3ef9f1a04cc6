//! Demo boutique catalogue, loaded into the in-memory store when no database
//! is configured and written to PostgreSQL by the `seed` binary.

use uuid::Uuid;

use crate::{
    domain::catalog::generate_sku,
    models::{Article, Color, Customer, Size, Variant},
};

#[derive(Debug, Clone, Default)]
pub struct DemoCatalog {
    pub sizes: Vec<Size>,
    pub colors: Vec<Color>,
    pub articles: Vec<Article>,
    pub customers: Vec<Customer>,
}

struct VariantSeed {
    size: &'static str,
    color: &'static str,
    price: Option<i64>,
    stock: u32,
    min_stock: u32,
    barcode: &'static str,
}

pub fn demo_catalog() -> DemoCatalog {
    let sizes: Vec<Size> = [("Small", "S"), ("Medium", "M"), ("Large", "L"), ("Extra large", "XL")]
        .into_iter()
        .zip(1..)
        .map(|((name, code), display_order)| Size {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            display_order,
        })
        .collect();

    let colors: Vec<Color> = [
        ("Rouge", "#C0392B"),
        ("Bleu", "#1F3A93"),
        ("Blanc", "#FFFFFF"),
        ("Noir", "#000000"),
    ]
    .into_iter()
    .map(|(name, hex)| Color {
        id: Uuid::new_v4(),
        name: name.to_string(),
        hex: hex.to_string(),
    })
    .collect();

    let kaftan = article_with_variants(
        "Kaftan",
        "Kaftan en bazin riche, coupe droite",
        "vetement",
        30_000,
        &sizes,
        &colors,
        &[
            VariantSeed { size: "M", color: "Rouge", price: Some(35_000), stock: 8, min_stock: 2, barcode: "3760001000011" },
            VariantSeed { size: "L", color: "Rouge", price: None, stock: 5, min_stock: 2, barcode: "3760001000028" },
            VariantSeed { size: "M", color: "Bleu", price: None, stock: 2, min_stock: 3, barcode: "3760001000035" },
        ],
    );
    let boubou = article_with_variants(
        "Boubou brodé",
        "Grand boubou brodé main",
        "vetement",
        45_000,
        &sizes,
        &colors,
        &[
            VariantSeed { size: "L", color: "Blanc", price: None, stock: 4, min_stock: 1, barcode: "3760001000042" },
            VariantSeed { size: "XL", color: "Blanc", price: Some(48_000), stock: 1, min_stock: 1, barcode: "3760001000059" },
        ],
    );
    let pagne = simple_article("Pagne wax 6 yards", "tissu", 12_000, 40, "3760001000066");
    let belt = simple_article("Ceinture cuir", "accessoire", 5_000, 15, "3760001000073");

    let customers = vec![
        Customer {
            id: Uuid::new_v4(),
            name: "Awa Diop".to_string(),
            phone: "+221 77 123 45 67".to_string(),
            email: Some("awa.diop@example.com".to_string()),
        },
        Customer {
            id: Uuid::new_v4(),
            name: "Moussa Ndiaye".to_string(),
            phone: "+221 76 765 43 21".to_string(),
            email: None,
        },
    ];

    DemoCatalog {
        articles: vec![kaftan, boubou, pagne, belt],
        sizes,
        colors,
        customers,
    }
}

fn article_with_variants(
    name: &str,
    description: &str,
    category: &str,
    base_price: i64,
    sizes: &[Size],
    colors: &[Color],
    seeds: &[VariantSeed],
) -> Article {
    let mut article = simple_article(name, category, base_price, 0, "");
    article.description = Some(description.to_string());
    let article_id = article.id;
    article.variants = seeds
        .iter()
        .zip(1..)
        .map(|(seed, sequence)| {
            let size = sizes.iter().find(|s| s.code == seed.size);
            let color = colors.iter().find(|c| c.name == seed.color);
            Variant {
                id: Uuid::new_v4(),
                article_id,
                size_id: size.map(|s| s.id),
                color_id: color.map(|c| c.id),
                sku: generate_sku(
                    name,
                    size.map(|s| s.code.as_str()),
                    color.map(|c| c.name.as_str()),
                    sequence,
                ),
                price: seed.price,
                stock: seed.stock,
                min_stock: seed.min_stock,
                barcode: Some(seed.barcode.to_string()),
                active: true,
            }
        })
        .collect();
    article
}

fn simple_article(name: &str, category: &str, base_price: i64, stock: u32, barcode: &str) -> Article {
    Article {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        base_price,
        category: category.to_string(),
        active: true,
        image: None,
        barcode: Some(barcode.to_string()).filter(|b| !b.is_empty()),
        stock,
        variants: Vec::new(),
    }
}
