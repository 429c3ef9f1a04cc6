use couture_pos::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    fixtures::demo_catalog,
    repository::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(config.require_database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let catalog = demo_catalog();
    let articles = catalog.articles.len();
    let customers = catalog.customers.len();
    if PgStore::new(orm).import_catalog(&catalog).await? {
        println!("Seeded {articles} articles and {customers} customers");
    } else {
        println!("Catalogue already present, nothing to seed");
    }
    Ok(())
}
