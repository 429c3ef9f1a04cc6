use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use couture_pos::{
    app::build_app,
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    fixtures::demo_catalog,
    repository::MemoryStore,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,couture_pos=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let state = match config.database_url.as_deref() {
        Some(url) => {
            let orm = create_orm_conn(url).await?;
            run_migrations(&orm).await?;
            let pool = create_pool(url).await?;
            tracing::info!("using postgres storage");
            AppState::postgres(orm, pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving the demo catalogue from memory");
            AppState::in_memory(MemoryStore::from_catalog(demo_catalog()))
        }
    };

    state.sessions.spawn_idle_sweeper(
        chrono::TimeDelta::minutes(config.session_idle_minutes),
        std::time::Duration::from_secs(60),
    );

    let app = build_app(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
