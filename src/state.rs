use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    db::DbPool,
    repository::{CatalogRepository, MemoryStore, PgStore, ReferenceRepository, SaleRepository},
    session::SessionStore,
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub references: Arc<dyn ReferenceRepository>,
    pub sales: Arc<dyn SaleRepository>,
    pub sessions: SessionStore,
    pub audit_pool: Option<DbPool>,
}

impl AppState {
    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            catalog: Arc::new(store.clone()),
            references: Arc::new(store.clone()),
            sales: Arc::new(store),
            sessions: SessionStore::new(),
            audit_pool: None,
        }
    }

    pub fn postgres(orm: DatabaseConnection, pool: DbPool) -> Self {
        let store = PgStore::new(orm);
        Self {
            catalog: Arc::new(store.clone()),
            references: Arc::new(store.clone()),
            sales: Arc::new(store),
            sessions: SessionStore::new(),
            audit_pool: Some(pool),
        }
    }

    pub async fn audit(&self, action: &str, resource: &str, metadata: serde_json::Value) {
        if let Err(err) =
            crate::audit::log_audit(self.audit_pool.as_ref(), action, Some(resource), Some(metadata)).await
        {
            tracing::warn!(error = %err, "audit log failed");
        }
    }
}
