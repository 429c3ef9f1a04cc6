use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Record a business event. Always emitted as a `tracing` event on the
/// `audit` target; also stored in `audit_logs` when a database is attached.
pub async fn log_audit(
    pool: Option<&DbPool>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let details = metadata
        .as_ref()
        .map_or_else(String::new, serde_json::Value::to_string);
    tracing::info!(
        target: "audit",
        action,
        resource = resource.unwrap_or("-"),
        metadata = %details,
        "audit"
    );

    let Some(pool) = pool else {
        return Ok(());
    };

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, action, resource, metadata)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}
