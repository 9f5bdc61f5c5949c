use anyhow::Result;
use sqlx::PgPool;

/// Append-only audit trail entry. Written exclusively through the
/// background audit writer; this core never reads it back.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditEntry {
    pub actor_id: String,
    pub actor_email: String,
    pub action: String,
    pub resource: String,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct AuditRepo {
    pub pool: PgPool,
}

impl AuditRepo {
    pub async fn insert(&self, entry: &AuditEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (actor_id, actor_email, action, resource, before, after, ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&entry.actor_id)
        .bind(&entry.actor_email)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(&entry.before)
        .bind(&entry.after)
        .bind(&entry.ip)
        .bind(&entry.user_agent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
