use crate::domain::operator::Operator;
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct OperatorsRepo {
    pub pool: PgPool,
}

impl OperatorsRepo {
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Operator>> {
        let row = sqlx::query("SELECT id, first_name, last_name, email, phone FROM operators WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| Operator {
            id: r.get("id"),
            first_name: r.get("first_name"),
            last_name: r.get("last_name"),
            email: r.get("email"),
            phone: r.get("phone"),
        }))
    }
}
