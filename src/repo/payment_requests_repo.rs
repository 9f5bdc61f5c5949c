use crate::domain::payment::{PaymentMethod, PaymentStatus};
use crate::domain::payment_request::PaymentRequest;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentRequestsRepo {
    pub pool: PgPool,
}

impl PaymentRequestsRepo {
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentRequest>> {
        let row = sqlx::query(
            r#"
            SELECT id, operator_id, request_number, services, total_amount, currency, status,
                   payment_method, payment_token, payment_date, paid_at, notification_channels,
                   created_at, updated_at
            FROM payment_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_payment_request(&r)).transpose()
    }

    /// Records the chosen method and the aggregator-issued token at
    /// initiation time. Status stays `pending` until the callback settles it.
    pub async fn mark_initiated_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        method: PaymentMethod,
        payment_token: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payment_requests
            SET payment_method = $2, payment_token = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(method.as_str())
        .bind(payment_token)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn apply_callback_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: PaymentStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payment_requests
            SET status = $2, paid_at = COALESCE($3, paid_at),
                payment_date = COALESCE($3, payment_date), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(paid_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }
}

fn row_to_payment_request(row: &PgRow) -> Result<PaymentRequest> {
    let status: String = row.get("status");
    let method: Option<String> = row.get("payment_method");
    let services: serde_json::Value = row.get("services");
    let channels: serde_json::Value = row.get("notification_channels");

    Ok(PaymentRequest {
        id: row.get("id"),
        operator_id: row.get("operator_id"),
        request_number: row.get("request_number"),
        services: serde_json::from_value(services).context("malformed services payload")?,
        total_amount: row.get("total_amount"),
        currency: row.get("currency"),
        status: PaymentStatus::parse(&status)
            .with_context(|| format!("unknown payment request status '{status}'"))?,
        payment_method: method
            .as_deref()
            .map(|m| PaymentMethod::parse(m).with_context(|| format!("unknown payment method '{m}'")))
            .transpose()?,
        payment_token: row.get("payment_token"),
        payment_date: row.get("payment_date"),
        paid_at: row.get("paid_at"),
        notification_channels: serde_json::from_value(channels)
            .context("malformed notification channels payload")?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
